use serde::Deserialize;
use std::collections::BTreeMap;

// Only the parts of the JSON document that the viewer consumes are modelled. Unknown keys
// (extensions, extras, buffers, bufferViews, cameras...) are ignored by serde.

/// glTF `mode` for triangle lists, the default when the key is absent.
pub const MODE_TRIANGLES: u32 = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfDocument {
    pub asset: AssetInfo,
    #[serde(default)]
    pub scene: Option<usize>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub textures: Vec<Texture>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub skins: Vec<Skin>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub version: String,
    #[serde(default)]
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mesh: Option<usize>,
    #[serde(default)]
    pub skin: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default)]
    pub translation: Option<[f32; 3]>,
    /// x, y, z, w
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    /// column major
    #[serde(default)]
    pub matrix: Option<[f32; 16]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Primitive {
    /// semantic (e.g. `POSITION`, `TEXCOORD_0`) to accessor index
    pub attributes: BTreeMap<String, usize>,
    #[serde(default)]
    pub indices: Option<usize>,
    #[serde(default)]
    pub material: Option<usize>,
    #[serde(default = "default_mode")]
    pub mode: u32,
}

fn default_mode() -> u32 {
    MODE_TRIANGLES
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(default)]
    pub base_color_factor: Option<[f32; 4]>,
    #[serde(default)]
    pub base_color_texture: Option<TextureInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: usize,
    #[serde(default)]
    pub tex_coord: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Texture {
    #[serde(default)]
    pub source: Option<usize>,
    #[serde(default)]
    pub sampler: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(default)]
    pub buffer_view: Option<usize>,
    pub count: usize,
    pub component_type: u32,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub min: Option<Vec<f32>>,
    #[serde(default)]
    pub max: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub name: Option<String>,
    pub channels: Vec<Channel>,
    pub samplers: Vec<AnimationSampler>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub sampler: usize,
    pub target: ChannelTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelTarget {
    #[serde(default)]
    pub node: Option<usize>,
    /// `translation`, `rotation`, `scale` or `weights`
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationSampler {
    pub input: usize,
    pub output: usize,
    #[serde(default)]
    pub interpolation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skin {
    pub joints: Vec<usize>,
    #[serde(default)]
    pub inverse_bind_matrices: Option<usize>,
    #[serde(default)]
    pub skeleton: Option<usize>,
}

impl GltfDocument {
    /// Root nodes of the default scene (or of the first scene, if none is marked as default).
    pub fn default_scene_roots(&self) -> &[usize] {
        self.scenes
            .get(self.scene.unwrap_or(0))
            .map(|scene| scene.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Follows material -> baseColorTexture -> texture -> image and returns the image uri.
    pub fn base_color_image_uri(&self, material: usize) -> Option<&str> {
        let texture_index = self
            .materials
            .get(material)?
            .pbr_metallic_roughness
            .as_ref()?
            .base_color_texture
            .as_ref()?
            .index;

        let image_index = self.textures.get(texture_index)?.source?;
        self.images.get(image_index)?.uri.as_deref()
    }

    /// The length of a clip is the latest keyframe of any of its samplers. glTF requires the input
    /// accessors of samplers to carry `min` and `max`, so no buffer has to be read for this.
    pub fn animation_duration(&self, animation: &Animation) -> f32 {
        animation
            .samplers
            .iter()
            .filter_map(|sampler| self.accessors.get(sampler.input))
            .filter_map(|accessor| accessor.max.as_ref().and_then(|max| max.first().copied()))
            .fold(0.0, f32::max)
    }
}
