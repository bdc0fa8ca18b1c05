use std::io::Read;

use crate::ParserError;
use crate::gltf::types::GltfDocument;

pub struct GltfReader {}

impl GltfReader {
    /// Parses the JSON flavour (`.gltf`) of the format. Binary buffers are not touched, they are the
    /// business of whoever uploads the primitives.
    pub fn parse_document<R: Read>(rdr: &mut R) -> Result<GltfDocument, ParserError> {
        let mut buf = Vec::new();
        rdr.read_to_end(&mut buf)?;
        GltfReader::parse_slice(&buf)
    }

    pub fn parse_slice(buf: &[u8]) -> Result<GltfDocument, ParserError> {
        if buf.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParserError::EmptySource);
        }

        let document: GltfDocument = serde_json::from_slice(buf)?;
        if !document.asset.version.starts_with('2') {
            return Err(ParserError::FormatError {
                reason: "Only glTF 2.x documents are supported",
            });
        }

        GltfReader::validate_indices(&document)?;
        Ok(document)
    }

    fn validate_indices(document: &GltfDocument) -> Result<(), ParserError> {
        let accessors = document.accessors.len();
        for primitive in document.meshes.iter().flat_map(|mesh| mesh.primitives.iter()) {
            for accessor in primitive.attributes.values() {
                check_index("accessor", *accessor, accessors)?;
            }
            if let Some(indices) = primitive.indices {
                check_index("accessor", indices, accessors)?;
            }
            if let Some(material) = primitive.material {
                check_index("material", material, document.materials.len())?;
            }
        }

        for texture_info in document
            .materials
            .iter()
            .filter_map(|material| material.pbr_metallic_roughness.as_ref())
            .filter_map(|pbr| pbr.base_color_texture.as_ref())
        {
            check_index("texture", texture_info.index, document.textures.len())?;
        }

        for source in document.textures.iter().filter_map(|texture| texture.source) {
            check_index("image", source, document.images.len())?;
        }

        for animation in &document.animations {
            for sampler in &animation.samplers {
                check_index("accessor", sampler.input, accessors)?;
                check_index("accessor", sampler.output, accessors)?;
            }
            for channel in &animation.channels {
                check_index("animation sampler", channel.sampler, animation.samplers.len())?;
                if let Some(node) = channel.target.node {
                    check_index("node", node, document.nodes.len())?;
                }
            }
        }

        for skin in &document.skins {
            for joint in &skin.joints {
                check_index("node", *joint, document.nodes.len())?;
            }
        }

        for node in &document.nodes {
            if let Some(mesh) = node.mesh {
                check_index("mesh", mesh, document.meshes.len())?;
            }
            if let Some(skin) = node.skin {
                check_index("skin", skin, document.skins.len())?;
            }
        }

        if let Some(scene) = document.scene {
            check_index("scene", scene, document.scenes.len())?;
        }

        Ok(())
    }
}

#[inline]
fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), ParserError> {
    if index < len {
        Ok(())
    } else {
        Err(ParserError::DanglingIndex { kind, index, len })
    }
}
