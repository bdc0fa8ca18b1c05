use std::rc::Rc;

use glam::Vec4;
use log::{trace, warn};
use wonderland_files::gltf::reader::GltfReader;
use wonderland_files::gltf::types::GltfDocument;

use crate::io::common::loader::{AssetLoader, RawAssetLoader};
use crate::rendering::common::types::{AnimationClip, Material, PrimitiveDescriptor, PrimitiveTopology, Skeleton};
use crate::rendering::loader::AssetLoadError;

/// Everything the cache needs to build the GPU representation of one model file.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub primitives: Vec<PrimitiveDescriptor>,
    pub materials: Vec<Material>,
    pub animation: Option<AnimationClip>,
    pub skeleton: Option<Skeleton>,
}

impl LoadedModel {
    /// The material of a primitive, the default (white, untextured) material if it has none.
    pub fn material_for(&self, primitive: &PrimitiveDescriptor) -> Material {
        primitive
            .material
            .and_then(|index| self.materials.get(index))
            .cloned()
            .unwrap_or_default()
    }
}

pub struct ModelLoader {
    raw_loader: Rc<dyn RawAssetLoader>,
}

impl ModelLoader {
    pub fn new(raw_loader: Rc<dyn RawAssetLoader>) -> Self {
        Self { raw_loader }
    }

    fn convert(path: &str, document: &GltfDocument) -> Result<LoadedModel, AssetLoadError> {
        // Like most viewers, we only consider the first mesh of a document.
        let Some(mesh) = document.meshes.first() else {
            return Err(AssetLoadError::NoMeshes { path: path.to_string() });
        };

        let primitives = mesh
            .primitives
            .iter()
            .enumerate()
            .map(|(primitive_index, primitive)| {
                let topology = PrimitiveTopology::try_from(primitive.mode).unwrap_or_else(|mode| {
                    warn!("{}: Unknown primitive mode {}, assuming triangles", path, mode);
                    PrimitiveTopology::Triangles
                });

                PrimitiveDescriptor {
                    asset_path: path.to_string(),
                    mesh_index: 0,
                    primitive_index,
                    attributes: primitive.attributes.keys().cloned().collect(),
                    vertex_count: primitive
                        .attributes
                        .get("POSITION")
                        .map(|&accessor| document.accessors[accessor].count)
                        .unwrap_or(0),
                    index_count: primitive
                        .indices
                        .map(|accessor| document.accessors[accessor].count)
                        .unwrap_or(0),
                    topology,
                    material: primitive.material,
                }
            })
            .collect();

        let base_dir = document_directory(path);
        let materials = document
            .materials
            .iter()
            .enumerate()
            .map(|(index, material)| Material {
                name: material.name.clone(),
                base_color_texture: document
                    .base_color_image_uri(index)
                    .and_then(|uri| resolve_uri(base_dir, uri)),
                base_color_factor: material
                    .pbr_metallic_roughness
                    .as_ref()
                    .and_then(|pbr| pbr.base_color_factor)
                    .map(Vec4::from_array)
                    .unwrap_or(Vec4::ONE),
            })
            .collect();

        let animation = document.animations.first().map(|animation| AnimationClip {
            name: animation.name.clone(),
            duration: document.animation_duration(animation),
            channel_count: animation.channels.len(),
        });

        let skeleton = document.skins.first().map(|skin| Skeleton {
            joint_count: skin.joints.len(),
        });

        Ok(LoadedModel {
            primitives,
            materials,
            animation,
            skeleton,
        })
    }
}

impl AssetLoader<Result<LoadedModel, AssetLoadError>> for ModelLoader {
    fn load(&self, path: &str) -> Result<LoadedModel, AssetLoadError> {
        let buf = self
            .raw_loader
            .load_raw_owned(path)
            .ok_or_else(|| AssetLoadError::NotFound { path: path.to_string() })?;

        let document = GltfReader::parse_slice(&buf).map_err(|source| AssetLoadError::Parse {
            path: path.to_string(),
            source,
        })?;

        let model = ModelLoader::convert(path, &document)?;
        trace!(
            "Loaded {}: {} primitives, {} materials, animated: {}",
            path,
            model.primitives.len(),
            model.materials.len(),
            model.animation.is_some()
        );
        Ok(model)
    }
}

/// The directory part of an asset path, `""` for files at the asset root.
fn document_directory(path: &str) -> &str {
    path.rfind('/').map(|pos| &path[..pos]).unwrap_or("")
}

fn resolve_uri(base_dir: &str, uri: &str) -> Option<String> {
    if uri.starts_with("data:") {
        warn!("Embedded image data is not supported, ignoring texture");
        return None;
    }

    let uri = uri.trim_start_matches("./");
    if base_dir.is_empty() {
        Some(uri.to_string())
    } else {
        Some(format!("{}/{}", base_dir, uri))
    }
}
