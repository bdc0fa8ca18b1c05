/// Caches of GPU resident assets, shared between all chunks.
pub mod asset_cache;
pub mod backend;
pub mod common;
pub mod loader;
/// The renderables that chunks are made of: ground planes, static and animated models.
pub mod models;
