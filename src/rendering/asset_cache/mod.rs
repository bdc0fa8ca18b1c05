pub mod model_cache;
pub mod texture_provider;
