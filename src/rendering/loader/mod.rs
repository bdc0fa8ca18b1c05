use thiserror::Error;
use wonderland_files::ParserError;

/// Contrasting to the file crate, that only parses documents into plain structs,
/// Loaders are a lot more high level. They fetch the raw files and convert them into our rendering IR
pub mod model_loader;

#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("Asset {path} could not be found")]
    NotFound { path: String },
    #[error("Asset {path} could not be parsed: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParserError,
    },
    #[error("Asset {path} does not contain any meshes")]
    NoMeshes { path: String },
}
