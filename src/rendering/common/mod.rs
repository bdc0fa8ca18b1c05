/// basic types (e.g. mesh) to abstract away from both the asset format and the render backend.
pub mod types;
