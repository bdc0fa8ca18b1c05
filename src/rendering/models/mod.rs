pub mod animated_model;
pub mod ground;
pub mod static_model;
