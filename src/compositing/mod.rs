pub mod material;
pub mod uv_fit;
