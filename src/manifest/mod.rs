pub(crate) mod schema;
pub mod transcript;
pub mod visual;
