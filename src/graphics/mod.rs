pub mod context;
pub mod opengl;
pub mod scene;
pub(crate) mod utils;
