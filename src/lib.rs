#[macro_use] extern crate clap;

pub mod config;
pub mod error;
pub mod graphics;
pub mod interface;

pub use config::RenderConfig;
pub use error::GlError;
