//! Shader compilation and linking over an abstract graphics driver.
//!
//! Nothing in this crate talks to OpenGL directly. Every GPU call goes through the
//! [`ShaderDriver`](driver::ShaderDriver) trait, which the root crate implements on top of the
//! `gl` bindings and which the tests implement with an in-memory fake.

pub mod driver;
pub mod error;
pub mod program;
pub mod shader;
pub mod triangle;
pub mod vertex;
pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod fake;

pub use driver::{ProgramHandle, ShaderDriver, ShaderHandle, ShaderStage};
pub use error::{CompileDiagnostic, ShaderError};
pub use program::Program;
pub use shader::{compile, Shader, ShaderSource};
pub use vertex::{VertexAttribute, VertexLayout};
