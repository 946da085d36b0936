use shading::ShaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("failed to create an OpenGL 3.2 core context: {0}")]
    Context(String),

    #[error("failed to make the OpenGL context current: {0}")]
    MakeCurrent(String),

    #[error("OpenGL entry point gl{0} could not be loaded")]
    MissingEntryPoint(&'static str),

    #[error("OpenGL error 0x{code:04X} during {during}")]
    Driver { during: &'static str, code: u32 },

    #[error("framebuffer is incomplete (status 0x{0:04X})")]
    IncompleteFramebuffer(u32),

    #[error("{len} bytes of pixel data do not make a {width}x{height} RGBA image")]
    PixelBuffer { width: u32, height: u32, len: usize },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}
