use gl;
use gl::types::*;
use log::{debug, info};

use shading::triangle::{
    TRIANGLE_FRAGMENT_SOURCE, TRIANGLE_FRAG_OUTPUT, TRIANGLE_LAYOUT, TRIANGLE_VERTEX_SOURCE, TRIANGLE_VERTICES,
};
use shading::{Program, Shader, ShaderSource};

use crate::config::RenderConfig;
use crate::error::GlError;
use super::opengl::{GlContext, GlFrameBuffer, GlVertexArray, GlVertexBuffer, Snapshot};
use super::utils::check_errors;

/// Everything needed to draw the tutorial triangle: the linked program, its vertex buffer and the
/// vertex array describing it.
pub struct TriangleScene<'gl> {
    vao: GlVertexArray<'gl>,
    _vbo: GlVertexBuffer<'gl>,
    program: Program<'gl, GlContext>,
    vertex_count: usize,
}

impl<'gl> TriangleScene<'gl> {
    pub fn new(gl: &'gl GlContext) -> Result<Self, GlError> {
        Self::with_sources(
            gl,
            &ShaderSource::new(TRIANGLE_VERTEX_SOURCE)?,
            &ShaderSource::new(TRIANGLE_FRAGMENT_SOURCE)?,
        )
    }

    /// Builds the scene with replacement shaders. They must take the same `position` / `inColor`
    /// inputs and write `outColor`.
    pub fn with_sources(gl: &'gl GlContext, vert: &ShaderSource, frag: &ShaderSource) -> Result<Self, GlError> {
        let vert = Shader::from_vert_source(gl, vert)?;
        let frag = Shader::from_frag_source(gl, frag)?;
        let program = Program::link(gl, &[&vert, &frag], TRIANGLE_FRAG_OUTPUT)?;

        let vbo = GlVertexBuffer::init(gl, &TRIANGLE_VERTICES);
        let vao = GlVertexArray::init(gl, &program, &vbo, &TRIANGLE_LAYOUT)?;

        Ok(Self {
            vao,
            _vbo: vbo,
            program,
            vertex_count: TRIANGLE_LAYOUT.vertex_count(&TRIANGLE_VERTICES),
        })
    }

    /// Clears the bound framebuffer to `clear_color` and draws the triangle. Fails if the driver
    /// raised an error along the way.
    pub fn draw(&self, clear_color: [f32; 4]) -> Result<(), GlError> {
        let [r, g, b, a] = clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        self.program.bind();
        self.vao.bind();
        unsafe {
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count as GLsizei);
            gl::BindVertexArray(0);
        }

        check_errors("triangle draw")
    }
}

/// Draws the triangle once into an offscreen target sized by `config` and reads it back.
pub fn render_triangle(gl: &GlContext, config: &RenderConfig) -> Result<Snapshot, GlError> {
    info!("rendering {}x{} (aspect {:.3})", config.width, config.height, config.aspect());

    let target = GlFrameBuffer::init(gl, config.width, config.height)?;
    let scene = TriangleScene::new(gl)?;

    // Errors left over from setup would otherwise be blamed on the draw
    check_errors("scene setup")?;

    target.bind();
    scene.draw(config.clear_color)?;
    unsafe { gl::Finish() };
    debug!("triangle drawn");

    target.read_pixels()
}
