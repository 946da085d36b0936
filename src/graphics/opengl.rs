//! A small set of safe wrappers around the raw OpenGL calls needed to draw the tutorial triangle.
//!
//! Everything here hangs off a [`GlContext`]: the value that proves the `gl` function pointers
//! were loaded for a context that is current on this thread. Every object below borrows it, so
//! no GPU object can outlive its context and none of them can cross to another thread. Shader
//! and program handling lives in the `shading` crate; [`GlContext`] only supplies the driver
//! calls through [`ShaderDriver`].
//!
//! Knowledge of OpenGL is assumed. [Learn OpenGL](https://learnopengl.com/) covers the concepts,
//! and [docs.gl](http://docs.gl/) has the reference pages for each `gl*` call used here.

use std::ffi::{c_void, CStr};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::null;

use gl;
use gl::types::*;
use image::{imageops, RgbaImage};
use log::debug;

use shading::{Program, ProgramHandle, ShaderDriver, ShaderHandle, ShaderStage, VertexAttribute, VertexLayout};

use crate::error::GlError;
use super::utils::*;

/// Loaded OpenGL entry points for the context current on this thread.
///
/// Not `Send` or `Sync`: OpenGL calls are only valid on the thread the context is current on.
/// The `gl` crate keeps its function pointers in one process-wide table, so only one
/// `GlContext` may be alive in the process at a time.
pub struct GlContext {
    _thread_bound: PhantomData<*const ()>,
}

impl GlContext {
    /// Loads the `gl` function pointers through `loader`.
    ///
    /// # Safety
    ///
    /// A 3.2+ core-profile context must be current on the calling thread and must stay current
    /// for as long as the returned value (and anything borrowing it) is alive. `loader` must
    /// resolve symbols for that context. The pointers are stored process-wide and overwrite any
    /// previously loaded set, so no other `GlContext` may be alive, on any thread, while this
    /// one is.
    pub unsafe fn load_with<F>(loader: F) -> Result<Self, GlError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let required = [
            ("CreateShader", gl::CreateShader::is_loaded()),
            ("GetShaderInfoLog", gl::GetShaderInfoLog::is_loaded()),
            ("LinkProgram", gl::LinkProgram::is_loaded()),
            ("BindFragDataLocation", gl::BindFragDataLocation::is_loaded()),
            ("GenVertexArrays", gl::GenVertexArrays::is_loaded()),
            ("GenFramebuffers", gl::GenFramebuffers::is_loaded()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, loaded)| !loaded) {
            return Err(GlError::MissingEntryPoint(*name));
        }

        Ok(Self { _thread_bound: PhantomData })
    }

    pub fn vendor(&self) -> Option<String> { gl_string(gl::VENDOR) }

    pub fn renderer(&self) -> Option<String> { gl_string(gl::RENDERER) }

    pub fn version(&self) -> Option<String> { gl_string(gl::VERSION) }

    pub fn shading_language_version(&self) -> Option<String> { gl_string(gl::SHADING_LANGUAGE_VERSION) }
}

impl ShaderDriver for GlContext {
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderHandle> {
        let id = unsafe { gl::CreateShader(stage_kind(stage)) };
        if id == 0 { None } else { Some(ShaderHandle::new(id, stage)) }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { gl::DeleteShader(shader.id()) }
    }

    fn shader_source(&self, shader: ShaderHandle, source: &CStr) {
        unsafe { gl::ShaderSource(shader.id(), 1, &source.as_ptr(), null()) }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { gl::CompileShader(shader.id()) }
    }

    fn compile_status(&self, shader: ShaderHandle) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader.id(), gl::COMPILE_STATUS, &mut status) };
        is_true(status)
    }

    fn shader_info_log(&self, shader: ShaderHandle, buf: &mut [u8]) -> usize {
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(shader.id(), buf.len() as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }
        written.max(0) as usize
    }

    fn create_program(&self) -> Option<ProgramHandle> {
        let id = unsafe { gl::CreateProgram() };
        if id == 0 { None } else { Some(ProgramHandle::new(id)) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { gl::DeleteProgram(program.id()) }
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::AttachShader(program.id(), shader.id()) }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::DetachShader(program.id(), shader.id()) }
    }

    fn bind_frag_data_location(&self, program: ProgramHandle, color: u32, name: &CStr) {
        unsafe { gl::BindFragDataLocation(program.id(), color, name.as_ptr()) }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { gl::LinkProgram(program.id()) }
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program.id(), gl::LINK_STATUS, &mut status) };
        is_true(status)
    }

    fn program_info_log(&self, program: ProgramHandle, buf: &mut [u8]) -> usize {
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(program.id(), buf.len() as GLsizei, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }
        written.max(0) as usize
    }

    fn use_program(&self, program: ProgramHandle) {
        unsafe { gl::UseProgram(program.id()) }
    }

    fn attrib_location(&self, program: ProgramHandle, name: &CStr) -> Option<u32> {
        let location = unsafe { gl::GetAttribLocation(program.id(), name.as_ptr()) };
        if location < 0 { None } else { Some(location as u32) }
    }
}

/// Represents a [vertex buffer object (VBO)](https://en.wikipedia.org/wiki/Vertex_buffer_object):
/// vertex data living on the graphics card. Vertices don't have to be spatial; the triangle's
/// buffer carries colours alongside positions.
pub struct GlVertexBuffer<'gl> {
    _gl: &'gl GlContext,
    id: GLuint,
}

impl<'gl> GlVertexBuffer<'gl> {
    /// Uploads `data` with `STATIC_DRAW`, since it is written once and drawn every frame.
    pub fn init(context: &'gl GlContext, data: &[f32]) -> Self {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };

        let vbo = Self { _gl: context, id };
        vbo.bind();
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * size_of::<f32>()) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        debug!("uploaded {} floats to buffer {}", data.len(), id);
        vbo
    }

    pub fn bind(&self) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, self.id) }
    }
}

impl Drop for GlVertexBuffer<'_> {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.id) }
    }
}

/// A vertex array object: the recorded mapping from a vertex buffer to a program's inputs.
pub struct GlVertexArray<'gl> {
    _gl: &'gl GlContext,
    id: GLuint,
}

impl<'gl> GlVertexArray<'gl> {
    /// Records `layout` for `buffer` against the inputs of `program`. Every attribute in the
    /// layout must be an active input of the program.
    pub fn init(
        context: &'gl GlContext,
        program: &Program<'_, GlContext>,
        buffer: &GlVertexBuffer<'_>,
        layout: &VertexLayout,
    ) -> Result<Self, GlError> {
        debug_assert!(layout.is_well_formed(), "malformed vertex layout {:?}", layout);

        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        let vao = Self { _gl: context, id };

        vao.bind();
        buffer.bind();
        let recorded = layout.attributes().iter().try_for_each(|attribute| {
            let location = program.attribute_location(attribute.name)?;
            set_vertex_attrib(location, attribute, layout);
            Ok::<(), GlError>(())
        });

        // Unbind so later buffer binds can't modify the recorded state
        unsafe {
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }
        recorded?;

        Ok(vao)
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.id) }
    }
}

impl Drop for GlVertexArray<'_> {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.id) }
    }
}

/// Tells the bound vertex array how to read `attribute` out of the bound array buffer.
pub fn set_vertex_attrib(location: GLuint, attribute: &VertexAttribute, layout: &VertexLayout) {
    unsafe {
        gl::VertexAttribPointer(
            location,
            attribute.components as GLint,
            gl::FLOAT,
            gl::FALSE,
            layout.byte_stride() as GLsizei,
            attribute.byte_offset() as *const c_void,
        );
        gl::EnableVertexAttribArray(location);
    }
}

/// An offscreen RGBA8 colour target. Headless contexts have no usable default framebuffer, so
/// all drawing goes here.
pub struct GlFrameBuffer<'gl> {
    _gl: &'gl GlContext,
    id: GLuint,
    color: GLuint,
    width: u32,
    height: u32,
}

impl<'gl> GlFrameBuffer<'gl> {
    /// `width` and `height` must not exceed [`RenderConfig::MAX_DIMENSION`](crate::config::RenderConfig::MAX_DIMENSION).
    pub fn init(context: &'gl GlContext, width: u32, height: u32) -> Result<Self, GlError> {
        debug_assert!(width <= i32::MAX as u32 && height <= i32::MAX as u32);

        let (mut id, mut color) = (0, 0);
        unsafe {
            gl::GenFramebuffers(1, &mut id);
            gl::GenRenderbuffers(1, &mut color);
        }
        let fbo = Self { _gl: context, id, color, width, height };

        let status = unsafe {
            gl::BindRenderbuffer(gl::RENDERBUFFER, color);
            gl::RenderbufferStorage(gl::RENDERBUFFER, gl::RGBA8, width as GLsizei, height as GLsizei);
            gl::BindRenderbuffer(gl::RENDERBUFFER, 0);

            gl::BindFramebuffer(gl::FRAMEBUFFER, id);
            gl::FramebufferRenderbuffer(gl::FRAMEBUFFER, gl::COLOR_ATTACHMENT0, gl::RENDERBUFFER, color);
            gl::CheckFramebufferStatus(gl::FRAMEBUFFER)
        };

        if status != gl::FRAMEBUFFER_COMPLETE {
            unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, 0) };
            return Err(GlError::IncompleteFramebuffer(status));
        }

        debug!("created {}x{} framebuffer {}", width, height, id);
        Ok(fbo)
    }

    /// Binds for drawing and sets the viewport to cover the whole target.
    pub fn bind(&self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id);
            gl::Viewport(0, 0, self.width as GLsizei, self.height as GLsizei);
        }
    }

    pub fn read_pixels(&self) -> Result<Snapshot, GlError> {
        let mut rgba = vec![0u8; self.width as usize * self.height as usize * 4];
        unsafe {
            gl::BindFramebuffer(gl::READ_FRAMEBUFFER, self.id);
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::ReadPixels(
                0,
                0,
                self.width as GLsizei,
                self.height as GLsizei,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                rgba.as_mut_ptr() as *mut c_void,
            );
        }
        check_errors("glReadPixels")?;

        Ok(Snapshot { width: self.width, height: self.height, rgba })
    }
}

impl Drop for GlFrameBuffer<'_> {
    fn drop(&mut self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            gl::DeleteFramebuffers(1, &self.id);
            gl::DeleteRenderbuffers(1, &self.color);
        }
    }
}

/// Pixels read back from a framebuffer, in OpenGL's bottom-to-top row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Snapshot {
    /// The pixel at `(x, y)`, with `y = 0` at the bottom. `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.rgba.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Converts to a top-to-bottom image.
    pub fn to_image(&self) -> Result<RgbaImage, GlError> {
        let image = RgbaImage::from_raw(self.width, self.height, self.rgba.clone()).ok_or(GlError::PixelBuffer {
            width: self.width,
            height: self.height,
            len: self.rgba.len(),
        })?;

        Ok(imageops::flip_vertical(&image))
    }
}
