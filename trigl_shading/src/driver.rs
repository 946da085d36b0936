//! The seam between shader logic and the graphics driver.

use std::ffi::CStr;
use std::fmt;

/// The programmable stages this crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A driver-owned shader object. The id is whatever the driver handed back from
/// [`ShaderDriver::create_shader`]; the stage is the one it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle {
    id: u32,
    stage: ShaderStage,
}

impl ShaderHandle {
    pub fn new(id: u32, stage: ShaderStage) -> Self {
        Self { id, stage }
    }

    pub fn id(&self) -> u32 { self.id }

    pub fn stage(&self) -> ShaderStage { self.stage }
}

/// A driver-owned shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(u32);

impl ProgramHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 { self.0 }
}

/// The subset of a graphics API needed to compile shaders and link them into programs.
///
/// Methods take `&self` because the driver state lives behind the context, not in the
/// implementing value. Implementations are expected to be bound to the one thread that owns the
/// context; none of these calls may be issued from anywhere else.
///
/// The info log methods mirror `glGetShaderInfoLog`: write at most `buf.len() - 1` bytes followed
/// by a nul terminator, and return the number of bytes written, not counting the terminator.
/// Callers still clamp the returned length, so a driver that over-reports cannot cause a read past
/// the buffer.
pub trait ShaderDriver {
    /// Returns `None` if the driver refused to create the object.
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderHandle>;
    fn delete_shader(&self, shader: ShaderHandle);

    /// Replaces whatever source was previously associated with `shader`.
    fn shader_source(&self, shader: ShaderHandle, source: &CStr);
    fn compile_shader(&self, shader: ShaderHandle);
    fn compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle, buf: &mut [u8]) -> usize;

    fn create_program(&self) -> Option<ProgramHandle>;
    fn delete_program(&self, program: ProgramHandle);
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);

    /// Binds fragment shader output `name` to colour attachment `color`. Only takes effect on the
    /// next link.
    fn bind_frag_data_location(&self, program: ProgramHandle, color: u32, name: &CStr);
    fn link_program(&self, program: ProgramHandle);
    fn link_status(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle, buf: &mut [u8]) -> usize;
    fn use_program(&self, program: ProgramHandle);

    /// Location of an active vertex input, or `None` if the linked program has no such input.
    fn attrib_location(&self, program: ProgramHandle, name: &CStr) -> Option<u32>;
}
