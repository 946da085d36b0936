use std::ffi::{CStr, CString};
use std::fs;
use std::path::Path;

use log::{debug, error};

use crate::driver::{ShaderDriver, ShaderHandle, ShaderStage};
use crate::error::ShaderError;
use crate::utils::read_info_log;

/// The text of a single shader stage, ready to be handed to the driver.
///
/// Construction only checks what the driver interface needs: the text is non-empty and has no
/// interior nul, so it can travel as a nul-terminated string. The GLSL itself is not looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource(CString);

impl ShaderSource {
    pub fn new<S: Into<String>>(text: S) -> Result<Self, ShaderError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ShaderError::EmptySource);
        }

        let raw = CString::new(text.into_bytes())
            .map_err(|e| ShaderError::InteriorNul { position: e.nul_position() })?;

        Ok(Self(raw))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(text)
    }

    pub fn as_c_str(&self) -> &CStr { &self.0 }
}

/// Associates `source` with an existing shader object and compiles it once.
///
/// Any source previously given to `shader` is replaced, so the resulting compile state reflects
/// only this call. On failure the driver's info log (at most 511 characters) is logged and
/// returned in [`ShaderError::Compile`]; the handle is left alive for the caller to reuse or
/// delete.
pub fn compile<D: ShaderDriver>(driver: &D, shader: ShaderHandle, source: &ShaderSource) -> Result<(), ShaderError> {
    driver.shader_source(shader, source.as_c_str());
    driver.compile_shader(shader);

    if driver.compile_status(shader) {
        debug!("compiled {} shader {}", shader.stage(), shader.id());
        return Ok(());
    }

    let diagnostic = read_info_log(|buf| driver.shader_info_log(shader, buf));
    error!("shader compile failed ({} shader {}). Info:\n\n{}", shader.stage(), shader.id(), diagnostic);

    Err(ShaderError::Compile {
        stage: shader.stage(),
        diagnostic,
    })
}

/// A shader object owned by this process. Deleted when dropped.
pub struct Shader<'d, D: ShaderDriver> {
    driver: &'d D,
    handle: ShaderHandle,
}

impl<'d, D: ShaderDriver> Shader<'d, D> {
    /// Creates an empty shader object of the given stage.
    pub fn new(driver: &'d D, stage: ShaderStage) -> Result<Self, ShaderError> {
        let handle = driver.create_shader(stage).ok_or(ShaderError::CreateShader { stage })?;
        debug!("created {} shader {}", stage, handle.id());

        Ok(Self { driver, handle })
    }

    /// Creates and compiles a shader. The object is deleted again if compilation fails.
    pub fn from_source(driver: &'d D, stage: ShaderStage, source: &ShaderSource) -> Result<Self, ShaderError> {
        let shader = Self::new(driver, stage)?;
        shader.recompile(source)?;

        Ok(shader)
    }

    pub fn from_vert_source(driver: &'d D, source: &ShaderSource) -> Result<Self, ShaderError> {
        Self::from_source(driver, ShaderStage::Vertex, source)
    }

    pub fn from_frag_source(driver: &'d D, source: &ShaderSource) -> Result<Self, ShaderError> {
        Self::from_source(driver, ShaderStage::Fragment, source)
    }

    pub fn recompile(&self, source: &ShaderSource) -> Result<(), ShaderError> {
        compile(self.driver, self.handle, source)
    }

    pub fn handle(&self) -> ShaderHandle { self.handle }

    pub fn stage(&self) -> ShaderStage { self.handle.stage() }

    pub fn is_compiled(&self) -> bool {
        self.driver.compile_status(self.handle)
    }
}

impl<D: ShaderDriver> Drop for Shader<'_, D> {
    fn drop(&mut self) {
        debug!("deleting {} shader {}", self.handle.stage(), self.handle.id());
        self.driver.delete_shader(self.handle);
    }
}
