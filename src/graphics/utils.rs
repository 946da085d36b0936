use std::ffi::CStr;
use std::os::raw::c_char;

use gl;
use gl::types::*;
use log::warn;

use shading::ShaderStage;

use crate::error::GlError;

pub fn stage_kind(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

/// Reads one of the driver's identification strings (`gl::VENDOR`, `gl::RENDERER`, ...).
pub fn gl_string(name: GLenum) -> Option<String> {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return None;
    }

    let s = unsafe { CStr::from_ptr(ptr as *const c_char) };
    Some(s.to_string_lossy().into_owned())
}

/// Drains the driver's error queue, logging every pending error. Returns the first one.
pub fn take_errors(during: &str) -> Option<GLenum> {
    let mut first = None;
    loop {
        let err = unsafe { gl::GetError() };
        if err == gl::NO_ERROR {
            return first;
        }

        warn!("OpenGL error 0x{:04X} during {}", err, during);
        first.get_or_insert(err);
    }
}

/// Drains the error queue and fails with the first pending error, if any.
pub fn check_errors(during: &'static str) -> Result<(), GlError> {
    driver_result(during, take_errors(during))
}

pub fn driver_result(during: &'static str, first: Option<GLenum>) -> Result<(), GlError> {
    match first {
        Some(code) => Err(GlError::Driver { during, code }),
        None => Ok(()),
    }
}

pub fn is_true(value: GLint) -> bool {
    value != gl::FALSE as GLint
}
