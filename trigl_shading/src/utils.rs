use std::ffi::CString;

use crate::error::{CompileDiagnostic, ShaderError};

pub const INFO_LOG_CAPACITY: usize = CompileDiagnostic::MAX_LEN + 1;

/// Runs `fill` against a fixed 512 byte buffer and turns whatever it wrote into a diagnostic.
pub fn read_info_log<F>(fill: F) -> CompileDiagnostic
where
    F: FnOnce(&mut [u8]) -> usize,
{
    let mut buf = [0u8; INFO_LOG_CAPACITY];
    let written = fill(&mut buf).min(INFO_LOG_CAPACITY - 1);

    // Stop at the first nul in case the reported length counts the terminator
    let bytes = &buf[..written];
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());

    CompileDiagnostic::new(String::from_utf8_lossy(&bytes[..end]).trim_end().to_owned())
}

pub fn identifier(name: &str) -> Result<CString, ShaderError> {
    if name.is_empty() {
        return Err(ShaderError::InvalidName { name: name.to_owned() });
    }

    CString::new(name).map_err(|_| ShaderError::InvalidName { name: name.to_owned() })
}
