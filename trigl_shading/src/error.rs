use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::driver::ShaderStage;

/// Driver diagnostic text from a failed compile or link. Never longer than
/// [`CompileDiagnostic::MAX_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileDiagnostic(String);

impl CompileDiagnostic {
    /// 512 byte log buffer, minus the terminator.
    pub const MAX_LEN: usize = 511;

    pub(crate) fn new(text: String) -> Self {
        debug_assert!(text.chars().count() <= Self::MAX_LEN);
        Self(text)
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader source is empty")]
    EmptySource,

    #[error("shader source contains a nul byte at offset {position}")]
    InteriorNul { position: usize },

    #[error("failed to read shader source {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("driver could not create a {stage} shader object")]
    CreateShader { stage: ShaderStage },

    #[error("driver could not create a shader program")]
    CreateProgram,

    #[error("{stage} shader compile failed:\n{diagnostic}")]
    Compile { stage: ShaderStage, diagnostic: CompileDiagnostic },

    #[error("shader program link failed:\n{diagnostic}")]
    Link { diagnostic: CompileDiagnostic },

    #[error("vertex attribute `{name}` is not an active input of the program")]
    MissingAttribute { name: String },

    #[error("`{name}` cannot be passed to the driver as an identifier")]
    InvalidName { name: String },
}

impl ShaderError {
    /// The driver diagnostic, for compile and link failures.
    pub fn diagnostic(&self) -> Option<&CompileDiagnostic> {
        match self {
            ShaderError::Compile { diagnostic, .. } | ShaderError::Link { diagnostic } => Some(diagnostic),
            _ => None,
        }
    }
}
