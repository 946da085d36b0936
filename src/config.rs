//! Settings for the offscreen render target.
//!
//! These used to be loose process-wide values (screen size, clear colour). They are now one
//! value built by the CLI and passed to whatever needs it.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("render target must be at least 1x1, got {width}x{height}")]
    EmptySize { width: u32, height: u32 },

    #[error("render target {width}x{height} exceeds {max} pixels on a side")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("invalid colour `{0}`: expected four comma-separated components between 0 and 1")]
    Color(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            clear_color: [0.2, 0.5, 0.8, 1.0],
        }
    }
}

impl RenderConfig {
    /// Largest side the driver's signed size arguments can hold.
    pub const MAX_DIMENSION: u32 = i32::MAX as u32;

    pub fn new(width: u32, height: u32, clear_color: [f32; 4]) -> Result<Self, ConfigError> {
        let config = Self { width, height, clear_color };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptySize { width: self.width, height: self.height });
        }

        if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
                max: Self::MAX_DIMENSION,
            });
        }

        if !self.clear_color.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(ConfigError::Color(format!("{:?}", self.clear_color)));
        }

        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Parses `r,g,b,a`, each component in `0.0..=1.0`.
    pub fn parse_color(s: &str) -> Result<[f32; 4], ConfigError> {
        let err = || ConfigError::Color(s.to_owned());

        let components = s
            .split(',')
            .map(|c| c.trim().parse::<f32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;

        if components.len() != 4 || !components.iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(err());
        }

        Ok([components[0], components[1], components[2], components[3]])
    }
}
