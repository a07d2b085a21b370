//! Typed errors for GPU resource creation.

use thiserror::Error;

use super::ProgramKind;

/// A shader program that cannot be built. Either is fatal at startup.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// WGSL failed to parse or validate; carries the compiler diagnostic.
    #[error("{program} shader failed to compile:\n{log}")]
    Compile { program: ProgramKind, log: String },

    /// The module compiled but lacks a required entry point.
    #[error("{program} shader failed to link: {log}")]
    Link { program: ProgramKind, log: String },
}

impl ShaderError {
    pub fn program(&self) -> ProgramKind {
        match self {
            ShaderError::Compile { program, .. } | ShaderError::Link { program, .. } => *program,
        }
    }
}

/// A pixel buffer that cannot become a sprite sheet.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("expected {expected} bytes of RGBA8 for {width}x{height}, got {actual}")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Sheets are addressed in 8x8 cells; smaller images hold no cell.
    #[error("image {width}x{height} is smaller than one 8x8 cell")]
    TooSmall { width: u32, height: u32 },
}
