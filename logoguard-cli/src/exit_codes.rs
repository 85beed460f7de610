//! Exit codes following sysexits.h conventions.
//!
//! These codes let scripts tell a rejected logo apart from a broken setup.

use logoguard_core::LogoGuardError;

use crate::commands::verify::NotLegitimate;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Unsupported upload type.
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// At least one upload is not legitimate or has no match.
/// Maps to EX_DATAERR from sysexits.h.
pub const NOT_LEGITIMATE: i32 = 65;

/// Reference directory or upload cannot be opened or decoded.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Represents an exit code with optional error context.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify by the first recognizable error in the chain
        let code = err
            .chain()
            .find_map(|cause| {
                if cause.downcast_ref::<NotLegitimate>().is_some() {
                    Some(NOT_LEGITIMATE)
                } else if let Some(e) = cause.downcast_ref::<LogoGuardError>() {
                    Some(match e {
                        LogoGuardError::UnsupportedUpload(_) => USAGE_ERROR,
                        LogoGuardError::ReferenceDirectory { .. }
                        | LogoGuardError::Io { .. }
                        | LogoGuardError::Decode(_) => INPUT_ERROR,
                        LogoGuardError::InvalidHash(_) | LogoGuardError::InvalidConfig(_) => {
                            GENERAL_ERROR
                        }
                    })
                } else if cause.downcast_ref::<std::io::Error>().is_some() {
                    Some(INPUT_ERROR)
                } else {
                    None
                }
            })
            .unwrap_or(GENERAL_ERROR);

        Self {
            code,
            message: Some(message),
        }
    }
}
