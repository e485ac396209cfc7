//! # Run mode selection.
//!
//! The front end decides between running the service and (un)registering it
//! with the host's service manager. Registration itself is out of scope; the
//! core only reports which mode was asked for.

use std::fmt;

/// What the process was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Run the orchestrator.
    #[default]
    Service,
    /// Register the service with the host.
    Install,
    /// Remove the service registration.
    Uninstall,
}

/// `install` and `uninstall` were both requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("install and uninstall are mutually exclusive")]
pub struct ConflictingModes;

impl RunMode {
    /// Turns the two front-end flags into a mode.
    pub fn from_flags(install: bool, uninstall: bool) -> Result<Self, ConflictingModes> {
        match (install, uninstall) {
            (true, true) => Err(ConflictingModes),
            (true, false) => Ok(RunMode::Install),
            (false, true) => Ok(RunMode::Uninstall),
            (false, false) => Ok(RunMode::Service),
        }
    }

    /// Scans raw arguments for `/install` and `/uninstall` (case-insensitive).
    ///
    /// Other arguments are ignored; they are passed through to the workers.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConflictingModes> {
        let has = |flag: &str| args.iter().any(|a| a.as_ref().eq_ignore_ascii_case(flag));
        Self::from_flags(has("/install"), has("/uninstall"))
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunMode::Service => "service",
            RunMode::Install => "install",
            RunMode::Uninstall => "uninstall",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_select_mode() {
        assert_eq!(RunMode::from_flags(false, false), Ok(RunMode::Service));
        assert_eq!(RunMode::from_flags(true, false), Ok(RunMode::Install));
        assert_eq!(RunMode::from_flags(false, true), Ok(RunMode::Uninstall));
        assert_eq!(RunMode::from_flags(true, true), Err(ConflictingModes));
    }

    #[test]
    fn args_are_matched_case_insensitively() {
        assert_eq!(RunMode::from_args(&["x", "/INSTALL"]), Ok(RunMode::Install));
        assert_eq!(RunMode::from_args(&["/Uninstall"]), Ok(RunMode::Uninstall));
        assert_eq!(RunMode::from_args::<&str>(&[]), Ok(RunMode::Service));
        assert!(RunMode::from_args(&["/install", "/uninstall"]).is_err());
    }
}
