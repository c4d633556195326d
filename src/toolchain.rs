//! Handoff to a native C compiler.
//!
//! Generated C is written by the caller; this module only locates a compiler,
//! runs it as a subprocess and interprets its exit status.

use crate::error::ToolchainError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Compilers tried in order when none is configured.
pub const DEFAULT_COMPILERS: &[&str] = &["cc", "gcc", "clang"];

/// Diagnostics a successful build printed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub warnings: String,
}

#[derive(Debug, Clone)]
pub struct Toolchain {
    compiler: PathBuf,
}

impl Toolchain {
    /// Uses the first of [`DEFAULT_COMPILERS`] found on `PATH`.
    pub fn detect() -> Result<Self, ToolchainError> {
        DEFAULT_COMPILERS
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(|compiler| Self { compiler })
            .ok_or_else(|| ToolchainError::NotFound(DEFAULT_COMPILERS.join(", ")))
    }

    /// Uses an explicit compiler, given as a bare name or a path.
    pub fn with_compiler(compiler: impl AsRef<Path>) -> Result<Self, ToolchainError> {
        let compiler = compiler.as_ref();
        which::which(compiler)
            .map(|compiler| Self { compiler })
            .map_err(|_| ToolchainError::NotFound(compiler.display().to_string()))
    }

    pub fn compiler(&self) -> &Path {
        &self.compiler
    }

    /// Compiles `c_file` into the executable `exe`.
    pub fn build(&self, c_file: &Path, exe: &Path) -> Result<BuildOutput, ToolchainError> {
        debug!(
            compiler = %self.compiler.display(),
            input = %c_file.display(),
            output = %exe.display(),
            "invoking C compiler"
        );

        let output = Command::new(&self.compiler)
            .arg("-o")
            .arg(exe)
            .arg(c_file)
            .arg("-lm")
            .output()
            .map_err(|source| ToolchainError::Launch {
                compiler: self.compiler.clone(),
                source,
            })?;

        let mut captured = String::from_utf8_lossy(&output.stderr).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stdout));
        let captured = captured.trim().to_string();

        if !output.status.success() {
            return Err(ToolchainError::Failed {
                status: output.status,
                stderr: captured,
            });
        }

        if !captured.is_empty() {
            warn!("C compiler reported: {}", captured);
        }
        Ok(BuildOutput { warnings: captured })
    }
}
