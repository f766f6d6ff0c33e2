// ExifTool process wrapper

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{JournalError, Result};

/// Program name looked up on PATH when no explicit path is configured.
pub const DEFAULT_PROGRAM: &str = "exiftool";

/// Handle to the external metadata tool. Cheap to clone; each call spawns one process.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `exiftool -ver`, mainly to fail early when the tool is missing.
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-ver")
            .output()
            .map_err(|e| self.spawn_error(&self.program, e))?;

        if !output.status.success() {
            return Err(JournalError::ExifTool {
                path: self.program.clone(),
                message: format!("`-ver` exited with {}", output.status),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run the tool on a single file and return its stdout.
    pub fn run<I, S>(&self, args: I, file: &Path) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .arg(file)
            .output()
            .map_err(|e| self.spawn_error(file, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(JournalError::ExifTool {
                path: file.to_path_buf(),
                message: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(output.stdout)
    }

    fn spawn_error(&self, path: &Path, err: std::io::Error) -> JournalError {
        let message = if err.kind() == std::io::ErrorKind::NotFound {
            format!(
                "{} not found. Install exiftool (https://exiftool.org/install.html) \
                 or point --exiftool at it",
                self.program.display()
            )
        } else {
            format!("failed to run {}: {}", self.program.display(), err)
        };
        JournalError::ExifTool {
            path: path.to_path_buf(),
            message,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write an executable shell script standing in for exiftool.
    #[cfg(unix)]
    pub(crate) fn write_stub(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("exiftool-stub");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_missing_program() {
        let tool = ExifTool::new("/nonexistent/travel-journal/exiftool");
        let err = tool.run(["-json"], Path::new("a.jpg")).unwrap_err();
        match err {
            JournalError::ExifTool { path, message } => {
                assert_eq!(path, PathBuf::from("a.jpg"));
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(tool.version().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let stub = write_stub(dir.path(), r#"if [ "$1" = "-ver" ]; then echo 12.40; exit 0; fi
for last; do :; done
echo "file=$last""#);
        let tool = ExifTool::new(&stub);

        assert_eq!(tool.version().unwrap(), "12.40");
        let stdout = tool.run(["-json"], Path::new("x.jpg")).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap().trim(), "file=x.jpg");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let stub = write_stub(dir.path(), "echo 'Error: File not found' >&2\nexit 1");
        let err = ExifTool::new(&stub)
            .run(["-json"], Path::new("missing.jpg"))
            .unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
