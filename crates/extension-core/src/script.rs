//! Built extension script lookup and serialization

use crate::error::{ExtensionError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the build artifact relative to the project root
pub const SCRIPT_PATH: [&str; 2] = ["build", "main.js"];

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn script_path(root: &Path) -> PathBuf {
    SCRIPT_PATH.iter().fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Path of the built script, or [`ExtensionError::MissingScriptFile`]
pub fn locate(root: &Path) -> Result<PathBuf> {
    let path = script_path(root);
    if path.exists() {
        Ok(path)
    } else {
        Err(ExtensionError::MissingScriptFile { path })
    }
}

/// Read the script, drop one trailing line terminator and base64-encode it
pub async fn serialize(path: &Path) -> Result<String, ScriptError> {
    let contents = tokio::fs::read(path).await.map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(STANDARD.encode(chomp(&contents)))
}

/// Strip a single trailing `\n`, `\r\n` or `\r`
pub fn chomp(bytes: &[u8]) -> &[u8] {
    if let Some(rest) = bytes.strip_suffix(b"\r\n") {
        rest
    } else if let Some(rest) = bytes.strip_suffix(b"\n") {
        rest
    } else if let Some(rest) = bytes.strip_suffix(b"\r") {
        rest
    } else {
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_chomp_strips_one_terminator() {
        assert_eq!(chomp(b"console.log(1);\n"), b"console.log(1);");
        assert_eq!(chomp(b"a\r\n"), b"a");
        assert_eq!(chomp(b"a\r"), b"a");
        assert_eq!(chomp(b"a\n\n"), b"a\n");
        assert_eq!(chomp(b"a"), b"a");
        assert_eq!(chomp(b""), b"");
    }

    #[test]
    fn test_locate_missing_script() {
        let root = TempDir::new().unwrap();
        let err = locate(root.path()).unwrap_err();
        match err {
            ExtensionError::MissingScriptFile { path } => {
                assert!(path.ends_with("build/main.js"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_serialize_encodes_chomped_contents() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("build")).unwrap();
        std::fs::write(root.path().join("build/main.js"), "console.log('hi');\n").unwrap();

        let path = locate(root.path()).unwrap();
        let encoded = serialize(&path).await.unwrap();
        assert_eq!(encoded, STANDARD.encode("console.log('hi');"));
    }

    #[tokio::test]
    async fn test_serialize_keeps_non_utf8_bytes() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("main.js");
        std::fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

        assert_eq!(serialize(&path).await.unwrap(), STANDARD.encode([0xff, 0xfe]));
    }

    #[tokio::test]
    async fn test_serialize_read_failure() {
        let root = TempDir::new().unwrap();
        // a directory at the script path exists but cannot be read as a file
        let path = script_path(root.path());
        std::fs::create_dir_all(&path).unwrap();

        let err = serialize(&path).await.unwrap_err();
        assert!(matches!(err, ScriptError::Read { .. }));
    }
}
