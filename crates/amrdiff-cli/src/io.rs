/// Input reading with size enforcement, UTF-8 validation and JSON decoding.
///
/// All filesystem and stdin access of the `amrdiff` binary happens here;
/// `amrdiff-core` never does I/O. Every failure maps to a [`CliError`] with
/// exit code 2.
use std::io::Read as _;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads the entire contents of `source` into a `String`.
///
/// Disk files are size-checked via `std::fs::metadata` before any read; stdin
/// goes through a `Read::take` cap so the allocation stays bounded.
///
/// # Errors
///
/// Returns [`CliError`] for a missing or unreadable file, input over
/// `max_size`, other I/O errors, and invalid UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Decodes `content` as JSON, reporting line and column on failure.
///
/// # Errors
///
/// Returns [`CliError::InvalidJson`] if `content` is not a valid `T`.
pub fn parse_json<T: DeserializeOwned>(content: &str, source: &str) -> Result<T, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::InvalidJson {
        source: source.to_owned(),
        detail: format!("line {}, column {}: {e}", e.line(), e.column()),
    })
}

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();
    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read input file");
    bytes_to_string(&bytes, &path.display().to_string())
}

fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

/// Reads stdin up to `max_size` bytes, then probes one more byte to tell
/// "exactly at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();
    let mut buf: Vec<u8> = Vec::new();

    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    tracing::debug!(bytes = buf.len(), "read stdin");
    bytes_to_string(&buf, "-")
}

fn bytes_to_string(bytes: &[u8], source_label: &str) -> Result<String, CliError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(CliError::InvalidUtf8 {
            source: source_label.to_owned(),
            byte_offset: e.valid_up_to(),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use std::io::Write as _;
    use std::path::PathBuf;

    use amrdiff_core::AmrTriples;

    use super::*;

    fn temp_file_with(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        f.write_all(contents).expect("write temp file");
        f
    }

    #[test]
    fn read_valid_utf8_file() {
        let content = r#"{"instances":[]}"#;
        let f = temp_file_with(content.as_bytes());
        let source = PathOrStdin::Path(f.path().to_path_buf());
        assert_eq!(read_input(&source, 1024).expect("read"), content);
    }

    #[test]
    fn read_file_exactly_at_limit_succeeds() {
        let f = temp_file_with(b"hello");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        assert_eq!(read_input(&source, 5).expect("at limit"), "hello");
    }

    #[test]
    fn read_file_over_limit_reports_actual_size() {
        let f = temp_file_with(b"hello world");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        match read_input(&source, 4).expect_err("over limit") {
            CliError::FileTooLarge {
                actual: Some(n),
                limit,
                ..
            } => {
                assert_eq!(n, 11);
                assert_eq!(limit, 4);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn read_invalid_utf8_returns_offset() {
        let mut data = b"{\"a\"".to_vec();
        data.push(0xFF);
        let f = temp_file_with(&data);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        match read_input(&source, 1024).expect_err("bad UTF-8") {
            CliError::InvalidUtf8 { byte_offset, .. } => assert_eq!(byte_offset, 4),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn read_nonexistent_file_returns_file_not_found() {
        let source = PathOrStdin::Path(PathBuf::from("/no/such/file/ever.json"));
        let err = read_input(&source, 1024).expect_err("missing");
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    #[test]
    fn parse_json_accepts_triples() {
        let triples: AmrTriples =
            parse_json(r#"{"instances":[{"variable":"a","concept":"dog"}]}"#, "gold.json")
                .expect("parse");
        assert_eq!(triples.instances.len(), 1);
    }

    #[test]
    fn parse_json_reports_position() {
        let err = parse_json::<AmrTriples>("{\n  \"instances\": 3\n}", "gold.json")
            .expect_err("wrong shape");
        match err {
            CliError::InvalidJson { source, detail } => {
                assert_eq!(source, "gold.json");
                assert!(detail.starts_with("line 2"), "detail: {detail}");
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }
}
