//! Env-file store
//!
//! Reads and rewrites `KEY=VALUE` entries in a dotenv-style file. Lines that
//! are not touched keep their content and order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::neon::ConnectionUris;

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_.\-]*)\s*=\s*(.*?)\s*$")
        .expect("hardcoded regex must be valid")
});

static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("hardcoded regex must be valid")
});

/// Errors that can occur reading or writing an env file
#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Parse { path: PathBuf },

    #[error("Invalid env key: '{0}'")]
    InvalidKey(String),
}

/// Load all entries of an env file; a missing file yields an empty map
pub fn load(path: &Path) -> Result<BTreeMap<String, String>, EnvFileError> {
    let content = read_content(path)?;
    Ok(parse(&content))
}

/// Parse dotenv content. Lines that are not assignments are ignored and a
/// later assignment of the same key wins.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let caps = ENTRY_RE.captures(line)?;
            Some((caps[1].to_string(), unquote(&caps[2])))
        })
        .collect()
}

/// Set `key` to `value`, replacing the first existing assignment in place or
/// appending a new line. Later assignments of the same key are removed.
pub fn set_value(path: &Path, key: &str, value: &str) -> Result<(), EnvFileError> {
    if !KEY_RE.is_match(key) {
        return Err(EnvFileError::InvalidKey(key.to_string()));
    }

    let content = read_content(path)?;
    let updated = apply_value(&content, key, value);

    std::fs::write(path, updated).map_err(|source| EnvFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %key, "env value written");
    Ok(())
}

/// Pure form of [`set_value`] operating on file content.
///
/// An assignment is any line [`parse`] reads as `key`, including the
/// `export KEY=` and `KEY = value` forms, so the result holds exactly one.
pub fn apply_value(content: &str, key: &str, value: &str) -> String {
    let line = format!("{}=\"{}\"", key, value);
    let mut updated = String::with_capacity(content.len() + line.len() + 1);
    let mut replaced = false;

    for raw in content.split_inclusive('\n') {
        let body = raw.trim_end_matches('\n').trim_end_matches('\r');
        if !assigns(body, key) {
            updated.push_str(raw);
            continue;
        }
        if !replaced {
            updated.push_str(&line);
            updated.push_str(&raw[body.len()..]);
            replaced = true;
        }
    }

    if !replaced {
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&line);
        updated.push('\n');
    }
    updated
}

fn assigns(line: &str, key: &str) -> bool {
    !line.trim_start().starts_with('#')
        && ENTRY_RE
            .captures(line)
            .is_some_and(|caps| &caps[1] == key)
}

/// Write both connection strings, pooled first.
///
/// The two writes are independent: if the second fails the first stays applied.
pub fn replace_connection(
    uris: &ConnectionUris,
    path: &Path,
    pooled_key: &str,
    unpooled_key: &str,
) -> Result<(), EnvFileError> {
    set_value(path, pooled_key, &uris.pooled)?;
    set_value(path, unpooled_key, &uris.unpooled)
}

/// The connection string currently stored under `pooled_key`, if any
pub fn current_connection_uri(
    path: &Path,
    pooled_key: &str,
) -> Result<Option<String>, EnvFileError> {
    Ok(load(path)?.remove(pooled_key))
}

fn read_content(path: &Path) -> Result<String, EnvFileError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
        Err(source) => {
            return Err(EnvFileError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    String::from_utf8(bytes).map_err(|_| EnvFileError::Parse {
        path: path.to_path_buf(),
    })
}

fn unquote(raw: &str) -> String {
    for quote in ['"', '\'', '`'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            return if quote == '"' {
                inner.replace("\\n", "\n")
            } else {
                inner.to_string()
            };
        }
    }
    // Unquoted values end at an inline comment
    match raw.find(" #") {
        Some(idx) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_path(temp: &TempDir) -> PathBuf {
        temp.path().join(".env.local")
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(load(&env_path(&temp)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_permissive() {
        let content = "# comment\nDATABASE_URL=\"postgres://a\"\nexport TOKEN='abc'\nnot a line\nPORT=3000 # web\nEMPTY=\n";
        let env = parse(content);
        assert_eq!(env.get("DATABASE_URL").unwrap(), "postgres://a");
        assert_eq!(env.get("TOKEN").unwrap(), "abc");
        assert_eq!(env.get("PORT").unwrap(), "3000");
        assert_eq!(env.get("EMPTY").unwrap(), "");
        assert_eq!(env.len(), 4);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, [0x41, 0x3d, 0xff, 0xfe]).unwrap();
        assert!(matches!(load(&path), Err(EnvFileError::Parse { .. })));
    }

    #[test]
    fn test_set_value_replaces_in_place() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "DATABASE_URL=\"old\"\nOTHER=1\n").unwrap();

        set_value(&path, "DATABASE_URL", "new").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "DATABASE_URL=\"new\"\nOTHER=1\n");
        assert_eq!(load(&path).unwrap().get("DATABASE_URL").unwrap(), "new");
    }

    #[test]
    fn test_set_value_appends_one_line() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "A=1\nB=2\n").unwrap();

        set_value(&path, "DATABASE_URL", "postgres://x").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.ends_with("DATABASE_URL=\"postgres://x\"\n"));
    }

    #[test]
    fn test_set_value_adds_separator_without_trailing_newline() {
        assert_eq!(apply_value("A=1", "B", "2"), "A=1\nB=\"2\"\n");
        assert_eq!(apply_value("", "B", "2"), "B=\"2\"\n");
    }

    #[test]
    fn test_set_value_collapses_duplicates() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "DATABASE_URL=a\nOTHER=1\nDATABASE_URL=b\n").unwrap();

        set_value(&path, "DATABASE_URL", "new").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "DATABASE_URL=\"new\"\nOTHER=1\n"
        );
        assert_eq!(load(&path).unwrap().get("DATABASE_URL").unwrap(), "new");
    }

    #[test]
    fn test_set_value_replaces_export_and_spaced_forms() {
        let updated = apply_value("export DATABASE_URL=old\nOTHER=1\n", "DATABASE_URL", "new");
        assert_eq!(updated, "DATABASE_URL=\"new\"\nOTHER=1\n");

        let content = "A=1\nDATABASE_URL = old\n  export DATABASE_URL='x'\n";
        let updated = apply_value(content, "DATABASE_URL", "new");
        assert_eq!(updated, "A=1\nDATABASE_URL=\"new\"\n");
        assert_eq!(parse(&updated).get("DATABASE_URL").unwrap(), "new");
    }

    #[test]
    fn test_set_value_ignores_commented_assignments() {
        let updated = apply_value("# DATABASE_URL=old\n", "DATABASE_URL", "new");
        assert_eq!(updated, "# DATABASE_URL=old\nDATABASE_URL=\"new\"\n");
    }

    #[test]
    fn test_set_value_does_not_match_prefix_keys() {
        let content = "DATABASE_URL_UNPOOLED=\"u\"\n";
        let updated = apply_value(content, "DATABASE_URL", "p");
        assert_eq!(updated, "DATABASE_URL_UNPOOLED=\"u\"\nDATABASE_URL=\"p\"\n");
    }

    #[test]
    fn test_set_value_keeps_dollar_signs_literal() {
        let updated = apply_value("PASS=old\n", "PASS", "a$1b");
        assert_eq!(updated, "PASS=\"a$1b\"\n");
    }

    #[test]
    fn test_set_value_preserves_crlf() {
        let updated = apply_value("A=1\r\nB=2\r\n", "A", "x");
        assert_eq!(updated, "A=\"x\"\r\nB=2\r\n");
    }

    #[test]
    fn test_set_value_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        set_value(&path, "DATABASE_URL", "postgres://x").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "DATABASE_URL=\"postgres://x\"\n"
        );
    }

    #[test]
    fn test_replace_connection_writes_both() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "# db\nDATABASE_URL=\"old\"\nSECRET=keep\n").unwrap();

        let uris = ConnectionUris {
            pooled: "postgres://pooled".to_string(),
            unpooled: "postgres://direct".to_string(),
        };
        replace_connection(&uris, &path, "DATABASE_URL", "DATABASE_URL_UNPOOLED").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "# db\nDATABASE_URL=\"postgres://pooled\"\nSECRET=keep\nDATABASE_URL_UNPOOLED=\"postgres://direct\"\n"
        );
    }

    #[test]
    fn test_replace_connection_is_not_rolled_back() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "DATABASE_URL=\"old\"\n").unwrap();

        let uris = ConnectionUris {
            pooled: "postgres://pooled".to_string(),
            unpooled: "postgres://direct".to_string(),
        };
        let result = replace_connection(&uris, &path, "DATABASE_URL", "BAD KEY");

        assert!(matches!(result, Err(EnvFileError::InvalidKey(_))));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "DATABASE_URL=\"postgres://pooled\"\n"
        );
    }

    #[test]
    fn test_current_connection_uri() {
        let temp = TempDir::new().unwrap();
        let path = env_path(&temp);
        fs::write(&path, "DATABASE_URL=\"postgres://h/db\"\n").unwrap();
        assert_eq!(
            current_connection_uri(&path, "DATABASE_URL").unwrap(),
            Some("postgres://h/db".to_string())
        );
        assert_eq!(current_connection_uri(&path, "OTHER").unwrap(), None);
    }
}
