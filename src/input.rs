use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{estimate_tokens, Atom, BoundingBox};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read token dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse token dump: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One positioned token as emitted by an upstream extractor
///
/// `width`/`height` default to 0 when the extractor omits extents; a
/// missing `token_count` is estimated from the text length.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub page: u32,
    #[serde(default)]
    pub token_count: Option<usize>,
}

/// Load a JSON token dump (an array of raw tokens) into an atom sequence
pub fn load_atoms(path: &Path) -> Result<Vec<Atom>, InputError> {
    let data = fs::read_to_string(path)?;
    let tokens: Vec<RawToken> = serde_json::from_str(&data)?;
    Ok(atoms_from_tokens(tokens))
}

/// Convert raw tokens into atoms, assigning sequential indices
pub fn atoms_from_tokens(tokens: Vec<RawToken>) -> Vec<Atom> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            let token_count = token
                .token_count
                .unwrap_or_else(|| estimate_tokens(&token.text));
            Atom::new(
                token.text,
                BoundingBox::new(token.x, token.y, token.width, token.height),
                token.page,
                token_count,
                index,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_tokens_become_indexed_atoms() {
        let tokens = vec![
            RawToken {
                text: "alpha".to_string(),
                x: 10.0,
                y: 100.0,
                width: 20.0,
                height: 10.0,
                page: 1,
                token_count: Some(3),
            },
            RawToken {
                text: "beta".to_string(),
                x: 40.0,
                y: 100.0,
                width: 20.0,
                height: 10.0,
                page: 1,
                token_count: None,
            },
        ];

        let atoms = atoms_from_tokens(tokens);

        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].index, 0);
        assert_eq!(atoms[0].token_count, 3);
        assert_eq!(atoms[1].index, 1);
        // Estimated from "beta" (4 chars)
        assert_eq!(atoms[1].token_count, 1);
    }

    #[test]
    fn test_load_atoms_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"text": "hello", "x": 1.0, "y": 2.0, "page": 1}}]"#
        )
        .expect("write dump");

        let atoms = load_atoms(file.path()).expect("load dump");

        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].text, "hello");
        assert_eq!(atoms[0].bounds.width, 0.0);
        assert_eq!(atoms[0].token_count, 2);
    }

    #[test]
    fn test_malformed_dump_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write dump");

        let result = load_atoms(file.path());

        assert!(matches!(result, Err(InputError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = load_atoms(Path::new("/nonexistent/atoms.json"));

        assert!(matches!(result, Err(InputError::Io(_))));
    }
}
