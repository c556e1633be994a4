//! Natural ("human") ordering of file names.
//!
//! A name is split into alternating text and digit runs, so `"z23a"` becomes
//! `[Text("z"), Number(23), Text("a")]`. Keys always start with a text chunk
//! (possibly empty) and alternate from there, so two keys compare chunk for
//! chunk without ever pitting a number against text at the same position.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chunk {
    Text(String),
    Number(u128),
}

/// Split `s` into its natural-order key.
///
/// Digit runs too long for a `u128` stay as text, the same way an
/// unparseable run would.
pub fn alphanum_key(s: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = s;

    loop {
        let digits_at = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        chunks.push(Chunk::Text(rest[..digits_at].to_string()));
        rest = &rest[digits_at..];
        if rest.is_empty() {
            break;
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..digits_end];
        chunks.push(
            digits
                .parse::<u128>()
                .map(Chunk::Number)
                .unwrap_or_else(|_| Chunk::Text(digits.to_string())),
        );
        rest = &rest[digits_end..];
    }

    chunks
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    alphanum_key(a).cmp(&alphanum_key(b))
}

/// Order paths naturally by their full textual form.
pub fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| path_key(path));
}

fn path_key(path: &Path) -> Vec<Chunk> {
    alphanum_key(&path.to_string_lossy())
}
