//! `+++`-fenced TOML front matter.
//!
//! ```text
//! +++
//! title = "Blog"
//! [[sections]]
//! hasPagingParams = true
//! +++
//! body...
//! ```
//!
//! The table becomes the document map; the body is kept under `contents`.

use thiserror::Error;

use crate::{
    document::{Map, Value, to_toml_table},
    paginate::{CloneError, deep_clone},
};

const FENCE: &str = "+++";

/// Key holding the raw file body.
pub const CONTENTS: &str = "contents";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter opened with `+++` is never closed")]
    Unterminated,

    #[error("invalid front matter")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document is a {0}, expected a map")]
    NotAMap(&'static str),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error("cannot serialize front matter")]
    Toml(#[from] toml::ser::Error),
}

/// Strip a trailing `\n` or `\r\n`.
fn trim_newline(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(line)
}

/// Split `text` into front matter and body.
///
/// Text that does not open with a fence line has no front matter.
pub fn split(text: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let Some(first) = text.split_inclusive('\n').next() else {
        return Ok((None, text));
    };
    if trim_newline(first) != FENCE {
        return Ok((None, text));
    }

    let matter_start = first.len();
    let mut offset = matter_start;
    for line in text[matter_start..].split_inclusive('\n') {
        if trim_newline(line) == FENCE {
            return Ok((
                Some(&text[matter_start..offset]),
                &text[offset + line.len()..],
            ));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated)
}

/// Parse a markdown file into a document.
pub fn parse(text: &str) -> Result<Value, FrontMatterError> {
    let (matter, body) = split(text)?;
    let mut map = match matter {
        Some(matter) => Map::from(toml::from_str::<toml::Table>(matter)?),
        None => Map::new(),
    };
    map.insert(CONTENTS, Value::bytes(body.as_bytes()));
    Ok(Value::Map(map))
}

/// Render a document back into file bytes.
///
/// Keys other than `contents` go to the front matter, which is left out
/// when empty. `contents` may be bytes or a string.
pub fn render_document(document: &Value) -> Result<Vec<u8>, RenderError> {
    // Shared nodes are inlined on output; copying first rejects cycles.
    let document = deep_clone(document)?;
    let map = match document {
        Value::Map(map) => map,
        other => return Err(RenderError::NotAMap(other.type_name())),
    };

    let mut table = to_toml_table(&map);
    table.remove(CONTENTS);

    let mut out = Vec::new();
    if !table.is_empty() {
        out.extend_from_slice(FENCE.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(toml::to_string(&table)?.as_bytes());
        out.extend_from_slice(FENCE.as_bytes());
        out.push(b'\n');
    }
    match map.get(CONTENTS) {
        Some(Value::Bytes(body)) => out.extend_from_slice(body),
        Some(Value::String(body)) => out.extend_from_slice(body.as_bytes()),
        _ => {}
    }
    Ok(out)
}
