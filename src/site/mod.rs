//! Content directory as a [`Collection`].
//!
//! Every file under the content directory becomes one entry keyed by its
//! relative path with `/` separators. Markdown files are split into front
//! matter and body; anything else is kept as raw bytes under `contents`.

mod front_matter;

pub use front_matter::{CONTENTS, FrontMatterError, RenderError, parse, render_document, split};

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;
use walkdir::WalkDir;

use crate::document::{Collection, Map, Value};

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("cannot walk content directory")]
    Walk(#[from] walkdir::Error),

    #[error("bad front matter in `{key}`")]
    FrontMatter {
        key: String,
        #[source]
        source: FrontMatterError,
    },

    #[error("key `{0}` does not name a file inside the output directory")]
    UnsafeKey(String),

    #[error("cannot render `{key}`")]
    Render {
        key: String,
        #[source]
        source: RenderError,
    },
}

/// Collection key for `path` below `root`.
fn entry_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|part| part.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Path for `key` below `root`, if every segment is a plain file name.
fn entry_path(root: &Path, key: &str) -> Option<PathBuf> {
    key.split('/').try_fold(root.to_path_buf(), |path, part| {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(path.join(name)),
            _ => None,
        }
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn load_entry(path: &Path, key: &str) -> Result<Value, SiteError> {
    if is_markdown(path) {
        let text = fs::read_to_string(path).map_err(|err| SiteError::Io(path.to_path_buf(), err))?;
        parse(&text).map_err(|source| SiteError::FrontMatter {
            key: key.to_owned(),
            source,
        })
    } else {
        let data = fs::read(path).map_err(|err| SiteError::Io(path.to_path_buf(), err))?;
        let mut map = Map::with_capacity(1);
        map.insert(CONTENTS, Value::bytes(data));
        Ok(Value::Map(map))
    }
}

/// Load every file under `dir`.
///
/// Paths that are not valid UTF-8 are skipped.
pub fn load_collection(dir: &Path) -> Result<Collection, SiteError> {
    let mut collection = Collection::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        let Some(key) = entry_key(dir, entry.path()) else {
            continue;
        };
        let document = load_entry(entry.path(), &key)?;
        collection.insert(key, document);
    }
    Ok(collection)
}

/// Write the entries named by `keys` below `dir`, creating parent
/// directories. Keys missing from `collection` are skipped; keys with
/// empty, `.` or `..` segments are rejected before anything is written
/// for them.
///
/// Returns the number of files written.
pub fn write_entries<'a, I>(dir: &Path, collection: &Collection, keys: I) -> Result<usize, SiteError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut written = 0;
    for key in keys {
        let path = entry_path(dir, key).ok_or_else(|| SiteError::UnsafeKey(key.to_owned()))?;
        let Some(document) = collection.get(key) else {
            continue;
        };
        let data = render_document(document).map_err(|source| SiteError::Render {
            key: key.to_owned(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| SiteError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&path, data).map_err(|err| SiteError::Io(path.clone(), err))?;
        written += 1;
    }
    Ok(written)
}
