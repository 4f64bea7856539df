//! Listing-page generation.
//!
//! Turns one template document plus the items under a key prefix into a
//! numbered sequence of listing documents.
//!
//! # Flow
//!
//! ```text
//! paginate()
//!     │
//!     ├── validate()        page size, template present, section present
//!     ├── count items       keys under `item_directory`, template excluded
//!     ├── PageSet::new()    pages = ceil(items / page_size)
//!     │       └── pages <= 1 → done, nothing touched
//!     ├── page 1            patch the template's section in place
//!     └── pages 2..=N       deep_clone(template) → patch → insert `{dir}/{n}.md`
//! ```
//!
//! Pages are cloned from the template *after* page 1 was patched. A failure
//! on page `k` stops the run; pages before `k` stay in the collection.

mod clone;
mod error;
mod patch;
mod validate;
mod window;

use std::{fmt, ops::Bound};

pub use clone::{CloneError, deep_clone};
pub use error::{PageError, PaginateError};
pub use patch::{PatchError, has_section, patch_fields, patch_section};
pub use validate::validate;
pub use window::{PageSet, PageWindow, fields, page_count};

use crate::{
    config::PaginationConfig,
    document::{Collection, Value},
};

/// Receiver for diagnostic messages. Purely observational.
pub trait DebugSink {
    fn debug(&self, args: fmt::Arguments<'_>);
}

impl<F: Fn(fmt::Arguments<'_>)> DebugSink for F {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl DebugSink for Silent {
    fn debug(&self, _: fmt::Arguments<'_>) {}
}

macro_rules! debug {
    ($sink:expr, $($arg:tt)*) => {
        $sink.debug(format_args!($($arg)*))
    };
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No item under the item directory; nothing changed.
    NoItems,
    /// All items fit on the template page; nothing changed.
    SinglePage { items: usize },
    /// Template patched as page 1, `generated` holds the keys of pages 2..=N.
    Paginated {
        items: usize,
        pages: usize,
        generated: Vec<String>,
    },
}

impl Outcome {
    /// Whether the collection was modified.
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Paginated { .. })
    }
}

/// Count collection keys under the item directory, template excluded.
pub fn count_items(collection: &Collection, config: &PaginationConfig) -> usize {
    let prefix = config.item_directory.as_str();
    collection
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|(key, _)| key.starts_with(prefix))
        .filter(|(key, _)| **key != config.template)
        .count()
}

/// Key under which page `page` is stored.
pub fn page_key(config: &PaginationConfig, page: usize) -> String {
    format!("{}/{page}.md", config.output_directory())
}

/// Validate and work out the page set without touching the collection.
pub fn plan(collection: &Collection, config: &PaginationConfig) -> Result<PageSet, PaginateError> {
    let page_size = validate(config, collection)?;
    Ok(PageSet::new(count_items(collection, config), page_size))
}

/// [`paginate_with`] without diagnostics.
pub fn paginate(
    collection: &mut Collection,
    config: &PaginationConfig,
) -> Result<Outcome, PaginateError> {
    paginate_with(collection, config, &Silent)
}

/// Paginate `collection` in place.
///
/// Callers must not run two passes over the same collection at once.
pub fn paginate_with(
    collection: &mut Collection,
    config: &PaginationConfig,
    sink: &dyn DebugSink,
) -> Result<Outcome, PaginateError> {
    let set = plan(collection, config)?;
    debug!(sink, "running with options: {config:?}");

    if set.total == 0 {
        debug!(sink, "no items found in {}", config.item_directory);
        return Ok(Outcome::NoItems);
    }

    debug!(sink, "found {} items, creating {} pages", set.total, set.pages);
    if set.pages <= 1 {
        debug!(sink, "only one page needed, skipping pagination");
        return Ok(Outcome::SinglePage { items: set.total });
    }

    let template = collection
        .get_mut(&config.template)
        .ok_or_else(|| PaginateError::MissingTemplate(config.template.clone()))?;
    patch_section(template, &set.window(1).fields(config.descriptor)).map_err(|err| {
        PaginateError::PageGeneration {
            page: 1,
            generated: Vec::new(),
            source: err.into(),
        }
    })?;
    debug!(sink, "updated template {} with pagination parameters", config.template);

    let mut generated = Vec::with_capacity(set.pages - 1);
    for window in set.windows().skip(1) {
        let result = collection
            .get(&config.template)
            .ok_or_else(|| PaginateError::MissingTemplate(config.template.clone()))
            .map(|template| build_page(template, &window, config.descriptor));
        let page = match result? {
            Ok(page) => page,
            Err(source) => {
                return Err(PaginateError::PageGeneration {
                    page: window.current,
                    generated,
                    source,
                });
            }
        };

        let key = page_key(config, window.current);
        collection.insert(key.clone(), page);
        debug!(sink, "created pagination page {key}");
        generated.push(key);
    }

    Ok(Outcome::Paginated {
        items: set.total,
        pages: set.pages,
        generated,
    })
}

/// Copy the (already patched) template and patch the copy for `window`.
fn build_page(template: &Value, window: &PageWindow, descriptor: bool) -> Result<Value, PageError> {
    let mut page = deep_clone(template)?;
    // The copy is value-equal to the template, so it has the section too.
    patch_section(&mut page, &window.fields(descriptor))?;
    Ok(page)
}
