//! `[pagination]` section configuration.
//!
//! Options handed to the paginator: page size, where items live, and which
//! document acts as the listing template.

use super::{ConfigError, defaults};
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[pagination]` section in pages.toml.
///
/// # Example
/// ```toml
/// [pagination]
/// pages_per_page = 6
/// item_directory = "blog/"
/// template = "blog.md"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Items listed per page. Signed so that a bad value in the file is
    /// reported by validation instead of a parse error.
    #[serde(default = "defaults::pagination::pages_per_page")]
    #[educe(Default = defaults::pagination::pages_per_page())]
    pub pages_per_page: i64,

    /// Key prefix of the items to paginate, usually with a trailing `/`.
    /// Generated pages are written as `{item_directory}/{n}.md`.
    #[serde(default = "defaults::pagination::item_directory")]
    #[educe(Default = defaults::pagination::item_directory())]
    pub item_directory: String,

    /// Key of the listing template document.
    #[serde(default = "defaults::pagination::template")]
    #[educe(Default = defaults::pagination::template())]
    pub template: String,

    /// Also patch a `pagination` field with first/last flags, neighbours and
    /// the full list of page numbers.
    #[serde(default)]
    pub descriptor: bool,
}

impl PaginationConfig {
    /// Validated page size.
    pub fn page_size(&self) -> Result<usize, ConfigError> {
        usize::try_from(self.pages_per_page)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                ConfigError::Validation("pagesPerPage must be greater than 0".into())
            })
    }

    /// `item_directory` without one trailing separator.
    pub fn output_directory(&self) -> &str {
        self.item_directory
            .strip_suffix('/')
            .unwrap_or(&self.item_directory)
    }
}
