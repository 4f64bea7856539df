//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [pagination] Section Defaults
// ============================================================================

pub mod pagination {
    pub fn pages_per_page() -> i64 {
        6
    }

    pub fn item_directory() -> String {
        "blog/".into()
    }

    pub fn template() -> String {
        "blog.md".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }
}
