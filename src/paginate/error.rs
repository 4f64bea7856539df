//! Pagination error types.

use thiserror::Error;

use super::{clone::CloneError, patch::PatchError};
use crate::config::ConfigError;

/// Errors ending a pagination run.
///
/// Everything except `PageGeneration` is raised before the collection is
/// touched. `PageGeneration` leaves earlier pages in place; their keys are
/// listed in `generated`.
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0} template file is required")]
    MissingTemplate(String),

    #[error("{0} must contain a section with hasPagingParams: true")]
    MissingPaginationSection(String),

    #[error("Failed to create page {page}")]
    PageGeneration {
        page: usize,
        generated: Vec<String>,
        #[source]
        source: PageError,
    },
}

impl PaginateError {
    /// Page number that failed, for `PageGeneration`.
    pub const fn page(&self) -> Option<usize> {
        match self {
            Self::PageGeneration { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Returns true if the collection was left untouched.
    pub const fn is_precondition(&self) -> bool {
        !matches!(self, Self::PageGeneration { .. })
    }
}

/// Failure while building a single page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}
