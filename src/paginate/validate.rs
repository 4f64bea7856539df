//! Preconditions checked before the collection is touched.

use super::{PaginateError, patch::has_section};
use crate::{config::PaginationConfig, document::Collection};

/// Check options and template, returning the page size.
///
/// Pure: nothing in `collection` changes, whatever the outcome.
pub fn validate(config: &PaginationConfig, collection: &Collection) -> Result<usize, PaginateError> {
    let page_size = config.page_size()?;

    let template = collection
        .get(&config.template)
        .ok_or_else(|| PaginateError::MissingTemplate(config.template.clone()))?;

    if !has_section(template) {
        return Err(PaginateError::MissingPaginationSection(
            config.template.clone(),
        ));
    }

    Ok(page_size)
}
