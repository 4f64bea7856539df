//! Page arithmetic.
//!
//! Everything here is pure: item counts in, page numbers and offsets out.
//! Page numbers are one-based, start offsets zero-based.

use crate::document::{Map, Value};

/// Field names written into a pagination section.
pub mod fields {
    pub const NUMBER_OF_BLOGS: &str = "numberOfBlogs";
    pub const NUMBER_OF_PAGES: &str = "numberOfPages";
    pub const PAGE_LENGTH: &str = "pageLength";
    pub const PAGE_START: &str = "pageStart";
    pub const PAGE_NUMBER: &str = "pageNumber";
    pub const PAGINATION: &str = "pagination";

    /// Marker identifying the section to patch.
    pub const HAS_PAGING_PARAMS: &str = "hasPagingParams";
}

/// Number of pages needed to show `items` items, `page_size` per page.
///
/// A page size of zero yields zero pages rather than dividing by zero;
/// configuration validation rejects it before this is reached.
pub const fn page_count(items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        items.div_ceil(page_size)
    }
}

/// Item total and page size, fixed for a whole pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSet {
    pub total: usize,
    pub page_size: usize,
    pub pages: usize,
}

impl PageSet {
    pub const fn new(total: usize, page_size: usize) -> Self {
        Self {
            total,
            page_size,
            pages: page_count(total, page_size),
        }
    }

    /// Window for a one-based page number.
    pub const fn window(&self, current: usize) -> PageWindow {
        PageWindow::new(current, self.total, self.pages, self.page_size)
    }

    /// Windows for every page, first to last.
    pub fn windows(&self) -> impl Iterator<Item = PageWindow> + '_ {
        (1..=self.pages).map(|current| self.window(current))
    }
}

/// Position of one page within the paginated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Total item count
    pub total: usize,
    /// Total page count
    pub pages: usize,
    pub page_size: usize,
    /// Zero-based offset of the first item on this page
    pub start: usize,
    /// One-based page number
    pub current: usize,
}

impl PageWindow {
    pub const fn new(current: usize, total: usize, pages: usize, page_size: usize) -> Self {
        Self {
            total,
            pages,
            page_size,
            start: current.saturating_sub(1) * page_size,
            current,
        }
    }

    pub const fn is_first(&self) -> bool {
        self.current <= 1
    }

    pub const fn is_last(&self) -> bool {
        self.current >= self.pages
    }

    pub const fn previous(&self) -> Option<usize> {
        if self.is_first() {
            None
        } else {
            Some(self.current - 1)
        }
    }

    pub const fn next(&self) -> Option<usize> {
        if self.is_last() {
            None
        } else {
            Some(self.current + 1)
        }
    }

    /// The `pagination` descriptor map.
    pub fn descriptor(&self) -> Value {
        let numbers = (1..=self.pages).map(Value::from).collect();
        let map: Map = [
            ("isFirstPage", Value::from(self.is_first())),
            ("isLastPage", Value::from(self.is_last())),
            ("previousPage", Value::from(self.previous())),
            ("nextPage", Value::from(self.next())),
            ("pageNumbers", Value::Seq(numbers)),
        ]
        .into_iter()
        .collect();
        Value::Map(map)
    }

    /// Field values to patch for this page.
    pub fn fields(&self, with_descriptor: bool) -> Map {
        let mut map: Map = [
            (fields::NUMBER_OF_BLOGS, Value::from(self.total)),
            (fields::NUMBER_OF_PAGES, Value::from(self.pages)),
            (fields::PAGE_LENGTH, Value::from(self.page_size)),
            (fields::PAGE_START, Value::from(self.start)),
            (fields::PAGE_NUMBER, Value::from(self.current)),
        ]
        .into_iter()
        .collect();
        if with_descriptor {
            map.insert(fields::PAGINATION, self.descriptor());
        }
        map
    }
}
