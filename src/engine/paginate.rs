//! Paginator - page slicing, clamped navigation and range metadata

/// Number of pages for `len` rows; never less than one
///
/// A page size of zero is treated as one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Rows of `page` (1-based); empty when the page lies past the end
pub fn slice<T>(filtered: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= filtered.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(filtered.len());
    &filtered[start..end]
}

/// Result of a page request after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goto {
    /// The clamped page equals the current one; nothing to re-render
    Unchanged(usize),
    Moved(usize),
}

impl Goto {
    pub fn page(&self) -> usize {
        match self {
            Goto::Unchanged(page) | Goto::Moved(page) => *page,
        }
    }
}

/// Clamp `requested` into `[1, total]` and compare it with `current`
pub fn goto(requested: usize, current: usize, total: usize) -> Goto {
    let clamped = requested.clamp(1, total.max(1));
    if clamped == current {
        Goto::Unchanged(clamped)
    } else {
        Goto::Moved(clamped)
    }
}

/// 1-based inclusive row range shown on a page, for "start to end of total"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

pub fn range(len: usize, page: usize, page_size: usize) -> PageRange {
    let start = if len == 0 {
        0
    } else {
        page.saturating_sub(1) * page_size + 1
    };
    PageRange {
        start,
        end: (page * page_size).min(len),
        total: len,
    }
}

/// Navigation metadata for the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub range: PageRange,
}

impl PageInfo {
    /// First/previous controls are enabled
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Next/last controls are enabled
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Page size and current page
///
/// `current_page` stays within `[1, total_pages]` for the filtered length
/// it was last clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current_page: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// A new page size always restarts at page one
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(page_size)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Move to `requested`, clamped against `len` filtered rows
    pub fn goto(&mut self, requested: usize, len: usize) -> Goto {
        let outcome = goto(requested, self.current_page, self.total_pages(len));
        self.current_page = outcome.page();
        outcome
    }

    /// Pull the current page back into range after the row count changed
    pub fn clamp(&mut self, len: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(len));
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    pub fn slice<'a, T>(&self, filtered: &'a [T]) -> &'a [T] {
        slice(filtered, self.current_page, self.page_size)
    }

    pub fn info(&self, len: usize) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            total_pages: self.total_pages(len),
            page_size: self.page_size,
            range: range(len, self.current_page, self.page_size),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}
