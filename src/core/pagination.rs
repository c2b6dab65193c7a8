use std::ops::Range;

/// 1-based page cursor over a list of `len` visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    /// `page_size` of zero is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// At least one page, even for an empty list.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Slice bounds of the current page within the visible list.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    /// Page containing the row at `index`.
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size + 1
    }

    /// Moves to the last page if the current one no longer exists.
    pub fn clamp(&mut self, len: usize) -> bool {
        let total = self.total_pages(len);
        if self.page > total {
            self.page = total;
            return true;
        }
        false
    }

    /// Back to page 1. Returns true when the page moved.
    pub fn reset(&mut self) -> bool {
        let changed = self.page != 1;
        self.page = 1;
        changed
    }

    /// Ignores pages outside `1..=total_pages`.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        if page < 1 || page > self.total_pages(len) || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Changes the page size, keeping the first row of the old page on screen.
    ///
    /// Zero is rejected; values above `max` are clamped to it.
    pub fn set_page_size(&mut self, page_size: usize, max: usize, len: usize) -> bool {
        if page_size < 1 {
            return false;
        }
        let page_size = page_size.min(max.max(1));
        if page_size == self.page_size {
            return false;
        }
        let first_row = (self.page - 1) * self.page_size;
        self.page_size = page_size;
        self.page = self.page_of(first_row);
        self.clamp(len);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_still_has_one_page() {
        let pager = Pager::new(5);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.range(0), 0..0);
    }

    #[test]
    fn go_to_rejects_out_of_range() {
        let mut pager = Pager::new(2);
        assert!(!pager.go_to(0, 4));
        assert!(!pager.go_to(3, 4));
        assert!(pager.go_to(2, 4));
        assert_eq!(pager.range(4), 2..4);
    }

    #[test]
    fn clamp_moves_to_new_last_page() {
        let mut pager = Pager::new(2);
        pager.go_to(3, 6);
        assert!(pager.clamp(3));
        assert_eq!(pager.page(), 2);
        assert!(!pager.clamp(3));
    }

    #[test]
    fn page_size_change_keeps_first_row_visible() {
        let mut pager = Pager::new(5);
        pager.go_to(3, 40);
        // Old page 3 starts at row 10; with 4 per page, row 10 lives on page 3.
        assert!(pager.set_page_size(4, 20, 40));
        assert_eq!(pager.page(), 3);
        // Row 8 with 20 per page is on page 1.
        assert!(pager.set_page_size(50, 20, 40));
        assert_eq!(pager.page_size(), 20);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut pager = Pager::new(5);
        assert!(!pager.set_page_size(0, 20, 10));
        assert_eq!(pager.page_size(), 5);
    }
}
