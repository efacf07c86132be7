/// Collapse threshold: up to this many pages every button is shown
const MAX_BUTTONS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

/// Page cursor over a server-paginated collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
    total_items: u64,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total_items: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn set_total_items(&mut self, total: u64) {
        self.total_items = total;
    }

    /// Always at least one page
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_items.div_ceil(u64::from(self.limit));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Move to `page` if it lies in `[1, total_pages]`. Returns whether the
    /// page changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    /// Set the page without range checks; the next fetch settles the total
    pub fn jump_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Jump back to the first page without range checks (new search)
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn prev(&mut self) -> bool {
        self.page > 1 && self.go_to(self.page - 1)
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page numbers to render: everything for short ranges, otherwise the
    /// first and last page plus a window of three around the current page
    pub fn buttons(&self) -> Vec<PageButton> {
        let total = self.total_pages();
        if total <= MAX_BUTTONS {
            return (1..=total).map(PageButton::Page).collect();
        }

        let left = self.page.saturating_sub(1).max(1);
        let right = (self.page + 1).min(total);

        let mut buttons = vec![PageButton::Page(1)];
        if left > 2 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.extend(
            (left..=right)
                .filter(|p| *p != 1 && *p != total)
                .map(PageButton::Page),
        );
        if right < total - 1 {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page(total));
        buttons
    }

    /// One-based item range shown on the current page, `None` when empty
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total_items == 0 {
            return None;
        }
        let start = u64::from(self.page - 1) * u64::from(self.limit) + 1;
        let end = (u64::from(self.page) * u64::from(self.limit)).min(self.total_items);
        Some((start, end))
    }
}
