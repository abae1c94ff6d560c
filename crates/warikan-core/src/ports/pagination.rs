/// Which slice of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// One page of results plus the total row count of the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, count: u64) -> Self {
        Self { items, count }
    }

    /// Slice an already-ordered, fully loaded listing.
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let count = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.page_size as usize)
            .collect();
        Self { items, count }
    }

    pub fn num_pages(&self, page_size: u64) -> u64 {
        self.count.div_ceil(page_size.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sorted() {
        let page = Page::from_sorted((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.count, 25);
        assert_eq!(page.num_pages(10), 3);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_saturates() {
        let request = PageRequest::new(u64::MAX, 10);
        assert_eq!(request.offset(), u64::MAX);

        let page = Page::from_sorted(vec![1, 2, 3], request);
        assert!(page.items.is_empty());
        assert_eq!(page.count, 3);
    }
}
