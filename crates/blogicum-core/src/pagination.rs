//! Page-number pagination with clamping.

use serde::{Deserialize, Serialize};

use crate::constants::POSTS_PER_PAGE;

/// A requested 1-based page number, as received from the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest(Option<i64>);

impl PageRequest {
    /// Parse the raw `page` parameter. Anything that is not an integer
    /// counts as no request at all and yields the first page. Integers out
    /// of range saturate, so they clamp like any other large number.
    pub fn parse(raw: Option<&str>) -> Self {
        Self(raw.map(str::trim).and_then(|value| {
            value.parse().ok().or_else(|| {
                let (negative, digits) = match value.strip_prefix('-') {
                    Some(digits) => (true, digits),
                    None => (false, value.strip_prefix('+').unwrap_or(value)),
                };
                (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                    .then_some(if negative { i64::MIN } else { i64::MAX })
            })
        }))
    }

    pub fn number(number: i64) -> Self {
        Self(Some(number))
    }

    pub fn first() -> Self {
        Self(None)
    }
}

/// The slice of a collection a page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number after clamping.
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Splits collections into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    /// Number of pages for `total` items. An empty collection still has one page.
    pub fn num_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    /// Resolve a request against a collection of `total` items, clamping
    /// out-of-range numbers to the first or last page.
    pub fn window(&self, total: u64, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match request.0 {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => (n as u64).min(num_pages),
        };

        PageWindow {
            number,
            num_pages,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    /// Cut one page out of an already ordered collection.
    pub fn paginate<T>(&self, items: Vec<T>, request: PageRequest) -> Page<T> {
        let total = items.len() as u64;
        let window = self.window(total, request);
        let items = items
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();
        Page::new(items, window, total)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_garbage_page_is_first() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(35, PageRequest::parse(None)).number, 1);
        assert_eq!(paginator.window(35, PageRequest::parse(Some("abc"))).number, 1);
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let paginator = Paginator::new(10);
        assert_eq!(paginator.window(35, PageRequest::number(0)).number, 1);
        assert_eq!(paginator.window(35, PageRequest::number(-3)).number, 1);
        assert_eq!(paginator.window(35, PageRequest::number(99)).number, 4);
        assert_eq!(paginator.window(35, PageRequest::parse(Some("4"))).offset, 30);
    }

    #[test]
    fn test_oversized_page_numbers_saturate() {
        let paginator = Paginator::new(10);
        let huge = PageRequest::parse(Some("99999999999999999999"));
        assert_eq!(huge, PageRequest::number(i64::MAX));
        assert_eq!(paginator.window(35, huge).number, 4);

        let tiny = PageRequest::parse(Some(" -99999999999999999999 "));
        assert_eq!(paginator.window(35, tiny).number, 1);
        assert_eq!(PageRequest::parse(Some("9e99")), PageRequest::first());
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = Paginator::new(10).paginate(Vec::<u32>::new(), PageRequest::number(5));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_slices_items() {
        let page = Paginator::new(10).paginate((1..=25).collect(), PageRequest::number(3));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.total, 25);
    }
}
