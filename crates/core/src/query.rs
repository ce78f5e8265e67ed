//! Paging and list results.

use serde::{Deserialize, Serialize};

/// A window over an ordered result set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Number of leading matches to skip.
    pub offset: u64,
    /// Maximum number of matches to return (`None` = unbounded).
    pub limit: Option<u64>,
}

impl Paging {
    pub fn new(offset: u64, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }
}

/// Ordered entities returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult<E> {
    items: Vec<E>,
    limit_exceeded: bool,
}

impl<E> ListResult<E> {
    /// A complete (non-truncated) result.
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items,
            limit_exceeded: false,
        }
    }

    /// Apply `paging` to the full, ordered set of matches.
    ///
    /// `limit_exceeded` is set when matches remained past the end of the page.
    pub fn paged(matches: impl IntoIterator<Item = E>, paging: Paging) -> Self {
        let offset = usize::try_from(paging.offset).unwrap_or(usize::MAX);
        let mut rest = matches.into_iter().skip(offset);

        let Some(limit) = paging.limit else {
            return Self::new(rest.collect());
        };

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let items: Vec<E> = rest.by_ref().take(limit).collect();
        let limit_exceeded = rest.next().is_some();
        Self {
            items,
            limit_exceeded,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether more matches existed beyond this page.
    pub fn limit_exceeded(&self) -> bool {
        self.limit_exceeded
    }
}

impl<E> Default for ListResult<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E> IntoIterator for ListResult<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_page_keeps_everything_after_offset() {
        let result = ListResult::paged(1..=5, Paging::new(2, None));
        assert_eq!(result.items(), &[3, 4, 5]);
        assert!(!result.limit_exceeded());
        assert_eq!(result.size(), 3);
    }

    #[test]
    fn truncated_page_flags_limit_exceeded() {
        let result = ListResult::paged(1..=5, Paging::new(0, Some(2)));
        assert_eq!(result.items(), &[1, 2]);
        assert!(result.limit_exceeded());
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let result = ListResult::paged(1..=3, Paging::new(1, Some(2)));
        assert_eq!(result.items(), &[2, 3]);
        assert!(!result.limit_exceeded());
    }

    #[test]
    fn offset_past_the_end_is_empty() {
        let result = ListResult::paged(1..=3, Paging::new(10, Some(2)));
        assert!(result.is_empty());
        assert!(!result.limit_exceeded());
    }
}
