//! Live query description

use crate::domain::{newest_first, Item};

/// "All items ordered by `createdAt` descending", the one query the view runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Query;

impl Query {
    pub fn newest_first() -> Self {
        Query
    }

    /// Remote field the result set is ordered by
    pub fn order_by(&self) -> &'static str {
        "createdAt"
    }

    pub fn direction(&self) -> &'static str {
        "desc"
    }

    /// Sort a full result set in place, pending timestamps first
    pub fn sort(&self, items: &mut [Item]) {
        items.sort_by(newest_first);
    }
}
