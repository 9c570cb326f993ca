//! Page window over an ordered result.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A 0-based page index and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSpec {
    /// 0-based page index.
    pub index: usize,
    /// Records per page. Never zero once validated.
    pub size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec {
            index: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    /// Creates a page spec, rejecting a zero page size.
    pub fn new(index: usize, size: usize) -> Result<Self> {
        let spec = PageSpec { index, size };
        spec.validate()?;
        Ok(spec)
    }

    /// The first page at `size`.
    pub fn first(size: usize) -> Result<Self> {
        PageSpec::new(0, size)
    }

    /// Checks the page size.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            Err(QueryError::InvalidPageSize)
        } else {
            Ok(())
        }
    }

    /// `ceil(matches / size)`; zero when nothing matches.
    pub fn page_count(&self, matches: usize) -> usize {
        if self.size == 0 {
            0
        } else {
            matches.div_ceil(self.size)
        }
    }

    /// This page with its index clamped to the last valid page.
    ///
    /// With no matches the index becomes 0.
    pub fn clamp(&self, matches: usize) -> PageSpec {
        let last = self.page_count(matches).saturating_sub(1);
        PageSpec {
            index: self.index.min(last),
            size: self.size,
        }
    }

    /// Range of ordered positions shown on this page, after clamping.
    pub fn window(&self, matches: usize) -> Range<usize> {
        let page = self.clamp(matches);
        let start = page.index.saturating_mul(page.size).min(matches);
        let end = start.saturating_add(page.size).min(matches);
        start..end
    }
}
