//! Parsing of the `page` / `pageSize` query parameters.
//!
//! Pages are 1-based. A parameter that is present but not a positive integer
//! still selects pagination mode; its value falls back to the default.

/// Page used when only `pageSize` is supplied
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when only `page` is supplied and no override is configured
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationRequest {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Effective slice of an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub skip: usize,
    pub take: usize,
}

impl PaginationRequest {
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self { page, page_size }
    }

    /// Parse raw parameter values.
    ///
    /// Returns `None` only when neither parameter is present, which is what
    /// keeps a request in plain-collection mode.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Option<PaginationRequest> {
        if page.is_none() && page_size.is_none() {
            return None;
        }

        Some(PaginationRequest {
            page: page.and_then(parse_positive),
            page_size: page_size.and_then(parse_positive),
        })
    }

    /// Resolve defaults and compute `skip`/`take`.
    ///
    /// A zero page or page size counts as missing, the same as in [`parse`].
    ///
    /// [`parse`]: PaginationRequest::parse
    pub fn window(&self, default_page_size: usize) -> PageWindow {
        let page = self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let page_size = self
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(default_page_size);

        PageWindow {
            page,
            page_size,
            skip: (page - 1).saturating_mul(page_size),
            take: page_size,
        }
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|value| *value > 0)
}
