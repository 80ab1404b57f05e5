pub mod pagination;
pub mod sort_parser;

pub use pagination::{PageWindow, PaginationRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use sort_parser::{SortOrder, SortSpec};
