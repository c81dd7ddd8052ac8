//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the per-URL state machine (unvisited, admitted, captured, recorded, ...)
//! - `PageRecord` / `SiteMap`: the crawl's primary output
//! - `VisitedSet`: URLs claimed by the traversal, shared across all passes
//! - `CrawlState`: the mutable state one crawl invocation threads through every pass

mod page_state;
mod site_map;

// Re-export main types
pub use page_state::PageState;
pub use site_map::{CrawlState, PageRecord, SiteMap, VisitedSet};
