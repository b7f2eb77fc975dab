//! Page-numbered pagination shared by the marketplace searches.
//!
//! Both APIs take a 1-based `page` query parameter. Fetching stops at the
//! first page that is empty or lacks the product envelope, and never reaches
//! [`PAGE_CAP`]. With a cap of 2 only the first page is ever requested, which
//! keeps each search to a single upstream call per marketplace.

use std::future::Future;

use crate::error::ScraperError;

/// First page number that is never requested.
pub const PAGE_CAP: u32 = 2;

/// Outcome of fetching one page.
#[derive(Debug)]
pub enum Page<T> {
    /// The product envelope was present; may be empty.
    Items(Vec<T>),
    /// The response had no product envelope at all.
    Missing,
}

/// Calls `fetch_page(1)`, `fetch_page(2)`, ... and concatenates the items
/// until a page comes back empty or missing, or [`PAGE_CAP`] is reached.
///
/// # Errors
///
/// Propagates the first error returned by `fetch_page`; items collected from
/// earlier pages are discarded.
pub async fn collect_pages<T, F, Fut>(platform: &str, mut fetch_page: F) -> Result<Vec<T>, ScraperError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ScraperError>>,
{
    let mut collected = Vec::new();
    let mut page = 1u32;

    while page < PAGE_CAP {
        match fetch_page(page).await? {
            Page::Items(items) if !items.is_empty() => {
                tracing::debug!(platform, page, count = items.len(), "fetched search page");
                collected.extend(items);
                page += 1;
            }
            Page::Items(_) => {
                tracing::debug!(platform, page, "empty search page, stopping");
                break;
            }
            Page::Missing => {
                tracing::debug!(platform, page, "response has no product list, stopping");
                break;
            }
        }
    }

    Ok(collected)
}
