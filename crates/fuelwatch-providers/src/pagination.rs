//! Page-numbered listing fetches.
//!
//! Listing sites serve a fixed number of entries per page. A short page marks
//! the end of the listing. A failed page ends the walk early, keeping what was
//! collected so far.

use std::future::Future;

use crate::error::ProviderError;

/// Requests pages `1..=max_pages` in order through `fetch_page` and
/// concatenates the results.
///
/// Stops after the first page holding fewer than `page_size` items, after
/// `max_pages`, or after the first failing page. A failure is logged at
/// `warn` and never returned.
pub async fn fetch_paginated<T, F, Fut>(
    label: &str,
    page_size: usize,
    max_pages: u32,
    mut fetch_page: F,
) -> Vec<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ProviderError>>,
{
    let mut items = Vec::new();

    for page in 1..=max_pages {
        match fetch_page(page).await {
            Ok(batch) => {
                let count = batch.len();
                items.extend(batch);
                tracing::debug!(label, page, count, "fetched page");
                if count < page_size {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(label, page, error = %e, "page fetch failed; keeping partial result");
                break;
            }
        }
    }

    items
}
