//! Cursor-following walk over a paginated upstream listing

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::upstream::{Upstream, UpstreamError};

/// Result of walking a listing
#[derive(Debug, Default)]
pub struct PageWalk {
    /// Accumulated `results` entries, in page order
    pub results: Vec<Value>,
    /// Number of pages fetched
    pub pages: usize,
    /// True if the walk stopped at the page ceiling with a cursor still pending
    pub truncated: bool,
}

/// Walks a `{results, next}` listing until the cursor runs out or the ceiling is hit
pub struct PageFetcher<'a, U: Upstream + ?Sized> {
    upstream: &'a U,
    max_pages: usize,
}

impl<'a, U: Upstream + ?Sized> PageFetcher<'a, U> {
    pub fn new(upstream: &'a U, max_pages: usize) -> Self {
        Self {
            upstream,
            max_pages,
        }
    }

    /// Fetch every page starting at `start_url`
    ///
    /// Any upstream error aborts the whole walk; nothing is retried here.
    pub async fn fetch_all(&self, start_url: &str) -> Result<PageWalk, UpstreamError> {
        let mut walk = PageWalk::default();
        let mut cursor = Some(start_url.to_string());

        while let Some(url) = cursor.take() {
            if walk.pages >= self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    pending = %url,
                    "page ceiling reached; returning partial listing"
                );
                walk.truncated = true;
                break;
            }

            let payload = self.upstream.fetch_json(&url).await?;
            walk.pages += 1;

            let page_results = match payload.get("results") {
                Some(Value::Array(items)) => items.clone(),
                None | Some(Value::Null) => Vec::new(),
                Some(_) => {
                    return Err(UpstreamError::Malformed {
                        url,
                        message: "`results` is not a list".to_string(),
                    })
                }
            };
            debug!(page = walk.pages, %url, count = page_results.len(), "fetched listing page");
            walk.results.extend(page_results);

            cursor = payload
                .get("next")
                .and_then(Value::as_str)
                .filter(|next| !next.is_empty())
                .map(str::to_string);
        }

        Ok(walk)
    }
}
