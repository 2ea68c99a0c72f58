// Paged list endpoints
//
// List endpoints take `currentPage` / `currentPageSize` and answer with
// `{currentPage, currentSize, totalRows, data}`. Pages are fetched lazily
// as the stream is polled.

use async_stream::try_stream;
use futures_util::Stream;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;
use url::Url;

use super::{ApiConnection, decode};
use crate::error::Error;

/// Items requested per page.
pub const PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    current_page: u64,
    current_size: u64,
    total_rows: u64,
    #[serde(default)]
    data: Vec<Value>,
}

impl Page {
    /// Last page once the rows covered so far reach `totalRows`.
    fn is_last(&self) -> bool {
        self.data.is_empty()
            || self.current_size == 0
            || self.current_page.saturating_mul(self.current_size) >= self.total_rows
    }
}

impl ApiConnection {
    /// Stream every item of a paged endpoint, one page request at a time.
    ///
    /// Each call starts again from page 1. `query` is sent with every page
    /// alongside the paging parameters.
    pub fn iterate_pages<'a>(
        &'a self,
        url: Url,
        query: Vec<(&'a str, String)>,
    ) -> impl Stream<Item = Result<Value, Error>> + Send + 'a {
        try_stream! {
            let mut page_number = 1_u64;
            loop {
                let mut params = query.clone();
                params.push(("currentPageSize", PAGE_SIZE.to_string()));
                params.push(("currentPage", page_number.to_string()));

                let value = self.request(Method::GET, url.clone(), &params, None).await?;
                let page: Page = decode(&value)?;
                trace!(
                    page = page.current_page,
                    size = page.current_size,
                    total = page.total_rows,
                    "received page"
                );

                let last = page.is_last();
                let served = page.current_page;
                for item in page.data {
                    yield item;
                }
                if last {
                    break;
                }
                page_number = served.max(page_number) + 1;
            }
        }
    }
}
