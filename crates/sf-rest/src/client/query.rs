use tracing::{debug, instrument};

use crate::error::Result;
use crate::query::RecordPage;
use crate::sobject::SObject;

/// Paths starting with this prefix are continuation URLs, not SOQL.
const DATA_PATH_PREFIX: &str = "/services/data";

impl super::ForceClient {
    /// Run a SOQL query and return the first page of records.
    ///
    /// `q` may also be a `nextRecordsUrl` (anything starting with
    /// `/services/data`), which is fetched as-is. Later pages are never
    /// fetched automatically; use [`query_more`](Self::query_more) while
    /// `done` is false.
    ///
    /// # Security
    ///
    /// Values placed inside SOQL string literals must be escaped with
    /// [`escape_soql_string`](crate::escape_soql_string).
    #[instrument(skip(self))]
    pub async fn query(&self, q: &str) -> Result<RecordPage> {
        let url = if q.starts_with(DATA_PATH_PREFIX) {
            self.inner.http.url(q)?
        } else {
            let endpoint = if self.use_tooling_api() {
                self.inner.http.tooling_url("query")?
            } else {
                self.inner.http.rest_url("query")?
            };
            format!("{}?q={}", endpoint, urlencoding::encode(q))
        };
        self.fetch_page(&url).await
    }

    /// Fetch the page behind a `nextRecordsUrl`. Only paths on the session's
    /// instance are accepted.
    #[instrument(skip(self))]
    pub async fn query_more(&self, next_records_url: &str) -> Result<RecordPage> {
        let url = self.inner.http.url(next_records_url)?;
        self.fetch_page(&url).await
    }

    /// Run a query and follow `nextRecordsUrl` until every page is read.
    #[instrument(skip(self))]
    pub async fn query_all(&self, q: &str) -> Result<Vec<SObject>> {
        let mut page = self.query(q).await?;
        let mut records = std::mem::take(&mut page.records);

        while !page.done {
            let Some(next) = page.next_records_url.take() else {
                break;
            };
            page = self.query_more(&next).await?;
            records.append(&mut page.records);
        }

        Ok(records)
    }

    async fn fetch_page(&self, url: &str) -> Result<RecordPage> {
        let mut page: RecordPage = self.inner.http.get_json(url).await?;
        for record in &mut page.records {
            record.attach(self);
        }
        debug!(
            total_size = page.total_size,
            records = page.records.len(),
            done = page.done,
            "Query page received"
        );
        Ok(page)
    }
}
