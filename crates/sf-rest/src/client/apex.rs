use bytes::Bytes;
use sflite_client::RequestMethod;
use tracing::instrument;

use crate::error::Result;

impl super::ForceClient {
    /// Call a custom REST endpoint at `{instance}/{path}`.
    ///
    /// The body is sent as-is and the response body is returned as-is. `path`
    /// must be relative to the instance; absolute URLs are refused.
    ///
    /// ```rust,ignore
    /// let out = client
    ///     .apex_rest(RequestMethod::Post, "services/apexrest/orders", Some(body.into()))
    ///     .await?;
    /// ```
    #[instrument(skip(self, body))]
    pub async fn apex_rest(
        &self,
        method: RequestMethod,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Bytes> {
        let url = self.inner.http.url(path)?;
        Ok(self.inner.http.request(method, &url, body).await?)
    }
}
