use sflite_client::RequestMethod;
use tracing::instrument;

use crate::describe::{DescribeGlobalResult, DescribeSObjectResult};
use crate::error::Result;

impl super::ForceClient {
    /// List every object visible to the user.
    ///
    /// The request goes to the login endpoint (`base_url`) rather than the
    /// instance; My Domain logins make the two the same host.
    #[instrument(skip(self))]
    pub async fn describe_global(&self) -> Result<DescribeGlobalResult> {
        let url = format!(
            "{}/services/data/v{}/sobjects",
            self.base_url(),
            self.api_version()
        );
        let request = self.inner.http.authorized(RequestMethod::Get, &url)?;
        let response = self.inner.http.execute(request).await?;
        Ok(response.json().await?)
    }

    /// Describe one object type.
    #[instrument(skip(self))]
    pub async fn describe_sobject(&self, sobject: &str) -> Result<DescribeSObjectResult> {
        let url = self
            .inner
            .http
            .rest_url(&format!("sobjects/{sobject}/describe"))?;
        Ok(self.inner.http.get_json(&url).await?)
    }
}
