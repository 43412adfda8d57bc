use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::Result;
use crate::sobject::{CreateResult, UpsertResult};

type Fields = Map<String, Value>;

impl super::ForceClient {
    /// POST `sobjects/{type}`.
    #[instrument(skip(self, fields))]
    pub(crate) async fn create_record(
        &self,
        sobject: &str,
        fields: &Fields,
    ) -> Result<CreateResult> {
        let url = self.inner.http.rest_url(&format!("sobjects/{sobject}"))?;
        let result: CreateResult = self.inner.http.post_json(&url, fields).await?;
        Ok(result)
    }

    /// GET `sobjects/{type}/{id}`.
    #[instrument(skip(self))]
    pub(crate) async fn get_record(&self, sobject: &str, id: &str) -> Result<Fields> {
        let url = self.inner.http.rest_url(&format!(
            "sobjects/{}/{}",
            sobject,
            urlencoding::encode(id)
        ))?;
        let fields: Fields = self.inner.http.get_json(&url).await?;
        Ok(fields)
    }

    /// PATCH `sobjects/{type}/{id}`.
    #[instrument(skip(self, fields))]
    pub(crate) async fn update_record(
        &self,
        sobject: &str,
        id: &str,
        fields: &Fields,
    ) -> Result<()> {
        let url = self.inner.http.rest_url(&format!(
            "sobjects/{}/{}",
            sobject,
            urlencoding::encode(id)
        ))?;
        self.inner.http.patch_json(&url, fields).await?;
        Ok(())
    }

    /// PATCH `sobjects/{type}/{field}/{value}`.
    ///
    /// Returns the result body when the platform created a record; an update
    /// answers 204 with no body and yields `None`.
    #[instrument(skip(self, fields))]
    pub(crate) async fn upsert_record(
        &self,
        sobject: &str,
        external_id_field: &str,
        external_id: &str,
        fields: &Fields,
    ) -> Result<Option<UpsertResult>> {
        let url = self.inner.http.rest_url(&format!(
            "sobjects/{}/{}/{}",
            sobject,
            external_id_field,
            urlencoding::encode(external_id)
        ))?;
        let body = self.inner.http.patch_json(&url, fields).await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// DELETE `sobjects/{type}/{id}`.
    #[instrument(skip(self))]
    pub(crate) async fn delete_record(&self, sobject: &str, id: &str) -> Result<()> {
        let url = self.inner.http.rest_url(&format!(
            "sobjects/{}/{}",
            sobject,
            urlencoding::encode(id)
        ))?;
        self.inner.http.delete_request(&url).await?;
        Ok(())
    }
}
