use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use storefront_core::{InstallRequest, InstalledService, ServiceDetail, ServicePage};

use crate::backend::Backend;
use crate::error::{Error, Result};

/// HTTP implementation of [`Backend`] against the marketplace REST API.
///
/// Endpoints:
/// ```text
/// GET  {base}/api/v1/services?q=&page=&page_size=
/// GET  {base}/api/v1/services/{id}
/// POST {base}/api/v1/services/{id}/install
/// ```
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured client (timeouts, proxies).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn check(resp: reqwest::Response, subject: &str) -> Result<reqwest::Response> {
        match resp.status() {
            status if status.is_success() => Ok(resp),
            StatusCode::NOT_FOUND => Err(Error::NotFound(subject.to_string())),
            status => Err(Error::Backend(format!(
                "{} request failed with status {}",
                subject, status
            ))),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_services(&self, query: &str, page: u32, page_size: u32) -> Result<ServicePage> {
        let mut request = self
            .client
            .get(format!("{}/api/v1/services", self.base_url))
            .query(&[("page", page.to_string()), ("page_size", page_size.to_string())]);
        if !query.is_empty() {
            request = request.query(&[("q", query)]);
        }

        let resp = request.send().await?;
        debug!("GET /api/v1/services page={} status={}", page, resp.status());
        let page = Self::check(resp, "listing")?.json::<ServicePage>().await?;
        Ok(page)
    }

    async fn get_service_detail(&self, service_id: &str) -> Result<ServiceDetail> {
        let resp = self
            .client
            .get(format!("{}/api/v1/services/{}", self.base_url, service_id))
            .send()
            .await?;
        debug!("GET /api/v1/services/{} status={}", service_id, resp.status());
        let detail = Self::check(resp, service_id)?.json::<ServiceDetail>().await?;
        Ok(detail)
    }

    async fn install_service(
        &self,
        service_id: &str,
        env_vars: Option<Vec<(String, String)>>,
    ) -> Result<InstalledService> {
        let body = InstallRequest {
            service_id: service_id.to_string(),
            env_vars: env_vars.unwrap_or_default(),
        };

        let resp = self
            .client
            .post(format!(
                "{}/api/v1/services/{}/install",
                self.base_url, service_id
            ))
            .json(&body)
            .send()
            .await?;
        debug!(
            "POST /api/v1/services/{}/install status={}",
            service_id,
            resp.status()
        );
        let record = Self::check(resp, service_id)?
            .json::<InstalledService>()
            .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let backend = HttpBackend::new("http://localhost:8080/");
        assert_eq!(backend.base_url, "http://localhost:8080");
    }
}
