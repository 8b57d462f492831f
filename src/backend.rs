use async_trait::async_trait;

use storefront_core::{InstalledService, ServiceDetail, ServicePage};

use crate::error::Result;

pub mod http;

pub use http::HttpBackend;

/// Marketplace backend boundary consumed by the console.
///
/// Pages are 1-based; an empty `query` returns the server's default
/// ordering. Every error is treated as transient and retryable by the
/// caller: the console reverts to its last known-good state and lets the
/// user reissue the triggering action.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List one page of services matching `query`.
    async fn list_services(&self, query: &str, page: u32, page_size: u32) -> Result<ServicePage>;

    /// Fetch the full record for a service. May fail if the id is unknown.
    async fn get_service_detail(&self, service_id: &str) -> Result<ServiceDetail>;

    /// Install a service.
    ///
    /// `env_vars`, when present, is non-empty and holds only
    /// caller-supplied non-empty values.
    async fn install_service(
        &self,
        service_id: &str,
        env_vars: Option<Vec<(String, String)>>,
    ) -> Result<InstalledService>;
}
