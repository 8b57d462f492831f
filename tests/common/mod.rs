//! Shared test backend for the console integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use storefront::backend::Backend;
use storefront::error::{Error, Result};
use storefront_core::{
    EnvSchema, InstalledService, ServiceDetail, ServicePage, ServiceSummary,
};

/// In-memory backend scripted per (query, page). Unscripted lookups fail,
/// which doubles as the transient-failure path.
#[derive(Default)]
pub struct MockBackend {
    pages: Mutex<HashMap<(String, u32), ServicePage>>,
    details: Mutex<HashMap<String, ServiceDetail>>,
    install_results: Mutex<VecDeque<Result<InstalledService>>>,
    pub listing_calls: Mutex<Vec<(String, u32, u32)>>,
    pub install_calls: Mutex<Vec<(String, Option<Vec<(String, String)>>)>>,
}

impl MockBackend {
    pub fn respond(&self, query: &str, page: u32, response: ServicePage) {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), response);
    }

    pub fn with_detail(&self, detail: ServiceDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.id.clone(), detail);
    }

    pub fn queue_install(&self, result: Result<InstalledService>) {
        self.install_results.lock().unwrap().push_back(result);
    }

    pub fn listing_calls(&self) -> Vec<(String, u32, u32)> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn install_calls(&self) -> Vec<(String, Option<Vec<(String, String)>>)> {
        self.install_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_services(&self, query: &str, page: u32, page_size: u32) -> Result<ServicePage> {
        self.listing_calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, page_size));
        self.pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned()
            .ok_or_else(|| Error::Backend(format!("no page {} for {:?}", page, query)))
    }

    async fn get_service_detail(&self, service_id: &str) -> Result<ServiceDetail> {
        self.details
            .lock()
            .unwrap()
            .get(service_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(service_id.to_string()))
    }

    async fn install_service(
        &self,
        service_id: &str,
        env_vars: Option<Vec<(String, String)>>,
    ) -> Result<InstalledService> {
        self.install_calls
            .lock()
            .unwrap()
            .push((service_id.to_string(), env_vars));
        self.install_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(installed(service_id)))
    }
}

pub fn summary(id: &str) -> ServiceSummary {
    ServiceSummary {
        id: id.to_string(),
        name: id.to_string(),
        description: format!("{} service", id),
        author: "acme".to_string(),
        platform: "node".to_string(),
        tags: Vec::new(),
        downloads: 0,
        github_stars: None,
        license: Some("MIT".to_string()),
        is_verified: false,
        is_hosted: false,
        last_updated: jiff::Timestamp::UNIX_EPOCH,
        env_schema: None,
    }
}

pub fn detail(id: &str, env_schema: Option<EnvSchema>) -> ServiceDetail {
    ServiceDetail {
        id: id.to_string(),
        name: id.to_string(),
        description: format!("{} service", id),
        author: "acme".to_string(),
        platform: "node".to_string(),
        tags: Vec::new(),
        downloads: 0,
        github_stars: None,
        license: Some("MIT".to_string()),
        is_verified: false,
        is_hosted: false,
        last_updated: jiff::Timestamp::UNIX_EPOCH,
        install_command: None,
        requirements: Vec::new(),
        readme: None,
        server_config: None,
        repository: None,
        homepage: None,
        env_schema,
    }
}

pub fn page(ids: &[&str], has_more: bool) -> ServicePage {
    ServicePage {
        services: ids.iter().map(|id| summary(id)).collect(),
        has_more,
        total_count: None,
    }
}

pub fn installed(id: &str) -> InstalledService {
    InstalledService {
        service_id: id.to_string(),
        name: id.to_string(),
        installed_at: jiff::Timestamp::UNIX_EPOCH,
        config: None,
    }
}
