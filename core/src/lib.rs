//! Core wire types for the storefront marketplace console.
//!
//! This crate provides the data types exchanged between the console and a
//! marketplace backend: listing pages, service summaries and details, the
//! environment-variable schema that drives install forms, and the install
//! request/record pair.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`ServicePage`] - One page of listing results
//! - [`ServiceSummary`] - Brief service info for listings
//! - [`ServiceDetail`] - Full service metadata, fetched on demand
//! - [`EnvSchema`] - Declarative schema for install configuration
//! - [`InstallRequest`] - Payload of the mutating install call
//! - [`InstalledService`] - Record returned by a successful install
//!
//! # Example
//!
//! Fetching a listing page from a marketplace server:
//!
//! ```ignore
//! use storefront_core::{ServicePage, ServiceSummary};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//!
//! let page: ServicePage = client
//!     .get("http://localhost:8080/api/v1/services?page=1&page_size=100")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//!
//! for svc in &page.services {
//!     println!("{}: {}", svc.id, svc.description);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One page of marketplace listings.
///
/// `services` preserves the server-defined ordering; the console appends
/// pages in fetch order and never reorders them. `total_count` is advisory
/// and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePage {
    pub services: Vec<ServiceSummary>,
    /// Whether another page exists after this one.
    pub has_more: bool,
    #[serde(default)]
    pub total_count: Option<u32>,
}

/// Summary information for a marketplace service.
///
/// Returned in paginated listings. For full metadata, fetch
/// [`ServiceDetail`] for the service's `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Unique service identifier (e.g., `"postgres-connector"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short description of the service.
    pub description: String,
    /// Service author.
    pub author: String,
    /// Runtime platform the service targets (e.g., `"node"`, `"python"`).
    pub platform: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub github_stars: Option<u64>,
    /// License identifier (e.g., `"MIT"`).
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_hosted: bool,
    /// When the service was last updated.
    pub last_updated: Timestamp,
    /// Present when the registry entry embeds its install schema directly.
    #[serde(default)]
    pub env_schema: Option<EnvSchema>,
}

/// Detailed information for a marketplace service.
///
/// Fetched lazily for the detail view and the install flow; never cached
/// across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDetail {
    /// Unique service identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short description of the service.
    pub description: String,
    /// Service author.
    pub author: String,
    /// Runtime platform the service targets.
    pub platform: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub github_stars: Option<u64>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_hosted: bool,
    /// When the service was last updated.
    pub last_updated: Timestamp,
    /// Shell command used for a local install, when applicable.
    #[serde(default)]
    pub install_command: Option<String>,
    /// Runtime requirements (e.g., `["node >= 18"]`).
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Rendered README content.
    #[serde(default)]
    pub readme: Option<String>,
    /// Opaque server configuration blocks, passed through untouched.
    #[serde(default)]
    pub server_config: Option<serde_json::Value>,
    /// Source repository URL.
    #[serde(default)]
    pub repository: Option<String>,
    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Schema for the service's environment configuration. Absent means no
    /// configuration is needed to install.
    #[serde(default)]
    pub env_schema: Option<EnvSchema>,
}

/// Declarative schema for a service's environment configuration.
///
/// Drives the install confirmation form: one text input per property, with
/// `required` gating submission.
///
/// # Example
///
/// ```
/// use storefront_core::EnvSchema;
///
/// let schema: EnvSchema = serde_json::from_str(
///     r#"{
///         "properties": {"API_KEY": {"title": "API Key", "type": "string"}},
///         "required": ["API_KEY"]
///     }"#,
/// )
/// .unwrap();
///
/// assert!(schema.is_required("API_KEY"));
/// assert_eq!(schema.label("API_KEY"), "API Key");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, EnvProperty>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl EnvSchema {
    /// Whether `key` must hold a non-empty value before install.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|k| k == key)
    }

    /// Label shown for a field: the property title when present, else the key.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.properties
            .get(key)
            .and_then(|p| p.title.as_deref())
            .unwrap_or(key)
    }
}

/// One property of an [`EnvSchema`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvProperty {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Declared value type: `"string"`, `"number"`, `"boolean"`, `"array"`,
    /// or `"object"`. Unknown types get no format check.
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
    /// Default value used to prefill the install form.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Allowed values, when the property is an enumeration.
    #[serde(rename = "enum", default)]
    pub choices: Option<Vec<String>>,
}

impl EnvProperty {
    /// Initial working text for an install form field.
    ///
    /// String defaults are used verbatim; other JSON defaults are rendered
    /// as their literal text.
    pub fn default_text(&self) -> String {
        match &self.default {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }
}

/// Payload of the mutating install call.
///
/// `env_vars` holds only fields the user actually filled in, in form order;
/// empty optional fields are omitted rather than sent as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRequest {
    pub service_id: String,
    #[serde(default)]
    pub env_vars: Vec<(String, String)>,
}

/// Record returned by a successful install.
///
/// Opaque to the console beyond identity and timestamp; the backend owns
/// its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledService {
    pub service_id: String,
    pub name: String,
    pub installed_at: Timestamp,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}
