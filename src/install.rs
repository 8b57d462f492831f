use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use storefront_core::{EnvSchema, InstalledService, ServiceSummary};

use crate::backend::Backend;
use crate::notify::Notifier;
use crate::schema::validate_env_field;

/// Lifecycle of an install confirmation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Closed,
    /// The service detail is being fetched for its env schema.
    SchemaLoading,
    /// The form is open and editable.
    AwaitingInput,
    /// The install call is outstanding.
    Submitting,
}

/// One install form field, in display order.
#[derive(Debug, Clone)]
pub struct InstallField {
    pub key: String,
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub value: String,
    /// Current inline validation message, if any.
    pub error: Option<String>,
}

struct Session {
    /// Identifies this session across await points; a completion whose
    /// token no longer matches the live session must leave it untouched.
    token: u64,
    service_id: String,
    service_name: String,
    schema: EnvSchema,
    values: BTreeMap<String, String>,
    phase: InstallPhase,
}

fn session_can_submit(session: &Session) -> bool {
    for key in &session.schema.required {
        let filled = session
            .values
            .get(key)
            .is_some_and(|v| !v.trim().is_empty());
        if !filled {
            return false;
        }
    }
    session
        .values
        .iter()
        .all(|(key, value)| validate_env_field(&session.schema, key, value).is_none())
}

struct Shared {
    backend: Arc<dyn Backend>,
    notifier: Notifier,
    session: Mutex<Option<Session>>,
    next_token: AtomicU64,
}

/// Drives the install confirmation flow: schema retrieval, field
/// defaulting, reactive validation, and submission.
///
/// One session at a time; its working values are owned exclusively by the
/// orchestrator and discarded when the session closes, whether by success
/// or cancellation.
#[derive(Clone)]
pub struct InstallOrchestrator {
    shared: Arc<Shared>,
}

impl InstallOrchestrator {
    pub fn new(backend: Arc<dyn Backend>, notifier: Notifier) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                notifier,
                session: Mutex::new(None),
                next_token: AtomicU64::new(0),
            }),
        }
    }

    pub fn phase(&self) -> InstallPhase {
        self.shared
            .session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(InstallPhase::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.phase() != InstallPhase::Closed
    }

    /// Open the confirmation flow for a service.
    ///
    /// Uses the schema embedded in the listing entry when present;
    /// otherwise fetches the detail record for it. A failed detail fetch
    /// falls back to an empty schema, i.e. "no configuration needed", and
    /// is not an error. Fields are prefilled from property defaults.
    pub async fn open(&self, service: &ServiceSummary) {
        let token = self.shared.next_token.fetch_add(1, Ordering::Relaxed);
        {
            let mut slot = self.shared.session.lock().unwrap();
            *slot = Some(Session {
                token,
                service_id: service.id.clone(),
                service_name: service.name.clone(),
                schema: EnvSchema::default(),
                values: BTreeMap::new(),
                phase: InstallPhase::SchemaLoading,
            });
        }

        let schema = match &service.env_schema {
            Some(schema) => schema.clone(),
            None => match self.shared.backend.get_service_detail(&service.id).await {
                Ok(detail) => detail.env_schema.unwrap_or_default(),
                Err(e) => {
                    debug!("no env schema for {}: {}", service.id, e);
                    EnvSchema::default()
                }
            },
        };

        let mut slot = self.shared.session.lock().unwrap();
        // The session may have been cancelled or replaced while the detail
        // fetch was out; its result must then stay inert.
        let Some(session) = slot.as_mut() else { return };
        if session.token != token {
            return;
        }
        session.values = schema
            .properties
            .iter()
            .map(|(key, prop)| (key.clone(), prop.default_text()))
            .collect();
        session.schema = schema;
        session.phase = InstallPhase::AwaitingInput;
    }

    /// Record a keystroke for `key` and return the field's current
    /// validation error, if any.
    pub fn set_field(&self, key: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        let mut slot = self.shared.session.lock().unwrap();
        let Some(session) = slot.as_mut() else {
            return None;
        };
        if session.phase != InstallPhase::AwaitingInput {
            return None;
        }
        let error = validate_env_field(&session.schema, key, &value);
        session.values.insert(key.to_string(), value);
        error
    }

    /// Validate a candidate value against the open session's schema without
    /// storing it.
    pub fn validate_field(&self, key: &str, value: &str) -> Option<String> {
        let slot = self.shared.session.lock().unwrap();
        slot.as_ref()
            .and_then(|session| validate_env_field(&session.schema, key, value))
    }

    /// Whether submission is currently permitted: every required field has
    /// a non-empty trimmed value and no field holds a validation error.
    pub fn can_submit(&self) -> bool {
        let slot = self.shared.session.lock().unwrap();
        match slot.as_ref() {
            Some(session) => {
                session.phase == InstallPhase::AwaitingInput && session_can_submit(session)
            }
            None => false,
        }
    }

    /// Submit the install request.
    ///
    /// Only fields with non-empty trimmed values are sent; empty optionals
    /// are omitted. On success the session closes and a success
    /// notification is emitted; on failure the session stays open with the
    /// entered values intact so the user can correct and retry. A no-op
    /// when submission is not permitted.
    pub async fn submit(&self) -> Option<InstalledService> {
        let (token, service_id, service_name, env_vars);
        {
            let mut slot = self.shared.session.lock().unwrap();
            let Some(session) = slot.as_mut() else {
                return None;
            };
            if session.phase != InstallPhase::AwaitingInput || !session_can_submit(session) {
                return None;
            }
            session.phase = InstallPhase::Submitting;
            token = session.token;
            service_id = session.service_id.clone();
            service_name = session.service_name.clone();
            env_vars = session
                .values
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(key, value)| (key.clone(), value.trim().to_string()))
                .collect::<Vec<_>>();
        }

        let env_vars = if env_vars.is_empty() { None } else { Some(env_vars) };
        let result = self
            .shared
            .backend
            .install_service(&service_id, env_vars)
            .await;

        let mut slot = self.shared.session.lock().unwrap();
        // Only the session that issued this request may be mutated; if it
        // was cancelled or replaced mid-flight, the outcome stays inert.
        let owns_session = slot
            .as_ref()
            .is_some_and(|s| s.token == token && s.phase == InstallPhase::Submitting);
        match result {
            Ok(record) => {
                info!("installed service: {}", service_id);
                if owns_session {
                    *slot = None;
                }
                self.shared
                    .notifier
                    .success(format!("Installed {}", service_name));
                Some(record)
            }
            Err(e) => {
                if owns_session {
                    if let Some(session) = slot.as_mut() {
                        session.phase = InstallPhase::AwaitingInput;
                    }
                }
                self.shared
                    .notifier
                    .error(format!("Failed to install {}: {}", service_name, e));
                None
            }
        }
    }

    /// Discard the session outright. Working values are never reused.
    pub fn cancel(&self) {
        *self.shared.session.lock().unwrap() = None;
    }

    /// Fields of the open form, in display order, with their current
    /// values and inline errors.
    pub fn fields(&self) -> Vec<InstallField> {
        let slot = self.shared.session.lock().unwrap();
        let Some(session) = slot.as_ref() else {
            return Vec::new();
        };
        session
            .schema
            .properties
            .iter()
            .map(|(key, prop)| {
                let value = session.values.get(key).cloned().unwrap_or_default();
                InstallField {
                    key: key.clone(),
                    label: session.schema.label(key).to_string(),
                    description: prop.description.clone(),
                    required: session.schema.is_required(key),
                    error: validate_env_field(&session.schema, key, &value),
                    value,
                }
            })
            .collect()
    }
}
