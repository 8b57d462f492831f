//! Client-side orchestration core for the emporium marketplace console.
//!
//! The console talks to a marketplace backend through the
//! [`backend::Backend`] trait and owns the control logic of the
//! application:
//!
//! - [`search::SearchDebouncer`] turns raw keystrokes into settled
//!   query-change events.
//! - [`pagination::PaginationEngine`] owns the page cursor and the visible
//!   list, keeps at most one listing request in flight, and discards
//!   responses from superseded search episodes.
//! - [`scroll::ScrollTrigger`] converts scroll position (or a manual "load
//!   more" control) into next-page requests.
//! - [`install::InstallOrchestrator`] runs the schema-driven install
//!   confirmation flow on top of [`schema::validate_env_field`].
//!
//! [`console::MarketplaceConsole`] wires them together.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use storefront::backend::HttpBackend;
//! use storefront::console::MarketplaceConsole;
//!
//! # async fn example() {
//! let backend = Arc::new(HttpBackend::new("http://localhost:8080"));
//! let (console, mut notifications) = MarketplaceConsole::new(backend);
//!
//! let mut listing = console.subscribe();
//! console.search_input("postgres");
//! listing.changed().await.unwrap();
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod console;
pub mod error;
pub mod install;
pub mod notify;
pub mod pagination;
pub mod schema;
pub mod scroll;
pub mod search;

pub use error::{Error, Result};
