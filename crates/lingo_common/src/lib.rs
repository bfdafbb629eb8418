//! Lingo Common - data model, persistence and service gateways for Lingo.
//!
//! The screens in `screens` hold framework-independent state; any front end
//! (the `lingoctl` CLI today) renders them.

pub mod app;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod models;
pub mod progress;
pub mod screens;
pub mod secrets;
pub mod state;
pub mod store;
pub mod translate;

pub use app::AppContext;
pub use config::LingoConfig;
pub use error::{GatewayError, LingoError, Result};
pub use models::{LanguageProgress, UserProfile};
pub use store::{ProfileRepository, ProfileStore};
