//! RouteGenius Desktop Library
//!
//! Core modules for the desktop companion client.

pub mod api;
pub mod app;
pub mod commands;
pub mod forms;
pub mod logging;
pub mod models;
pub mod nav;
pub mod session;
pub mod storage;
pub mod toast;

use api::ApiClient;
use nav::Navigator;
use session::SessionStore;
use storage::ClientStorage;
use toast::ToastController;

/// Application state shared across commands.
///
/// Every handler runs to completion on the single event loop before the
/// next one starts, so plain fields are enough; each field has exactly one
/// logical owner.
pub struct AppState {
    pub session: SessionStore,
    pub storage: ClientStorage,
    pub api: ApiClient,
    pub nav: Navigator,
    pub toasts: ToastController,
}
