//! RouteGenius Desktop - Main Entry Point
//!
//! Companion client for the RouteGenius parcel-delivery platform.
//! Authenticates against the backend, tracks parcels, and manages the
//! notification inbox from the terminal.

use tracing::info;

use routegenius_lib::{
    api::ApiClient,
    app::App,
    logging,
    nav::Navigator,
    session::SessionStore,
    storage::ClientStorage,
    toast::ToastController,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init();
    info!("RouteGenius desktop client starting...");

    const DEFAULT_API_URL: &str = "http://localhost:8081/api/v1";

    let api_base_url =
        std::env::var("ROUTEGENIUS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    let state = AppState {
        session: SessionStore::new(),
        storage: ClientStorage::new(),
        api: ApiClient::new(&api_base_url),
        nav: Navigator::new(),
        toasts: ToastController::new(),
    };

    let mut app = App::new(state);
    app.run().await
}
