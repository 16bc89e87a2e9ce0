//! Commands Module
//!
//! App-level operations the views invoke. Each command glues the session
//! store, persisted storage, and API client together and returns one
//! `Result` the caller can surface as a toast or inline error.

use tracing::{info, debug};

use crate::api::ApiError;
use crate::forms::{FormError, LoginForm, ParcelForm, RegistrationForm};
use crate::models::{Notification, Parcel, ParcelStatus, RegisterRequest, User};
use crate::session::{Role, UserSummary};
use crate::storage::StorageError;
use crate::AppState;

/// Failures surfaced to the invoking view
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("You are not logged in.")]
    NotAuthenticated,

    #[error("Login succeeded but no role was returned.")]
    MissingRole,

    #[error("Unrecognized role: {0}")]
    UnknownRole(String),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn bearer(state: &AppState) -> Result<&str, CommandError> {
    state.session.token().ok_or(CommandError::NotAuthenticated)
}

fn current_user_id(state: &AppState) -> Result<i64, CommandError> {
    state
        .session
        .user()
        .map(|u| u.id)
        .ok_or(CommandError::NotAuthenticated)
}

/// Rehydrate the persisted session, once, at startup
pub fn restore_session(state: &mut AppState) {
    debug!("Restoring stored session");
    state.session.load(&state.storage);
}

/// Validate credentials, authenticate against the backend, and persist the
/// resulting session. The session user carries the first role the backend
/// granted, as the web client does.
pub async fn login(state: &mut AppState, form: &LoginForm) -> Result<UserSummary, CommandError> {
    let credentials = form.validate()?;
    let response = state.api.login(&credentials).await?;

    let role_name = response.roles.first().ok_or(CommandError::MissingRole)?;
    let role =
        Role::parse(role_name).ok_or_else(|| CommandError::UnknownRole(role_name.clone()))?;

    let user = UserSummary {
        id: response.id,
        first_name: response.first_name,
        email: response.email,
        role,
    };
    state
        .session
        .login(user.clone(), response.token, &state.storage)?;

    info!("Login complete for: {}", user.email);
    Ok(user)
}

/// Validate the registration form and create the account. Validation
/// failures never reach the network.
pub async fn register(state: &AppState, form: &RegistrationForm) -> Result<(), CommandError> {
    let request = form.validate()?;
    state.api.register(&request).await?;
    info!("Registered account for: {}", request.email);
    Ok(())
}

/// Clear the session and its persisted entries
pub fn logout(state: &mut AppState) {
    info!("Logging out");
    state.session.logout(&state.storage);
}

// --- Admin user management ---

pub async fn list_users(state: &AppState) -> Result<Vec<User>, CommandError> {
    Ok(state.api.get_all_users(bearer(state)?).await?)
}

pub async fn create_user(state: &AppState, user: &RegisterRequest) -> Result<User, CommandError> {
    Ok(state.api.create_user(user, bearer(state)?).await?)
}

pub async fn update_user(
    state: &AppState,
    user_id: i64,
    user: &RegisterRequest,
) -> Result<User, CommandError> {
    Ok(state.api.update_user(user_id, user, bearer(state)?).await?)
}

pub async fn delete_user(state: &AppState, user_id: i64) -> Result<(), CommandError> {
    Ok(state.api.delete_user(user_id, bearer(state)?).await?)
}

// --- Parcels ---

pub async fn list_parcels(state: &AppState) -> Result<Vec<Parcel>, CommandError> {
    Ok(state.api.get_all_parcels(bearer(state)?).await?)
}

pub async fn create_parcel(state: &AppState, form: &ParcelForm) -> Result<Parcel, CommandError> {
    let request = form.validate()?;
    Ok(state.api.add_parcel(&request, bearer(state)?).await?)
}

pub async fn update_parcel(
    state: &AppState,
    parcel_id: i64,
    form: &ParcelForm,
) -> Result<Parcel, CommandError> {
    let request = form.validate()?;
    Ok(state
        .api
        .update_parcel(parcel_id, &request, bearer(state)?)
        .await?)
}

pub async fn delete_parcel(state: &AppState, parcel_id: i64) -> Result<(), CommandError> {
    Ok(state.api.delete_parcel(parcel_id, bearer(state)?).await?)
}

/// Public tracking lookup; works logged out
pub async fn track(state: &AppState, tracking_id: &str) -> Result<Parcel, CommandError> {
    Ok(state.api.track_parcel(tracking_id).await?)
}

/// Parcels owned by the signed-in user
pub async fn my_parcels(state: &AppState) -> Result<Vec<Parcel>, CommandError> {
    let user_id = current_user_id(state)?;
    Ok(state.api.get_user_parcels(user_id, bearer(state)?).await?)
}

// --- Notifications ---

pub async fn list_notifications(state: &AppState) -> Result<Vec<Notification>, CommandError> {
    Ok(state.api.get_notifications(bearer(state)?).await?)
}

pub async fn unread_notifications(state: &AppState) -> Result<Vec<Notification>, CommandError> {
    Ok(state.api.get_unread_notifications(bearer(state)?).await?)
}

pub async fn mark_notification_read(
    state: &AppState,
    notification_id: i64,
) -> Result<Notification, CommandError> {
    Ok(state
        .api
        .mark_notification_read(notification_id, bearer(state)?)
        .await?)
}

pub async fn delete_notification(
    state: &AppState,
    notification_id: i64,
) -> Result<(), CommandError> {
    Ok(state
        .api
        .delete_notification(notification_id, bearer(state)?)
        .await?)
}

pub async fn generate_notification_draft(
    state: &AppState,
    parcel_id: i64,
    status: ParcelStatus,
) -> Result<(), CommandError> {
    Ok(state
        .api
        .generate_notification_draft(parcel_id, status, bearer(state)?)
        .await?)
}
