//! App Module
//!
//! The interactive shell: one command per line, dispatched to completion,
//! then the navigation rule is re-evaluated and the resolved page renders.
//! Redirects happen between renders, never during one.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands;
use crate::forms::{LoginForm, ParcelForm, RegistrationForm};
use crate::models::{Notification, Parcel, ParcelStatus, RegisterRequest};
use crate::nav::PageId;
use crate::toast::ToastKind;
use crate::AppState;

/// The interactive client shell
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run until stdin closes or the user quits
    pub async fn run(&mut self) -> Result<()> {
        commands::restore_session(&mut self.state);
        self.state.nav.evaluate(&self.state.session);
        self.render().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }

            self.dispatch(line).await;

            self.state.nav.evaluate(&self.state.session);
            self.render().await;
        }

        Ok(())
    }

    async fn dispatch(&mut self, line: &str) {
        debug!("Dispatching command: {}", line);
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (verb, args.as_slice()) {
            ("help", _) => print_help(),
            ("goto", [page]) => self.state.nav.navigate_to(PageId::parse(page), None),
            ("track", [id]) => self
                .state
                .nav
                .navigate_to(PageId::Track, Some((*id).to_string())),
            ("login", [email, password]) => {
                let form = LoginForm {
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                };
                let result = commands::login(&mut self.state, &form).await;
                match result {
                    Ok(user) => self.toast_success(format!("Welcome back, {}!", user.first_name)),
                    Err(e) => self.toast_error(e.to_string()),
                }
            }
            ("register", [first_name, email, password, confirm]) => {
                let form = RegistrationForm {
                    first_name: (*first_name).to_string(),
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                    confirm_password: (*confirm).to_string(),
                };
                let result = commands::register(&self.state, &form).await;
                match result {
                    Ok(()) => {
                        self.toast_success("Registration successful! Please log in.");
                        self.state.nav.navigate_to(PageId::Login, None);
                    }
                    Err(e) => self.toast_error(e.to_string()),
                }
            }
            ("logout", _) => {
                commands::logout(&mut self.state);
                self.toast_success("Logged out.");
            }
            ("read", [id]) => match parse_id(id) {
                Some(id) => {
                    let result = commands::mark_notification_read(&self.state, id).await;
                    match result {
                        Ok(_) => self.toast_success("Notification marked as read."),
                        Err(e) => self.toast_error(e.to_string()),
                    }
                }
                None => self.toast_error("usage: read <notification-id>"),
            },
            ("drop", [id]) => match parse_id(id) {
                Some(id) => {
                    let result = commands::delete_notification(&self.state, id).await;
                    match result {
                        Ok(()) => self.toast_success("Notification deleted."),
                        Err(e) => self.toast_error(e.to_string()),
                    }
                }
                None => self.toast_error("usage: drop <notification-id>"),
            },
            ("draft", [parcel_id, status]) => {
                match (parse_id(parcel_id), ParcelStatus::parse(status)) {
                    (Some(parcel_id), Some(status)) => {
                        let result =
                            commands::generate_notification_draft(&self.state, parcel_id, status)
                                .await;
                        match result {
                            Ok(()) => self.toast_success("Notification draft generated."),
                            Err(e) => self.toast_error(e.to_string()),
                        }
                    }
                    _ => self.toast_error("usage: draft <parcel-id> <STATUS>"),
                }
            }
            ("parcel", rest) => self.dispatch_parcel(rest).await,
            ("user", rest) => self.dispatch_user(rest).await,
            ("dismiss", _) => self.state.toasts.dismiss(),
            _ => self.toast_error(format!("Unknown command: {} (try 'help')", verb)),
        }
    }

    async fn dispatch_parcel(&mut self, args: &[&str]) {
        match args {
            ["add", json @ ..] if !json.is_empty() => {
                match serde_json::from_str::<ParcelForm>(&json.join(" ")) {
                    Ok(form) => {
                        let result = commands::create_parcel(&self.state, &form).await;
                        match result {
                            Ok(parcel) => self
                                .toast_success(format!("Parcel {} created.", parcel.tracking_id)),
                            Err(e) => self.toast_error(e.to_string()),
                        }
                    }
                    Err(e) => self.toast_error(format!("Invalid parcel JSON: {}", e)),
                }
            }
            ["update", id, json @ ..] if !json.is_empty() => {
                let parsed = serde_json::from_str::<ParcelForm>(&json.join(" "));
                match (parse_id(id), parsed) {
                    (Some(id), Ok(form)) => {
                        let result = commands::update_parcel(&self.state, id, &form).await;
                        match result {
                            Ok(parcel) => self
                                .toast_success(format!("Parcel {} updated.", parcel.tracking_id)),
                            Err(e) => self.toast_error(e.to_string()),
                        }
                    }
                    (None, _) => self.toast_error("usage: parcel update <id> <json>"),
                    (_, Err(e)) => self.toast_error(format!("Invalid parcel JSON: {}", e)),
                }
            }
            ["rm", id] => match parse_id(id) {
                Some(id) => {
                    let result = commands::delete_parcel(&self.state, id).await;
                    match result {
                        Ok(()) => self.toast_success("Parcel deleted."),
                        Err(e) => self.toast_error(e.to_string()),
                    }
                }
                None => self.toast_error("usage: parcel rm <id>"),
            },
            _ => self.toast_error(
                "usage: parcel add <json> | parcel update <id> <json> | parcel rm <id>",
            ),
        }
    }

    async fn dispatch_user(&mut self, args: &[&str]) {
        match args {
            ["add", first_name, email, password, role] => {
                let request = RegisterRequest {
                    first_name: (*first_name).to_string(),
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                    role: (*role).to_string(),
                };
                let result = commands::create_user(&self.state, &request).await;
                match result {
                    Ok(user) => self.toast_success(format!("User {} created.", user.email)),
                    Err(e) => self.toast_error(e.to_string()),
                }
            }
            ["rm", id] => match parse_id(id) {
                Some(id) => {
                    let result = commands::delete_user(&self.state, id).await;
                    match result {
                        Ok(()) => self.toast_success("User deleted."),
                        Err(e) => self.toast_error(e.to_string()),
                    }
                }
                None => self.toast_error("usage: user rm <id>"),
            },
            _ => self
                .toast_error("usage: user add <first> <email> <password> <ROLE> | user rm <id>"),
        }
    }

    async fn render(&mut self) {
        let page = self.state.nav.resolve(&self.state.session);
        println!();
        match page {
            PageId::Home => {
                println!("== RouteGenius ==");
                println!("Ship smarter. Track anything.");
                println!("Commands: track <id> | login <email> <password> | goto register | help");
            }
            PageId::Login => {
                println!("== Login ==");
                println!("login <email> <password>   (or: goto register)");
            }
            PageId::Register => {
                println!("== Register ==");
                println!("register <first-name> <email> <password> <confirm-password>");
            }
            PageId::UserDashboard => self.render_user_dashboard().await,
            PageId::AdminDashboard => self.render_admin_dashboard().await,
            PageId::Track => self.render_track().await,
            PageId::Notifications => self.render_notifications().await,
            PageId::NotFound => {
                println!("== 404 ==");
                println!("That page does not exist. (goto home)");
            }
        }

        if let Some(toast) = self.state.toasts.current() {
            println!("[{}] {}", toast.kind, toast.message);
        }
    }

    async fn render_user_dashboard(&mut self) {
        let name = self
            .state
            .session
            .user()
            .map(|u| u.first_name.clone())
            .unwrap_or_default();
        println!("== My Parcels ({}) ==", name);
        let result = commands::my_parcels(&self.state).await;
        match result {
            Ok(parcels) if parcels.is_empty() => println!("No parcels yet."),
            Ok(parcels) => {
                for parcel in &parcels {
                    print_parcel_line(parcel);
                }
            }
            Err(e) => self.toast_error(e.to_string()),
        }
        println!("Commands: track <id> | goto notifications | logout");
    }

    async fn render_admin_dashboard(&mut self) {
        println!("== Admin Dashboard ==");
        let parcels = commands::list_parcels(&self.state).await;
        match parcels {
            Ok(parcels) => {
                println!("Parcels: {}", parcels.len());
                for parcel in &parcels {
                    print_parcel_line(parcel);
                }
            }
            Err(e) => self.toast_error(e.to_string()),
        }
        let users = commands::list_users(&self.state).await;
        match users {
            Ok(users) => {
                println!("Users: {}", users.len());
                for user in &users {
                    println!(
                        "  #{} {} <{}> {}",
                        user.id, user.first_name, user.email, user.role
                    );
                }
            }
            Err(e) => self.toast_error(e.to_string()),
        }
        println!(
            "Commands: parcel add/update/rm | user add/rm | draft <parcel-id> <STATUS> | logout"
        );
    }

    async fn render_track(&mut self) {
        println!("== Track a Parcel ==");
        let pending = self.state.nav.tracking_id().map(str::to_owned);
        match pending {
            Some(tracking_id) => {
                let result = commands::track(&self.state, &tracking_id).await;
                match result {
                    Ok(parcel) => {
                        println!("Tracking {}:", parcel.tracking_id);
                        println!("  Status: {}", parcel.status);
                        println!(
                            "  Location: {}, {}, {}",
                            parcel.current_location, parcel.current_city, parcel.current_country
                        );
                        println!("  ETA: {}", format_date(parcel.estimated_delivery_date));
                    }
                    Err(e) => self.toast_error(e.to_string()),
                }
            }
            None => println!("track <tracking-id>"),
        }
    }

    async fn render_notifications(&mut self) {
        println!("== Notifications ==");
        let result = commands::list_notifications(&self.state).await;
        match result {
            Ok(notifications) if notifications.is_empty() => println!("Inbox is empty."),
            Ok(notifications) => {
                for n in &notifications {
                    print_notification_line(n);
                }
            }
            Err(e) => self.toast_error(e.to_string()),
        }
        println!("Commands: read <id> | drop <id>");
    }

    fn toast_success(&mut self, message: impl Into<String>) {
        self.state
            .toasts
            .show(message, ToastKind::Success, || debug!("Toast closed"));
    }

    fn toast_error(&mut self, message: impl Into<String>) {
        self.state
            .toasts
            .show(message, ToastKind::Error, || debug!("Toast closed"));
    }
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "routegenius> ")?;
    stdout.flush()?;
    Ok(())
}

fn parse_id(s: &str) -> Option<i64> {
    s.parse().ok()
}

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_parcel_line(parcel: &Parcel) {
    println!(
        "  #{} {} [{}] {} -> {} (updated {})",
        parcel.id,
        parcel.tracking_id,
        parcel.status,
        parcel.current_city,
        parcel.recipient_address,
        format_date(parcel.last_updated_at)
    );
}

fn print_notification_line(notification: &Notification) {
    let marker = if notification.read { " " } else { "*" };
    println!(
        "  {}#{} [{}] {} ({})",
        marker,
        notification.id,
        notification.related_status,
        notification.message,
        format_date(notification.timestamp)
    );
}

fn print_help() {
    println!("Commands:");
    println!("  goto <page>                                  home|login|register|userDashboard|adminDashboard|track|notifications");
    println!("  login <email> <password>");
    println!("  register <first-name> <email> <password> <confirm-password>");
    println!("  logout");
    println!("  track <tracking-id>");
    println!("  read <notification-id> | drop <notification-id>");
    println!("  parcel add <json> | parcel update <id> <json> | parcel rm <id>");
    println!("  user add <first> <email> <password> <ROLE> | user rm <id>");
    println!("  draft <parcel-id> <STATUS>");
    println!("  dismiss | help | quit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::nav::Navigator;
    use crate::session::SessionStore;
    use crate::storage::ClientStorage;
    use crate::toast::ToastController;

    fn test_app(dir: &tempfile::TempDir) -> App {
        let storage = ClientStorage::at(dir.path().to_path_buf());
        let mut session = SessionStore::new();
        session.load(&storage);
        App::new(AppState {
            session,
            storage,
            api: ApiClient::new("http://127.0.0.1:1"),
            nav: Navigator::new(),
            toasts: ToastController::new(),
        })
    }

    #[tokio::test]
    async fn test_protected_navigation_is_reverted_after_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        app.dispatch("goto notifications").await;
        assert_eq!(app.state.nav.current_page(), PageId::Notifications);

        // The loop applies the transition rule after each event
        app.state.nav.evaluate(&app.state.session);
        assert_eq!(app.state.nav.current_page(), PageId::Home);
    }

    #[tokio::test]
    async fn test_track_command_stores_pending_tracking_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        app.dispatch("track RX123").await;
        assert_eq!(app.state.nav.current_page(), PageId::Track);
        assert_eq!(app.state.nav.tracking_id(), Some("RX123"));

        app.dispatch("goto home").await;
        assert_eq!(app.state.nav.tracking_id(), None);
    }

    #[tokio::test]
    async fn test_unknown_command_raises_error_toast() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        app.dispatch("teleport").await;
        let toast = app.state.toasts.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.contains("teleport"));
    }

    #[tokio::test]
    async fn test_goto_unknown_page_lands_on_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        app.dispatch("goto settings").await;
        assert_eq!(app.state.nav.current_page(), PageId::NotFound);
    }
}
