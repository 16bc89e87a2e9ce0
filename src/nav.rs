//! Navigation Module
//!
//! Owns the current page and the pending tracking id handed from one page
//! to the next. Redirects are a reaction to session changes: the app loop
//! applies [`Navigator::evaluate`] after each event, and rendering goes
//! through the pure [`Navigator::resolve`] guard. Neither mutates state
//! during a render.

use tracing::{info, debug};

use crate::session::{Role, SessionStore};

/// Identifier of a client-side view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Home,
    Login,
    Register,
    UserDashboard,
    AdminDashboard,
    Track,
    Notifications,
    NotFound,
}

impl PageId {
    /// Parse a page name; anything unknown lands on the not-found page.
    pub fn parse(s: &str) -> PageId {
        match s {
            "home" => PageId::Home,
            "login" => PageId::Login,
            "register" => PageId::Register,
            "userDashboard" => PageId::UserDashboard,
            "adminDashboard" => PageId::AdminDashboard,
            "track" => PageId::Track,
            "notifications" => PageId::Notifications,
            _ => PageId::NotFound,
        }
    }

    fn is_dashboard(self) -> bool {
        matches!(self, PageId::UserDashboard | PageId::AdminDashboard)
    }

    fn is_auth_page(self) -> bool {
        matches!(self, PageId::Login | PageId::Register)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PageId::Home => "home",
            PageId::Login => "login",
            PageId::Register => "register",
            PageId::UserDashboard => "userDashboard",
            PageId::AdminDashboard => "adminDashboard",
            PageId::Track => "track",
            PageId::Notifications => "notifications",
            PageId::NotFound => "404",
        };
        write!(f, "{}", name)
    }
}

/// Transition rule applied after session or page changes. Returns the page
/// to redirect to, or `None` when the current page may stand.
pub fn transition(current: PageId, session: &SessionStore) -> Option<PageId> {
    if session.is_loading() {
        return None;
    }

    match session.role() {
        Some(Role::Admin) => {
            let away = current.is_auth_page()
                || current == PageId::Home
                || current == PageId::UserDashboard;
            away.then_some(PageId::AdminDashboard)
        }
        Some(Role::User) => {
            let away = current.is_auth_page()
                || current == PageId::Home
                || current == PageId::AdminDashboard;
            away.then_some(PageId::UserDashboard)
        }
        None => {
            (current.is_dashboard() || current == PageId::Notifications).then_some(PageId::Home)
        }
    }
}

/// Holds the current page and the transient tracking id
pub struct Navigator {
    current_page: PageId,
    tracking_id: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current_page: PageId::Home,
            tracking_id: None,
        }
    }

    /// Explicit navigation request. The tracking id survives only a request
    /// for the track page; any other destination clears it.
    pub fn navigate_to(&mut self, page: PageId, data: Option<String>) {
        debug!("Navigating to: {} (data: {:?})", page, data);
        self.current_page = page;
        self.tracking_id = match (page, data) {
            (PageId::Track, Some(id)) => Some(id),
            _ => None,
        };
    }

    /// Apply the transition rule against the session. Returns true when a
    /// redirect happened.
    pub fn evaluate(&mut self, session: &SessionStore) -> bool {
        match transition(self.current_page, session) {
            Some(next) => {
                info!("Redirecting from {} to {}", self.current_page, next);
                self.current_page = next;
                true
            }
            None => false,
        }
    }

    /// Render guard: the page that should actually be shown for the current
    /// session. Protected pages fall back to the login view on a role
    /// mismatch or a missing session.
    pub fn resolve(&self, session: &SessionStore) -> PageId {
        match self.current_page {
            PageId::UserDashboard if session.role() != Some(Role::User) => PageId::Login,
            PageId::AdminDashboard if session.role() != Some(Role::Admin) => PageId::Login,
            PageId::Notifications if !session.is_authenticated() => PageId::Login,
            page => page,
        }
    }

    pub fn current_page(&self) -> PageId {
        self.current_page
    }

    /// The tracking id pending for the track page, if any
    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserSummary;
    use crate::storage::ClientStorage;

    fn session_with_role(role: Option<Role>) -> (tempfile::TempDir, ClientStorage, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let storage = ClientStorage::at(dir.path().to_path_buf());
        let mut session = SessionStore::new();
        session.load(&storage);
        if let Some(role) = role {
            let user = UserSummary {
                id: 1,
                first_name: "Kai".into(),
                email: "kai@example.com".into(),
                role,
            };
            session.login(user, "jwt-abc".into(), &storage).unwrap();
        }
        (dir, storage, session)
    }

    #[test]
    fn test_admin_is_redirected_off_auth_and_home_pages() {
        let (_dir, _storage, session) = session_with_role(Some(Role::Admin));
        for page in [PageId::Login, PageId::Register, PageId::Home] {
            let mut nav = Navigator::new();
            nav.navigate_to(page, None);
            assert!(nav.evaluate(&session));
            assert_eq!(nav.current_page(), PageId::AdminDashboard);
        }
    }

    #[test]
    fn test_user_is_redirected_off_auth_and_home_pages() {
        let (_dir, _storage, session) = session_with_role(Some(Role::User));
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::Login, None);
        assert!(nav.evaluate(&session));
        assert_eq!(nav.current_page(), PageId::UserDashboard);
    }

    #[test]
    fn test_wrong_roles_dashboard_redirects_to_own() {
        let (_dir, _storage, session) = session_with_role(Some(Role::Admin));
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::UserDashboard, None);
        assert!(nav.evaluate(&session));
        assert_eq!(nav.current_page(), PageId::AdminDashboard);

        let (_dir, _storage, session) = session_with_role(Some(Role::User));
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::AdminDashboard, None);
        assert!(nav.evaluate(&session));
        assert_eq!(nav.current_page(), PageId::UserDashboard);
    }

    #[test]
    fn test_authenticated_user_stays_on_public_pages() {
        let (_dir, _storage, session) = session_with_role(Some(Role::User));
        for page in [PageId::Track, PageId::Notifications, PageId::NotFound] {
            let mut nav = Navigator::new();
            nav.navigate_to(page, None);
            assert!(!nav.evaluate(&session));
            assert_eq!(nav.current_page(), page);
        }
    }

    #[test]
    fn test_logged_out_protected_pages_redirect_home() {
        let (_dir, _storage, session) = session_with_role(None);
        for page in [
            PageId::UserDashboard,
            PageId::AdminDashboard,
            PageId::Notifications,
        ] {
            let mut nav = Navigator::new();
            nav.navigate_to(page, None);
            assert!(nav.evaluate(&session));
            assert_eq!(nav.current_page(), PageId::Home);
        }
    }

    #[test]
    fn test_no_transition_while_session_is_loading() {
        let session = SessionStore::new();
        assert!(session.is_loading());
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::UserDashboard, None);
        assert!(!nav.evaluate(&session));
        assert_eq!(nav.current_page(), PageId::UserDashboard);
    }

    #[test]
    fn test_tracking_id_survives_only_track_navigation() {
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::Track, Some("RX123".into()));
        assert_eq!(nav.tracking_id(), Some("RX123"));

        nav.navigate_to(PageId::Home, None);
        assert_eq!(nav.tracking_id(), None);

        // Data passed to a non-track page is discarded
        nav.navigate_to(PageId::Login, Some("RX123".into()));
        assert_eq!(nav.tracking_id(), None);
    }

    #[test]
    fn test_render_guard_falls_back_to_login() {
        let (_dir, _storage, admin) = session_with_role(Some(Role::Admin));
        let mut nav = Navigator::new();
        nav.navigate_to(PageId::UserDashboard, None);
        assert_eq!(nav.resolve(&admin), PageId::Login);

        let (_dir, _storage, logged_out) = session_with_role(None);
        nav.navigate_to(PageId::Notifications, None);
        assert_eq!(nav.resolve(&logged_out), PageId::Login);

        let (_dir, _storage, user) = session_with_role(Some(Role::User));
        nav.navigate_to(PageId::UserDashboard, None);
        assert_eq!(nav.resolve(&user), PageId::UserDashboard);
    }

    #[test]
    fn test_unknown_page_names_parse_to_not_found() {
        assert_eq!(PageId::parse("settings"), PageId::NotFound);
        assert_eq!(PageId::parse("404"), PageId::NotFound);
        assert_eq!(PageId::parse("adminDashboard"), PageId::AdminDashboard);
    }
}
