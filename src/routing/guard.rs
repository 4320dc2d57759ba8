//! # Navigation Guard
//!
//! Runs before every route transition and decides whether it proceeds or is
//! redirected. The decision is a pure function of the target route's
//! [`RouteMeta`] and whether a session token is present:
//!
//! ```text
//! requires_auth  && !authenticated  →  Redirect(login)
//! requires_guest &&  authenticated  →  Redirect(dashboard)
//! otherwise                          →  Allow
//! ```
//!
//! The guard only reads the session. Performing the navigation is up to the
//! surrounding router. Overlapping transitions are not serialized; if an
//! earlier transition resolves after a later one, the last one resolved wins.

use std::sync::Arc;

use log::{debug, info};

use super::table::{DASHBOARD_PATH, LOGIN_PATH, Resolution, RouteMeta, RouteTable};
use crate::core::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the requested path.
    Allow,
    /// Go here instead. The original destination is dropped.
    Redirect(String),
}

impl Decision {
    /// The path the router should end up on.
    pub fn target<'a>(&'a self, requested: &'a str) -> &'a str {
        match self {
            Decision::Allow => requested,
            Decision::Redirect(to) => to.as_str(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Redirect destinations used by [`decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardTargets {
    pub login: String,
    pub landing: String,
}

impl Default for GuardTargets {
    fn default() -> Self {
        Self {
            login: LOGIN_PATH.to_string(),
            landing: DASHBOARD_PATH.to_string(),
        }
    }
}

/// The access decision for one route. Total: always yields a decision.
pub fn decide(meta: &RouteMeta, authenticated: bool, targets: &GuardTargets) -> Decision {
    if meta.requires_auth && !authenticated {
        Decision::Redirect(targets.login.clone())
    } else if meta.requires_guest && authenticated {
        Decision::Redirect(targets.landing.clone())
    } else {
        Decision::Allow
    }
}

pub struct NavigationGuard {
    table: Arc<RouteTable>,
    session: Arc<dyn SessionStore>,
    targets: GuardTargets,
}

impl NavigationGuard {
    pub fn new(table: Arc<RouteTable>, session: Arc<dyn SessionStore>) -> Self {
        Self::with_targets(table, session, GuardTargets::default())
    }

    pub fn with_targets(table: Arc<RouteTable>, session: Arc<dyn SessionStore>, targets: GuardTargets) -> Self {
        Self {
            table,
            session,
            targets,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decides the transition to `path`.
    ///
    /// Redirect rules in the table apply first. A path no descriptor matches
    /// is treated as an open route.
    pub fn check(&self, path: &str) -> Decision {
        let decision = match self.table.resolve(path) {
            Resolution::Redirect(to) => Decision::Redirect(to.to_string()),
            Resolution::Route(m) => decide(&m.route.meta, self.session.is_authenticated(), &self.targets),
            Resolution::NotFound => {
                debug!("No route matches {}, treating as open", path);
                decide(&RouteMeta::default(), self.session.is_authenticated(), &self.targets)
            }
        };
        match &decision {
            Decision::Allow => debug!("Navigation to {} allowed", path),
            Decision::Redirect(to) => info!("Navigation to {} redirected to {}", path, to),
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::Layout;
    use crate::test_support::{guest_session, session_with_token};

    fn guard(session: Arc<dyn SessionStore>) -> NavigationGuard {
        NavigationGuard::new(Arc::new(RouteTable::application().unwrap()), session)
    }

    fn all_metas() -> Vec<RouteMeta> {
        let mut metas = Vec::new();
        for requires_auth in [false, true] {
            for requires_guest in [false, true] {
                for layout in [Layout::Auth, Layout::Default] {
                    metas.push(RouteMeta {
                        requires_auth,
                        requires_guest,
                        layout,
                    });
                }
            }
        }
        metas
    }

    #[test]
    fn test_protected_routes_redirect_guests_to_login() {
        let targets = GuardTargets::default();
        for meta in all_metas().iter().filter(|m| m.requires_auth) {
            assert_eq!(
                decide(meta, false, &targets),
                Decision::Redirect(LOGIN_PATH.to_string())
            );
        }
    }

    #[test]
    fn test_guest_routes_redirect_signed_in_users_to_dashboard() {
        let targets = GuardTargets::default();
        for meta in all_metas().iter().filter(|m| m.requires_guest) {
            assert_eq!(
                decide(meta, true, &targets),
                Decision::Redirect(DASHBOARD_PATH.to_string())
            );
        }
    }

    #[test]
    fn test_open_routes_always_allow() {
        let targets = GuardTargets::default();
        for meta in all_metas().iter().filter(|m| !m.requires_auth && !m.requires_guest) {
            assert_eq!(decide(meta, false, &targets), Decision::Allow);
            assert_eq!(decide(meta, true, &targets), Decision::Allow);
        }
    }

    #[test]
    fn test_auth_check_wins_when_both_flags_set() {
        let meta = RouteMeta {
            requires_auth: true,
            requires_guest: true,
            layout: Layout::Default,
        };
        let targets = GuardTargets::default();
        assert_eq!(decide(&meta, false, &targets), Decision::Redirect(LOGIN_PATH.to_string()));
        assert_eq!(decide(&meta, true, &targets), Decision::Redirect(DASHBOARD_PATH.to_string()));
    }

    #[test]
    fn test_dashboard_without_token_redirects_to_login() {
        let guard = guard(guest_session());
        let decision = guard.check("/dashboard");
        assert_eq!(decision, Decision::Redirect("/login".to_string()));
        assert_eq!(decision.target("/dashboard"), "/login");
    }

    #[test]
    fn test_login_with_token_is_allowed() {
        // /login carries no guest-only flag, so signed-in users may still open it.
        let guard = guard(session_with_token("abc"));
        let decision = guard.check("/login");
        assert!(decision.is_allowed());
        assert_eq!(decision.target("/login"), "/login");
    }

    #[test]
    fn test_protected_routes_allow_with_token() {
        let guard = guard(session_with_token("abc"));
        for path in ["/dashboard", "/profile", "/properties", "/properties/create", "/contracts/create/3", "/my-contracts"] {
            assert_eq!(guard.check(path), Decision::Allow, "{path}");
        }
    }

    #[test]
    fn test_root_redirects_to_login_regardless_of_session() {
        assert_eq!(guard(guest_session()).check("/"), Decision::Redirect("/login".to_string()));
        assert_eq!(
            guard(session_with_token("abc")).check("/"),
            Decision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_unknown_path_is_open() {
        assert_eq!(guard(guest_session()).check("/no/such/page"), Decision::Allow);
        assert_eq!(guard(session_with_token("abc")).check("/no/such/page"), Decision::Allow);
    }

    #[test]
    fn test_check_does_not_touch_session() {
        let session = session_with_token("abc");
        let guard = guard(session.clone());
        guard.check("/dashboard");
        guard.check("/login");
        assert_eq!(session.token().as_deref(), Some("abc"));

        let session = guest_session();
        let guard = NavigationGuard::new(Arc::new(RouteTable::application().unwrap()), session.clone());
        guard.check("/dashboard");
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_guard_follows_session_changes() {
        let session = guest_session();
        let guard = guard(session.clone());
        assert!(!guard.check("/profile").is_allowed());
        session.set_token("abc").unwrap();
        assert!(guard.check("/profile").is_allowed());
        session.clear_token().unwrap();
        assert!(!guard.check("/profile").is_allowed());
    }

    #[test]
    fn test_guest_only_route_in_custom_table() {
        let mut table = RouteTable::new();
        table.register("/welcome", "Welcome", RouteMeta::guest_only(Layout::Auth)).unwrap();
        let guard = NavigationGuard::new(Arc::new(table), session_with_token("abc"));
        assert_eq!(guard.check("/welcome"), Decision::Redirect(DASHBOARD_PATH.to_string()));
    }

    #[test]
    fn test_custom_targets() {
        let targets = GuardTargets {
            login: "/signin".to_string(),
            landing: "/home".to_string(),
        };
        let guard = NavigationGuard::with_targets(
            Arc::new(RouteTable::application().unwrap()),
            guest_session(),
            targets,
        );
        assert_eq!(guard.check("/dashboard"), Decision::Redirect("/signin".to_string()));
    }
}
