//! # Route Table
//!
//! An ordered list of route descriptors plus a small set of redirect rules,
//! registered once at startup.
//!
//! ```text
//! resolve(path)
//! ├── redirect rule matches?   → Resolution::Redirect(to)
//! ├── first descriptor match   → Resolution::Route(RouteMatch)
//! └── nothing                  → Resolution::NotFound
//! ```
//!
//! Registration order is the tie-break: when two descriptors match the same
//! path, the one registered first always wins.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use super::pattern::{MissingParam, PathPattern, PatternError, split_path};

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated users land when they hit a guest-only route.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Presentation shell a view is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Bare shell used by sign-in and sign-up pages.
    Auth,
    #[default]
    Default,
}

impl Layout {
    pub fn label(self) -> &'static str {
        match self {
            Layout::Auth => "Auth",
            Layout::Default => "Default",
        }
    }
}

/// Per-route access metadata.
///
/// `requires_auth` and `requires_guest` are mutually exclusive by convention
/// only. When both are set the auth check runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub layout: Layout,
}

impl RouteMeta {
    /// No access constraints.
    pub fn open(layout: Layout) -> Self {
        Self {
            requires_auth: false,
            requires_guest: false,
            layout,
        }
    }

    pub fn protected(layout: Layout) -> Self {
        Self {
            requires_auth: true,
            ..Self::open(layout)
        }
    }

    pub fn guest_only(layout: Layout) -> Self {
        Self {
            requires_guest: true,
            ..Self::open(layout)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub pattern: PathPattern,
    /// Stable view identifier; doubles as the route name.
    pub view_id: String,
    pub meta: RouteMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub from: PathPattern,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Redirect(&'a str),
    Route(RouteMatch<'a>),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    Pattern(PatternError),
    DuplicateView(String),
    InvalidRedirectTarget(String),
    UnknownView(String),
    MissingParam { view_id: String, param: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Pattern(e) => write!(f, "invalid route pattern: {e}"),
            RouteError::DuplicateView(v) => write!(f, "view {v:?} is already registered"),
            RouteError::InvalidRedirectTarget(t) => {
                write!(f, "redirect target {t:?} must be an absolute path")
            }
            RouteError::UnknownView(v) => write!(f, "no route for view {v:?}"),
            RouteError::MissingParam { view_id, param } => {
                write!(f, "route {view_id:?} needs parameter {param:?}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl From<PatternError> for RouteError {
    fn from(e: PatternError) -> Self {
        RouteError::Pattern(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    redirects: Vec<Redirect>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's routes.
    pub fn application() -> Result<Self, RouteError> {
        let mut table = Self::new();
        table.register("/login", "Login", RouteMeta::open(Layout::Auth))?;
        table.register("/register", "Register", RouteMeta::open(Layout::Auth))?;
        table.redirect("/", LOGIN_PATH)?;
        table.register("/profile", "Profile", RouteMeta::protected(Layout::Default))?;
        table.register("/dashboard", "Dashboard", RouteMeta::protected(Layout::Default))?;
        table.register("/properties", "Properties", RouteMeta::protected(Layout::Default))?;
        table.register(
            "/properties/create",
            "CreateProperty",
            RouteMeta::protected(Layout::Default),
        )?;
        table.register(
            "/contracts/create/{propertyId?}",
            "CreateContract",
            RouteMeta::protected(Layout::Default),
        )?;
        table.register("/my-contracts", "MyContracts", RouteMeta::protected(Layout::Default))?;
        Ok(table)
    }

    /// Appends a descriptor. Later registrations never shadow earlier ones.
    pub fn register(&mut self, pattern: &str, view_id: &str, meta: RouteMeta) -> Result<(), RouteError> {
        let pattern = PathPattern::parse(pattern)?;
        if self.routes.iter().any(|r| r.view_id == view_id) {
            return Err(RouteError::DuplicateView(view_id.to_string()));
        }
        if meta.requires_auth && meta.requires_guest {
            warn!(
                "Route {} ({}) is both auth-only and guest-only; auth check wins",
                pattern, view_id
            );
        }
        debug!("Registered route {} -> {} ({:?})", pattern, view_id, meta);
        self.routes.push(RouteDescriptor {
            pattern,
            view_id: view_id.to_string(),
            meta,
        });
        Ok(())
    }

    /// Adds a redirect rule, consulted before any descriptor.
    pub fn redirect(&mut self, from: &str, to: &str) -> Result<(), RouteError> {
        let from = PathPattern::parse(from)?;
        if !to.starts_with('/') {
            return Err(RouteError::InvalidRedirectTarget(to.to_string()));
        }
        debug!("Registered redirect {} -> {}", from, to);
        self.redirects.push(Redirect {
            from,
            to: to.to_string(),
        });
        Ok(())
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }

    /// First descriptor, in registration order, whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        let parts = split_path(path);
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .match_segments(&parts)
                .map(|params| RouteMatch { route, params })
        })
    }

    pub fn redirect_for(&self, path: &str) -> Option<&str> {
        let parts = split_path(path);
        self.redirects
            .iter()
            .find(|r| r.from.match_segments(&parts).is_some())
            .map(|r| r.to.as_str())
    }

    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        if let Some(to) = self.redirect_for(path) {
            return Resolution::Redirect(to);
        }
        match self.match_path(path) {
            Some(m) => Resolution::Route(m),
            None => Resolution::NotFound,
        }
    }

    pub fn by_view(&self, view_id: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.view_id == view_id)
    }

    /// Builds the concrete path for a named view.
    pub fn path_for(&self, view_id: &str, params: &HashMap<String, String>) -> Result<String, RouteError> {
        let route = self
            .by_view(view_id)
            .ok_or_else(|| RouteError::UnknownView(view_id.to_string()))?;
        route
            .pattern
            .build(params)
            .map_err(|MissingParam(param)| RouteError::MissingParam {
                view_id: view_id.to_string(),
                param,
            })
    }
}
