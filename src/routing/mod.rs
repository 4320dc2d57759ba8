//! # Client-side Routing
//!
//! Route table, path patterns and the navigation guard. Nothing here performs
//! navigation; callers act on the returned [`Decision`].
//!
//! ## Modules
//!
//! - [`pattern`]: path pattern parsing and matching
//! - [`table`]: the ordered route table and redirect rules
//! - [`guard`]: the allow/redirect decision per transition

pub mod guard;
pub mod pattern;
pub mod table;

pub use guard::{Decision, GuardTargets, NavigationGuard, decide};
pub use pattern::{PathPattern, PatternError};
pub use table::{
    DASHBOARD_PATH, LOGIN_PATH, Layout, Resolution, RouteDescriptor, RouteError, RouteMatch, RouteMeta,
    RouteTable,
};
