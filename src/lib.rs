//! Client library for the rental platform: session state, route access
//! control and a typed REST client.

pub mod api;
pub mod core;
pub mod routing;
pub mod services;

#[cfg(test)]
pub mod test_support;
