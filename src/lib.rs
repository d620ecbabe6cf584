//! GrammarHive API gateway.
//!
//! Every request passes CORS preflight handling, exact method+path routing and,
//! for protected routes, bearer-token verification against the identity
//! provider's JWKS before a handler runs.

pub mod api;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
