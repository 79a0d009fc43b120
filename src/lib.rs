//! Summoner name availability checker.
//!
//! Resolves `/lol-name-checker?region=&name=` against the name lookup service,
//! derives availability and decay facts, and keeps the page's form, loading state,
//! error toast and ad slots in step across soft navigations.

pub mod ads;
pub mod app;
pub mod config;
pub mod decay;
pub mod error;
pub mod lookup;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod page;
pub mod render;
pub mod routes;
pub mod state;
