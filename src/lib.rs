//! Quantity take-off gateway.
//!
//! Structural calculators (column sizing, concrete volumes, bar schedules)
//! behind an HTTP API that also relays users, projects and quantity reports
//! to the backend service.

pub mod api;
pub mod app;
pub mod auth;
pub mod calc;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
