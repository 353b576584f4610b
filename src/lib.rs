//! Users and kill-statistics management API.
//!
//! Routes are declared in [`config::app::config_services`]; each one runs its
//! rule set through [`functional::validation_engine`] before the matching
//! service touches the [`storage::Storage`] collaborator.

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod functional;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod services;
pub mod storage;
pub mod utils;
