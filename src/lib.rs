//! chatstack - a terminal chat client
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod models;
pub mod startup;
pub mod terminal;
pub mod traits;
pub mod ui;
