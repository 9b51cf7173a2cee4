//! `covid-map-sync` library crate.
//!
//! The binary (`covid-map`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or hitting the network
//! - modules are reusable (e.g., future one-shot sync command, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod schedule;
pub mod web;
