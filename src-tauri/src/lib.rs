//! qLauncher library
//!
//! This library exposes the core functionality of qLauncher for testing
//! and for the desktop binary.

pub mod app;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod services;
