//! The gwadm library.
//!
//! This crate provides the core functionality for the gwadm Google
//! Workspace administration CLI: the retry-aware API invocation layer,
//! the Directory API client, configuration, output formatting, and
//! command execution.
//!
//! # Modules
//!
//! - `actions`: CLI command handlers
//! - `auth`: OAuth2 token acquisition
//! - `batch`: bounded subprocess fan-out for batch files
//! - `commands`: clap command definitions
//! - `configuration`: configuration management
//! - `format`: output formatting (JSON, CSV)
//! - `gapi`: retry/backoff call wrapper and page-token iteration
//! - `model`: Directory entity models
//! - `service`: reqwest-backed Directory API service

pub mod actions;
pub mod auth;
pub mod batch;
pub mod commands;
pub mod configuration;
pub mod exit_codes;
pub mod format;
pub mod gapi;
pub mod model;
pub mod service;
