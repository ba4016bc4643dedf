//! Variation Table Admin library.
//!
//! This crate provides the admin panel as a library, allowing the router to
//! be driven from integration tests against an in-memory catalog.
//!
//! # Modules
//!
//! - [`config`] - environment configuration
//! - [`db`] - `PostgreSQL` repositories and the sqlx-backed catalog store
//! - [`catalog`] - the backend selected at startup
//! - [`routes`] - axum handlers and Askama templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod routes;
pub mod state;
