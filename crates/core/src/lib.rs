//! Variation Table Core - catalog types and the bulk-edit workflow.
//!
//! This crate is shared by every Variation Table component:
//! - `admin` - the web panel that renders and saves the variation grid
//! - `cli` - migrations, demo seeding and SKU suggestions
//!
//! # Architecture
//!
//! The core crate performs no I/O of its own. Persistence is reached through
//! the [`catalog::CatalogStore`] trait, implemented by the admin crate for
//! `PostgreSQL` and by [`catalog::MemoryCatalog`] for tests.
//!
//! # Modules
//!
//! - [`types`] - IDs, products, attributes, variations and price validation
//! - [`catalog`] - the catalog store interface and the in-memory store
//! - [`grid`] - filtering, projection, bulk apply and SKU suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod grid;
pub mod types;

pub use types::*;
