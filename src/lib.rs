//! publog - read-only query service for the media publication backup log.
//!
//! A thin HTTP front over a single relational table: lookups by id,
//! publication date, date range, title keyword, and category, served as JSON
//! or CSV. The store is PostgreSQL or MySQL, selected at runtime from the
//! database URL; the two adapters are never active at the same time.

pub mod cli;
pub mod config;
pub mod display;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
