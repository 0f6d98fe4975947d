//! # pantry-store
//!
//! Local storage for the Pantry household inventory, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed repository helpers for items,
//! locations and settings. Opening a `Database` always runs the schema
//! manager first.

pub mod database;
pub mod items;
pub mod locations;
pub mod migrations;
pub mod models;
pub mod settings;

mod error;
mod timestamps;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
