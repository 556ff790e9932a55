//! # sea-orm-callsite
//!
//! Call-site attribution for SeaORM database queries.
//!
//! This crate appends the application code location that issued each query to
//! the outgoing SQL text as an inline comment, so database-side telemetry
//! (`pg_stat_statements`, slow-query logs) can be correlated back to the
//! function, file, and line that sent the statement.
//!
//! ## Features
//!
//! - **Drop-in Wrapper**: `AttributedConnection` implements `ConnectionTrait`,
//!   `StreamTrait`, and `TransactionTrait` — use it wherever a connection goes
//! - **Accurate Call Sites**: the stack is walked per statement, skipping this
//!   crate and the ORM/driver/runtime plumbing by identity, not by frame count
//! - **Stable Labels**: absolute paths collapse to workspace-relative labels
//!   (`src/handlers/user.rs`) or bracketed package names (`[serde]`)
//! - **Idempotent**: already-annotated text is never annotated twice, across
//!   retries and statement reuse
//! - **Transparent**: parameter values, result shapes, and errors reach the
//!   caller exactly as the wrapped connection produced them
//! - **Zero Config**: sensible defaults; the workspace-area allow-list and
//!   skip-lists are configurable when the defaults don't fit
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sea_orm::Database;
//! use sea_orm_callsite::AttributedConnection;
//!
//! // Wrap your existing connection
//! let db = Database::connect("postgres://localhost/mydb").await?;
//! let db = AttributedConnection::from(db);
//!
//! // Use it exactly like a normal DatabaseConnection
//! let users = Users::find().all(&db).await?;
//! // The server sees:
//! //   SELECT … FROM users /*func_name=api::list_users,file=src/api/users.rs,line=27*/
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use sea_orm_callsite::{AttributedConnection, AttributionConfig};
//!
//! let config = AttributionConfig::default()
//!     .with_workspace_area("services")     // extra label root
//!     .with_internal_module("data_access") // never attribute this crate
//!     .with_column_recording(true);        // add col= to the marker
//!
//! let db = AttributedConnection::new(db, config);
//! ```
//!
//! ## Marker Format
//!
//! | Field | Description |
//! |-------|-------------|
//! | `func_name` | Demangled function path of the caller, `anonymous` if unknown |
//! | `file` | Derived path label (workspace-relative, `[package]`, or filename) |
//! | `line` | 1-based line number, `0` if unknown |
//! | `col` | Column, only with `with_column_recording(true)` |
//!
//! The marker is a single inline comment appended after one space:
//! `/*func_name=<NAME>,file=<LABEL>,line=<LINE>*/`. It never alters execution
//! semantics for engines that support inline comments, though comment-stripping
//! proxies between the application and the server will drop it.

mod callsite;
mod config;
mod connection;
mod label;
mod marker;

pub use callsite::{resolve_call_site, CallSite};
pub use config::AttributionConfig;
pub use connection::{AttributedConnection, CallsiteExt};
pub use label::derive_label;
pub use marker::{decorate, format_marker};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AttributedConnection, AttributionConfig, CallsiteExt};
}
