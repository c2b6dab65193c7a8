//! Record-grid state machine: soft-delete view filter, search, client-side
//! paging, id-keyed selection, and single-row edit sessions.
//!
//! Rendering is left to the host; [`controller::RecordGridController::page_view`]
//! yields everything a table renderer needs.
//!
//! # Examples
//!
//! Synchronous usage with [`controller::RecordGridController`]:
//! ```
//! use recgrid::{
//!     controller::RecordGridController,
//!     record::RecordDraft,
//!     schema::{FieldSpec, Schema},
//!     types::FilterMode,
//! };
//!
//! let schema = Schema::new(vec![
//!     FieldSpec::text("name").required().searchable(),
//!     FieldSpec::text("position").required(),
//! ])
//! .expect("schema");
//! let records = (1..=5).map(|i| {
//!     RecordDraft::new()
//!         .with("name", format!("Employee {i}"))
//!         .with("position", "Engineer")
//!         .disabled(i == 3)
//! });
//!
//! let mut grid = RecordGridController::new(schema, records);
//! assert!(grid.set_page_size(2));
//! assert_eq!(grid.visible_len(), 4);
//! assert_eq!(grid.total_pages(), 2);
//!
//! grid.soft_delete(1).expect("soft delete");
//! grid.toggle_filter();
//! assert_eq!(grid.filter_mode(), FilterMode::ShowDisabled);
//! assert_eq!(grid.visible_len(), 2);
//! ```
//!
//! Runtime usage with an async single-writer handle:
//! ```no_run
//! use recgrid::{
//!     controller::RecordGridController,
//!     record::RecordDraft,
//!     runtime::handle::{spawn_grid, RuntimeConfig},
//!     schema::{FieldSpec, Schema},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let schema = Schema::new(vec![FieldSpec::text("name").searchable()]).expect("schema");
//! let grid = RecordGridController::new(schema, Vec::<RecordDraft>::new());
//! let handle = spawn_grid(grid, RuntimeConfig::default());
//! let id = handle
//!     .add_record(RecordDraft::new().with("name", "Ada"))
//!     .await
//!     .expect("add");
//! handle.soft_delete(id).await.expect("soft delete");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![warn(missing_docs)]

/// Grid configuration.
pub mod config;
/// The grid state machine.
pub mod controller;
/// Store, filter, pager, selection, and edit-session building blocks.
pub mod core;
/// Error values.
pub mod error;
/// Queued notifications.
pub mod event;
/// Host capability hooks.
pub mod host;
/// Records, values, drafts, and patches.
pub mod record;
/// Single-writer async runtime and event stream APIs.
pub mod runtime;
/// Column schema.
pub mod schema;
/// Shared primitive types and enums.
pub mod types;
/// Render projection.
pub mod view;
