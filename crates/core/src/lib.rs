//! Core domain logic for Inventaris.
//!
//! This crate provides:
//! - The logical schema description consumed by the reconciler
//! - Attachment kinds and stored-filename generation
//! - The blob store backing attachment files
//!
//! It deliberately has no web or database dependencies.

pub mod advisory;
pub mod attachment;
pub mod naming;
pub mod schema;
pub mod storage;

pub use advisory::AdvisoryFailure;
pub use attachment::AttachmentKind;
pub use schema::{SchemaSpec, TableSpec, inventory_schema};
pub use storage::BlobStore;
