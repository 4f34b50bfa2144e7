//! Pantry Core - Shared domain types.
//!
//! This crate provides the types used across all Pantry components:
//! - `web` - The grocery inventory and shopping site
//! - `cli` - Command-line tools for migrations and stock management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Database encoding for the name types is available behind
//! the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Validated item and shopper names, log actions
//! - [`ingest`] - Normalization of manager-entered item lists and per-item outcomes
//! - [`transfer`] - Buy/return actions and their outcomes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ingest;
pub mod transfer;
pub mod types;

pub use ingest::{IngestOutcome, IngestReport, InvalidItem, MAX_INGEST_ITEMS, normalize_items};
pub use transfer::{TransferAction, TransferOutcome, UnknownTransferAction};
pub use types::*;
