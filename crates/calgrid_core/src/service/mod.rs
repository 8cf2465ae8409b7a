//! UI-facing calendar services.
//!
//! # Responsibility
//! - Turn UI intents into store commands and view-state changes.
//! - Answer "what does the calendar show now" from store, grid and index.
//!
//! # Invariants
//! - Services never mutate events except through `EventStore` commands.
//! - Services stay storage-agnostic; persistence arrives through the store.

pub mod calendar_controller;
