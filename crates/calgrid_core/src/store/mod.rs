//! Event store: sole owner of the event collection.
//!
//! # Responsibility
//! - Expose add/update/delete commands with validation.
//! - Write the full collection through to a persistence collaborator after
//!   every committed mutation.
//!
//! # Invariants
//! - Ids are unique across the live collection.
//! - Failed commands never mutate the collection.
//! - Persistence failures never roll back in-memory state.

pub mod event_store;
