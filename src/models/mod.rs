//! View models for the console.
//!
//! Everything here describes a single response being rendered. Entities are
//! owned by the remote storage service; nothing outlives one request.

pub mod listing;
