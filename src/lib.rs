//! Session & distribution directory for a live video streaming platform.
//!
//! The directory records which viewers watch which uploader and which edge
//! servers carry each stream, and computes the load statistics a replication
//! decision-maker polls:
//!
//! - Viewer and uploader sessions (add, delete, point reads)
//! - Viewer counts per uploader and viewer lists per uploader
//! - Server occurrence counts and reported server bitrates
//! - Atomic replacement of uploader and viewer server lists
//! - A polled "viewer set changed" flag
//!
//! Everything lives in a flat key namespace behind the [`store::DirectoryStore`]
//! trait. The binary serves the directory over the Redis serialization
//! protocol (RESP), one Tokio task per connection.

pub mod commands;
pub mod config;
pub mod connection;
pub mod directory;
pub mod error;
pub mod input;
pub mod keys;
pub mod resp;
pub mod store;
