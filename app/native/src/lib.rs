//! Sticky Windows - regions pinned to the edges of a window layout.
//!
//! A sticky region stays anchored to one side of the frame, is kept out of
//! "delete other regions", can never take the last regular region with it,
//! and is restored to its configured size after every layout change.
//!
//! - [`sticky`] holds the subsystem itself, written against the
//!   [`LayoutHost`](sticky::LayoutHost) trait.
//! - [`sim`] provides an in-memory host and a scenario runner.
//! - [`cli`] and [`config`] back the `sticky` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod sim;
pub mod sticky;
