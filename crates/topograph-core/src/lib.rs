//! Topograph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Topograph
//! crates. It includes:
//!
//! - **Channel**: The read-only snapshot of a channel's members, publications
//!   and subscriptions ([`channel`] module)
//! - **Node**: The kinds of visual nodes a snapshot is drawn with ([`node`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod channel;
pub mod geometry;
pub mod node;
