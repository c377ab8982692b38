//! Server-side wiring for the auraxmap HTTP surface.
//!
//! The binary in `main.rs` handles process lifecycle; the [`api`]
//! module exposes the router so integration tests can drive the full
//! HTTP surface in-process.

pub mod api;
