//! # Sequence Calculator Crate
//!
//! This crate provides the pure computation at the heart of the service:
//! mapping a non-negative index to its Fibonacci value.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems — no I/O, no async, no database. That keeps it trivially
//!   testable and reusable.
//! - **Stateless Calculation:** `compute` is a deterministic, side-effect-free
//!   function. Callers own any policy decisions such as upper bounds.
//!
//! ## Public API
//!
//! - `compute`: The iterative Fibonacci calculation.
//! - `SequenceError`: The specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod calculator;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use calculator::compute;
pub use error::SequenceError;
