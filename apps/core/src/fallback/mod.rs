//! Deterministic analysis used when the AI path is unavailable.
//!
//! signals -> rules -> generator -> assembler. Everything here is synchronous
//! and free of I/O.

pub mod assembler;
pub mod fixtures;
pub mod generator;
pub mod rules;
pub mod signals;

pub use assembler::{
    add_custom_module, add_module, complete_eager_payloads, generate_detail, DetailOutcome,
    FallbackAnalyzer,
};
pub use signals::{Signal, SignalProfile};
