//! Test Module
//!
//! Cross-module suite for the Consulting24 core.
//!
//! ## Test Categories
//! - `scenario_tests`: selector invariants, determinism and the reference scenarios
//! - `advisor_tests`: the advisor against a mock Gemini server
//! - `persistence_tests`: drafts, history and reopening saved results
//! - `export_tests`: Markdown report round trips

pub mod export_tests;
pub mod persistence_tests;
pub mod scenario_tests;
