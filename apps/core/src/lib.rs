//! Consulting24 core: intake analysis, module selection and scenario content
//! for the business-strategy advisor.

pub mod actors;
pub mod advisor;
pub mod catalog;
pub mod config;
pub mod edit;
pub mod error;
pub mod export;
pub mod fallback;
pub mod models;
pub mod parse;
pub mod payloads;
pub mod prompt;
pub mod session;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;
