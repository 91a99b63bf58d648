//! Data models for the intake pipeline.

pub mod config;
pub mod record;
pub mod slot;
pub mod submission;
