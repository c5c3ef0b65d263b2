//! Data models for extracted documents and pipeline configuration.

pub mod config;
pub mod record;
