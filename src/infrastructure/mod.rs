//! Infrastructure layer - Adapters around the domain
//!
//! This layer contains:
//! - Config: Registry settings loaded from the environment
//! - Export: JSON snapshots of the whole registry, in memory or on disk
//! - Telemetry: tracing subscriber setup for host applications

pub mod config;
pub mod export;
pub mod telemetry;
