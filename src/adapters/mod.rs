//! Infrastructure adapters for external systems.

pub mod llm;
pub mod sensors;
pub mod sqlite;
