//! CLI command implementations.

pub mod account;
pub mod advice;
pub mod init;
pub mod leaderboard;
pub mod progress;
pub mod screening;
pub mod steps;
pub mod tasks;
