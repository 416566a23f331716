//! Backend worker: owns the tokio runtime and the user list session.

pub mod commands;
pub mod runtime;
