//! Backend worker bridge: commands flow in from the UI, events flow back out.

pub mod commands;
pub mod runtime;
