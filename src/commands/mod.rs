//! Command entry points: thin orchestration over the engine.

pub mod apply;
pub mod generate;
pub mod service;
pub mod status;
