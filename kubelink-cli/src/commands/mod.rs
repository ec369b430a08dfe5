//! Command handlers

pub mod deployments;
pub mod resources;
