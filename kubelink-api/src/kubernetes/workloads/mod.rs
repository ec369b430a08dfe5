//! Kubernetes workload management
//!
//! Pod listing, deployment scale/delete, and manifest-based creation.

pub mod deployments;
pub mod manifest;
pub mod pods;
