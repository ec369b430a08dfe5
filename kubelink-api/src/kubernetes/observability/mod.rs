//! Kubernetes observability
//!
//! Log retrieval.

pub mod logs;
