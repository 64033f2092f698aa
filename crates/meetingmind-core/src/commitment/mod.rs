//! Commitment extraction and lifecycle.

pub mod classifier;
pub mod manager;
pub mod repository;
