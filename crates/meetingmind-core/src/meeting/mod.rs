//! Meeting intake, processing queue and lifecycle coordination.

pub mod coordinator;
pub mod queue;
pub mod repository;
pub mod service;
pub mod summarizer;
