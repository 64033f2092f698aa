//! In-process repositories.
//!
//! Entities are cloned in and out of a `DashMap`; no guard is ever held
//! across an `.await`. Contents live for the lifetime of the process.

pub mod commitment;
pub mod meeting;

pub use commitment::InMemoryCommitmentRepository;
pub use meeting::InMemoryMeetingRepository;
