//! Memory store abstractions and the in-process index.
//!
//! - `MemoryStore`: RPITIT trait implemented by each backend
//! - `BoxMemoryStore`: object-safe wrapper so the backend is chosen once at startup
//! - `LocalMemoryIndex`: lexical in-process backend
//! - `results`: flattening and dedup of grouped search responses

pub mod local;
pub mod results;
pub mod store;
