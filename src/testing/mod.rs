//! Testing utilities for CrabRTC
//!
//! A recording engine that stands in for the real one, so sessions and canvas
//! bindings can be exercised without media hardware or network access.

pub mod mock_engine;

pub use mock_engine::{EngineCall, MockEngine, MockEngineProvider, NullDelegate, RecordedCall};
