//! Audio output.
//!
//! The controller only ever talks to a [`PlaybackEngine`]. [`RodioEngine`]
//! is the real one; tests drive the controller with a recording fake.

mod engine;
mod rodio_engine;
mod types;

pub use engine::PlaybackEngine;
pub use rodio_engine::RodioEngine;
pub use types::{EngineEvent, PlaybackState};
