//! Configuration loader and schema types.
//!
//! Settings drive the scanner (extensions, duration threshold, worker count),
//! the ignore list location, playback defaults and logging. They are read once
//! at startup.

mod load;
mod schema;

pub use schema::*;
