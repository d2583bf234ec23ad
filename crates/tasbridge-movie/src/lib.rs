//! Per-frame controller input storage for recorded and replayed movies.
//!
//! A [`Movie`] is descriptive [`MovieMetadata`] plus an [`InputBuffer`]: one
//! independently owned sample sequence per controller slot, all of equal
//! length.

pub mod buffer;
pub mod error;
pub mod movie;

pub use buffer::InputBuffer;
pub use error::{MovieError, Result};
pub use movie::{Movie, MovieMetadata};
pub use tasbridge_frame::{InputSample, SAMPLE_WIDTH};
