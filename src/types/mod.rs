//! Shared data structures for multi-segment well construction
//!
//! - Completion table rows (user input): `CompletionInterval`
//! - Schedule records (simulator input): COMPDAT / COMPSEGS / WELSEGS rows
//!   and the joined `GridConnection`
//! - Engine output: `TubingSegment` and `ReservoirConnection`

mod completion;
mod schedule;
mod segment;

pub use completion::*;
pub use schedule::*;
pub use segment::*;
