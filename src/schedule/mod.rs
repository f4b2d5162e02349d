//! Weekly schedule handling: the window grammar parser, the expanded window
//! representation, and the boundary evaluator.

pub mod boundary;
pub mod clock;
pub mod parser;
pub mod window;

pub use self::clock::{Clock, SystemClock};
pub use self::window::{WindowDay, WindowSet};
