//! Asynchronous click pipeline: buffered counter increments and
//! fire-and-forget event recording.

mod counter;
mod recorder;
pub mod user_agent;

pub use counter::ClickCounter;
pub use recorder::ClickRecorder;
