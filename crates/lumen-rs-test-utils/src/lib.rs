//! Test helpers shared across Lumen crates.

pub mod generator;
pub mod model_server;

pub use generator::{FailingGenerator, FixedGenerator, RecordedCall, RecordingGenerator};
pub use model_server::{CapturedRequest, FAKE_IMAGE_BYTES, FakeModelServer, ModelReply};
