//! Test utilities shared across crate-level unit tests.

pub mod firebase;
pub mod http;
pub mod transport;

pub use firebase::{test_app, test_app_without_project};
pub use http::start_mock_server;
pub use transport::{RecordedCall, RecordingTransport};
