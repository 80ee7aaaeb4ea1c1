use httpmock::MockServer;

/// Start a fresh `httpmock::MockServer` from inside an async test.
pub async fn start_mock_server() -> MockServer {
    MockServer::start_async().await
}
