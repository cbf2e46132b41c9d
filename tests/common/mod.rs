//! Shared fixtures for integration tests.

use std::time::Duration;

use media_export::{
    ExportConfig, FetchConfig, MediaDescriptor, MediaId, MediaKind, RetryConfig,
};
use wiremock::MockServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Config tuned for tests: small batches, near-zero retry delays
pub fn test_config() -> ExportConfig {
    ExportConfig {
        fetch: FetchConfig {
            batch_size: 2,
            request_timeout: Duration::from_secs(5),
        },
        retry: RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        ..ExportConfig::default()
    }
}

/// Descriptor pointing at a path on the given mock server
pub fn descriptor(server: &MockServer, id: &str, name: &str) -> MediaDescriptor {
    MediaDescriptor {
        id: MediaId::new(id),
        display_name: name.to_string(),
        content_url: format!("{}/signed/{id}", server.uri()),
        kind: MediaKind::Image,
        tags: vec![],
        created_at: None,
    }
}

/// Mount a signed-URL GET returning the given bytes
pub async fn mount_object(server: &MockServer, id: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/signed/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Mount a signed-URL GET returning an error status
pub async fn mount_failure(server: &MockServer, id: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/signed/{id}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
