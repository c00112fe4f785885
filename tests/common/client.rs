//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    // ========================================================================
    // Gear Endpoints
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    pub async fn get_guitar(&self, id: &str) -> Response {
        self.get(&format!("/v1/gear/guitar/{}", id)).await
    }

    pub async fn get_amp(&self, id: &str) -> Response {
        self.get(&format!("/v1/gear/amp/{}", id)).await
    }

    pub async fn get_tone(&self, id: &str) -> Response {
        self.get(&format!("/v1/gear/tone/{}", id)).await
    }

    // ========================================================================
    // Match Endpoints
    // ========================================================================

    pub async fn match_preview(&self, tone_id: &str, guitar_id: &str, amp_id: &str) -> Response {
        self.match_preview_raw(json!({
            "toneId": tone_id,
            "targetGuitarId": guitar_id,
            "targetAmpId": amp_id,
        }))
        .await
    }

    /// Posts an arbitrary body, for malformed request tests.
    pub async fn match_preview_raw(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/v1/match/preview", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("POST request failed")
    }
}
