//! End-to-end tests for the match preview endpoint

mod common;

use common::{
    TestClient, TestServer, JCM800_ID, LES_PAUL_ID, PRACTICE_AMP_ID, SG_ID, TONE_RHYTHM_ID,
    TONE_SOLO_ID, TWIN_ID,
};
use reqwest::StatusCode;
use serde_json::json;
use tone_match_server::matching::RegistryOverrides;
use tone_match_server::{MatchPreview, Registries};

async fn preview_ok(client: &TestClient, tone: &str, guitar: &str, amp: &str) -> MatchPreview {
    let response = client.match_preview(tone, guitar, amp).await;
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_bridge_humbucker_onto_hh_marshall() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let preview = preview_ok(&client, TONE_SOLO_ID, SG_ID, JCM800_ID).await;

    assert_eq!(preview.pickup.target_position_label.as_deref(), Some("Bridge"));
    assert_eq!(preview.pickup.rationale[0], "Chosen Bridge (score 9)");
    assert_eq!(preview.amp.controls["Gain"], 8.0);
    assert_eq!(preview.amp.controls["Bass"], 4.0);
    assert_eq!(preview.amp.controls["Middle"], 5.0);
    assert_eq!(preview.amp.controls["Treble"], 6.0);
    assert_eq!(preview.amp.controls["Presence"], 5.0);
    assert_eq!(preview.amp.applied_offsets.len(), 1);
    assert_eq!(preview.amp.applied_offsets[0].control, "Gain");
    assert_eq!(preview.confidence_hint, 50);
    assert!(preview.warnings.is_empty());
}

#[tokio::test]
async fn test_identity_match_keeps_reference_settings() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let preview = preview_ok(&client, TONE_RHYTHM_ID, LES_PAUL_ID, TWIN_ID).await;

    assert_eq!(preview.pickup.target_position_label.as_deref(), Some("Treble"));
    assert_eq!(preview.amp.controls["Volume"], 6.0);
    assert_eq!(preview.amp.controls["Treble"], 7.5);
    assert_eq!(preview.amp.controls["Bass"], 3.0);
    assert!(preview.amp.applied_offsets.is_empty());
    // Band confidence carries no score, the default base applies.
    assert_eq!(preview.confidence_hint, 70);
}

#[tokio::test]
async fn test_amp_without_controls_yields_empty_map() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let preview = preview_ok(&client, TONE_SOLO_ID, SG_ID, PRACTICE_AMP_ID).await;
    assert!(preview.amp.controls.is_empty());
    assert!(preview.amp.applied_offsets.is_empty());
}

#[tokio::test]
async fn test_response_uses_camel_case_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.match_preview(TONE_SOLO_ID, SG_ID, JCM800_ID).await;
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["pickup"]["targetPositionLabel"], "Bridge");
    assert!(body["pickup"]["expectedEQBias"]["mids"].is_number());
    assert!(body["amp"]["mappingNotes"].is_array());
    assert_eq!(body["amp"]["appliedOffsets"][0]["control"], "Gain");
    assert_eq!(body["confidenceHint"], 50);
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let first = client
        .match_preview(TONE_SOLO_ID, LES_PAUL_ID, JCM800_ID)
        .await
        .text()
        .await
        .unwrap();
    let second = client
        .match_preview(TONE_SOLO_ID, LES_PAUL_ID, JCM800_ID)
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_ids_return_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    for (tone, guitar, amp, message) in [
        ("missing", SG_ID, JCM800_ID, "Tone 'missing' not found"),
        (TONE_SOLO_ID, "missing", JCM800_ID, "Guitar 'missing' not found"),
        (TONE_SOLO_ID, SG_ID, "missing", "Amp 'missing' not found"),
    ] {
        let response = client.match_preview(tone, guitar, amp).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn test_missing_or_blank_ids_return_400() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .match_preview_raw(json!({ "targetGuitarId": SG_ID, "targetAmpId": JCM800_ID }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "toneId is required");

    let response = client.match_preview(TONE_SOLO_ID, SG_ID, "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registry_overrides_change_family_bias() {
    let overrides: RegistryOverrides = serde_json::from_value(json!({
        "family_bias": { "marshall": { "gain": 3.0 } }
    }))
    .unwrap();
    let server = TestServer::spawn_with_registries(Registries::with_overrides(&overrides)).await;
    let client = TestClient::new(server.base_url.clone());

    let preview = preview_ok(&client, TONE_SOLO_ID, SG_ID, JCM800_ID).await;
    assert_eq!(preview.amp.controls["Gain"], 10.0);
}
