//! Integration tests for the engine client.
//!
//! Tests marked `#[ignore]` require a running scene service. Point
//! `TERRADIFF_ENGINE_URL` at one and run with:
//! `cargo test -p terradiff-cloud -- --ignored engine`

use terradiff_cloud::{EngineClient, EngineOptions, SceneRequest};
use terradiff_core::service::SceneQuery;
use terradiff_core::DateRange;

fn engine_url() -> String {
    std::env::var("TERRADIFF_ENGINE_URL").unwrap_or_else(|_| "http://localhost:8787".to_string())
}

fn flood_query() -> SceneQuery {
    SceneQuery {
        collection: "COPERNICUS/S1_GRD".to_string(),
        bbox: [-122.092, 37.42, -122.08, 37.431],
        range: DateRange::parse("2022-06-01", "2022-06-15").expect("literal range"),
        bands: vec!["VV".to_string()],
    }
}

/// Fetch one window of Sentinel-1 scenes.
#[tokio::test]
#[ignore]
async fn engine_single_window() {
    let client = EngineClient::new(engine_url(), EngineOptions::default())
        .expect("failed to create client");

    let request = SceneRequest::from_query(&flood_query()).limit(4);
    let scenes = client.scenes(&request).await.expect("scene request failed");

    println!("Found {} scenes", scenes.len());
    for scene in &scenes {
        println!("  {} dt={}", scene.id, scene.datetime.as_deref().unwrap_or("-"));
        let vv = scene.band("VV").expect("requested band present");
        assert!(!vv.is_empty(), "scene raster should carry pixels");
    }
}

/// Fetch both windows of a detection concurrently.
#[tokio::test]
#[ignore]
async fn engine_scene_pair() {
    let client = EngineClient::new(engine_url(), EngineOptions::default())
        .expect("failed to create client");

    let before = SceneRequest::from_query(&flood_query());
    let after = SceneRequest {
        datetime: "2022-07-01/2022-07-15".to_string(),
        ..before.clone()
    };

    let (b, a) = client
        .scene_pair(&before, &after)
        .await
        .expect("pair request failed");

    println!("before: {} scenes, after: {} scenes", b.len(), a.len());
}
