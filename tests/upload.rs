use axum::{body::to_bytes, http::Request, Router};
use ridestats_rs::{config::Config, reference::ReferenceTables, samples, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let references = ReferenceTables::builtin().expect("reference tables");
    ridestats_rs::app(AppState::new(Config::default(), references))
}

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><name>Test Ride</name><trkseg>
    <trkpt lat="52.5200" lon="13.4050"><ele>34.0</ele><time>2026-01-01T12:00:00Z</time></trkpt>
    <trkpt lat="52.5205" lon="13.4060"><ele>39.0</ele><time>2026-01-01T12:00:10Z</time></trkpt>
  </trkseg></trk>
</gpx>"#
}

fn sample_tcx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Activities><Activity Sport="Biking"><Lap StartTime="2026-01-01T12:00:00Z"><Track>
    <Trackpoint><Time>2026-01-01T12:00:00Z</Time><Position><LatitudeDegrees>52.52</LatitudeDegrees><LongitudeDegrees>13.405</LongitudeDegrees></Position><AltitudeMeters>34.0</AltitudeMeters><DistanceMeters>0.0</DistanceMeters></Trackpoint>
    <Trackpoint><Time>2026-01-01T12:00:10Z</Time><Position><LatitudeDegrees>52.5205</LatitudeDegrees><LongitudeDegrees>13.406</LongitudeDegrees></Position><AltitudeMeters>39.0</AltitudeMeters><DistanceMeters>88.0</DistanceMeters></Trackpoint>
  </Track></Lap></Activity></Activities>
</TrainingCenterDatabase>"#
}

fn multipart_body(file_name: &str, file_body: &str, boundary: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

fn multipart_body_with_session(
    file_name: &str,
    file_body: &str,
    session_id: &str,
    boundary: &str,
) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\n{session_id}\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

fn text_part(name: &str, value: &str, boundary: &str) -> String {
    format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

fn upload_request(body: String, boundary: &str) -> Request<axum::body::Body> {
    Request::builder()
        .uri("/api/upload")
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn upload_gpx_returns_session_and_summary() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body("ride.gpx", sample_gpx(), boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["session_id"].is_string());
    assert_eq!(json["file_type"], "gpx");
    assert_eq!(json["point_count"], 2);
    assert_eq!(json["summary"]["distance_km"], 0.09);
    assert_eq!(json["summary"]["elevation_gain_m"], 5.0);
    assert_eq!(json["summary"]["moving_time_seconds"], 10.0);
    assert!(json["summary"]["fastest_windowed"].is_null());
}

#[tokio::test]
async fn upload_tcx_is_accepted() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body("ride.TCX", sample_tcx(), boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["file_type"], "tcx");
    assert_eq!(json["summary"]["distance_km"], 0.09);
    assert_eq!(json["summary"]["start_date"], "2026-01-01");
    assert_eq!(json["summary"]["start_time"], "12:00:00");
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body("ride.txt", "hello", boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("message").contains("Unsupported"));
}

#[tokio::test]
async fn upload_rejects_malformed_track() {
    let boundary = "X-BOUNDARY-TEST";
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"><ele>3</ele></trkpt></trkseg></trk></gpx>"#;
    let body = multipart_body("ride.gpx", gpx, boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("message").contains("Malformed track"));
}

#[tokio::test]
async fn upload_rejects_empty_track() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body("ride.gpx", "<gpx><trk><trkseg/></trk></gpx>", boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("message").contains("no points"));
}

#[tokio::test]
async fn upload_with_session_id_replaces_ride() {
    let app = app();
    let boundary = "X-BOUNDARY-TEST";

    let first = app
        .clone()
        .oneshot(upload_request(multipart_body("ride.gpx", sample_gpx(), boundary), boundary))
        .await
        .expect("response");
    let session_id = json_body(first).await["session_id"]
        .as_str()
        .expect("session id")
        .to_string();

    let second = app
        .clone()
        .oneshot(upload_request(
            multipart_body_with_session("ride.tcx", sample_tcx(), &session_id, boundary),
            boundary,
        ))
        .await
        .expect("response");
    assert_eq!(second.status(), axum::http::StatusCode::OK);
    let json = json_body(second).await;
    assert_eq!(json["session_id"], session_id.as_str());
    assert_eq!(json["file_type"], "tcx");
}

#[tokio::test]
async fn upload_with_unknown_session_id_is_not_found() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_body_with_session("ride.gpx", sample_gpx(), "missing", boundary);

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_sample_ride_without_file() {
    let boundary = "X-BOUNDARY-TEST";
    for sample in &samples::SAMPLE_RIDES {
        let body = format!("{}--{boundary}--\r\n", text_part("sample", sample.id, boundary));

        let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

        assert_eq!(response.status(), axum::http::StatusCode::OK, "sample {}", sample.id);
        let json = json_body(response).await;
        assert!(json["point_count"].as_u64().expect("point count") >= 6);
        assert!(json["summary"]["fastest_windowed"].is_object());
        assert!(json["summary"]["distance_km"].as_f64().expect("distance") > 0.0);
    }
}

#[tokio::test]
async fn uploaded_file_takes_precedence_over_sample() {
    let boundary = "X-BOUNDARY-TEST";
    let body = format!(
        "{}{}",
        text_part("sample", "3", boundary),
        multipart_body("ride.gpx", sample_gpx(), boundary)
    );

    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["file_type"], "gpx");
    assert_eq!(json["point_count"], 2);
}

#[tokio::test]
async fn upload_rejects_unknown_sample_and_empty_form() {
    let boundary = "X-BOUNDARY-TEST";

    let body = format!("{}--{boundary}--\r\n", text_part("sample", "7", boundary));
    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().expect("message").contains("sample"));

    let body = multipart_body("", "", boundary);
    let response = app().oneshot(upload_request(body, boundary)).await.expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}
