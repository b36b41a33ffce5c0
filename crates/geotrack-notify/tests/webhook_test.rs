//! Webhook channel against a local HTTP receiver

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use geotrack_core::models::{Alert, DeliveryId, DriverId, GeofenceState};
use geotrack_core::ports::AlertNotifier;
use geotrack_notify::{
    ChannelNotifier, NotificationChannel, NotificationContent, Recipient, WebhookChannel,
};
use std::sync::{Arc, Mutex};

type Received = Arc<Mutex<Vec<serde_json::Value>>>;

async fn accept(
    State(received): State<Received>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    received.lock().unwrap().push(body);
    StatusCode::NO_CONTENT
}

async fn refuse() -> (StatusCode, &'static str) {
    (StatusCode::TOO_MANY_REQUESTS, "slow down")
}

/// Start a receiver on an ephemeral port and return its base URL
async fn spawn_receiver(received: Received) -> String {
    let app = Router::new()
        .route("/alerts", post(accept))
        .route("/refuse", post(refuse))
        .with_state(received);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_webhook_posts_alert_json() {
    let received: Received = Arc::default();
    let base = spawn_receiver(received.clone()).await;

    let notifier = ChannelNotifier::new(Arc::new(WebhookChannel::new(format!("{}/alerts", base))));
    let alert = Alert::transition(
        DriverId(3),
        DeliveryId(42),
        GeofenceState::Unknown,
        GeofenceState::Inside,
        0.2,
        Utc::now(),
    );
    notifier.notify(&alert).await.unwrap();

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["recipient"]["kind"], "delivery");
    assert_eq!(bodies[0]["recipient"]["id"], 42);
    assert_eq!(bodies[0]["data"]["to_state"], "INSIDE");
    assert_eq!(bodies[0]["data"]["driver_id"], 3);
}

#[tokio::test]
async fn test_webhook_rejection_is_reported() {
    let base = spawn_receiver(Arc::default()).await;
    let channel = WebhookChannel::new(format!("{}/refuse", base));
    let content = NotificationContent {
        title: "Geofence".to_string(),
        body: "Driver has left delivery zone".to_string(),
        data: serde_json::Value::Null,
    };

    let outcome = channel.send(&Recipient::Driver(DriverId(1)), &content).await.unwrap();
    assert!(!outcome.is_delivered());
}
