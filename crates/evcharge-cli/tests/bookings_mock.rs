use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed_session(home: &Path) {
    let session = serde_json::json!({
        "token": "tok-seeded",
        "user": {
            "id": 4,
            "name": "Asha",
            "email": "asha@example.com",
            "phone": "0712345678",
            "is_admin": false
        }
    });
    fs::write(home.join("session.json"), session.to_string()).unwrap();
}

#[test]
fn test_book_requires_login() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .args([
            "book", "7", "--name", "Asha", "--car", "KA-1-A", "--phone", "0712345678", "--hours",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please login first to book a slot"));
}

#[tokio::test]
async fn test_book_confirms_with_amount() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    seed_session(dir.path());

    Mock::given(method("POST"))
        .and(path("/bookings/"))
        .and(body_json(serde_json::json!({
            "station_id": 7,
            "user_id": 4,
            "name": "Asha",
            "car_number": "KA-1-A",
            "phone": "0712345678",
            "hours": 2,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 31,
            "station_id": 7,
            "name": "Asha",
            "car_number": "KA-1-A",
            "phone": "0712345678",
            "hours": 2,
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .env("EVCHARGE_API_URL", server.uri())
        .args([
            "book", "7", "--name", "Asha", "--car", "KA-1-A", "--phone", "0712345678", "--hours",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Booking #31 confirmed for 2 hours. Amount due: ₹120.",
        ))
        .stdout(predicate::str::contains("evcharge pay 31"));
}

#[tokio::test]
async fn test_pay_settles_pending_booking() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    seed_session(dir.path());

    Mock::given(method("GET"))
        .and(path("/bookings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 31,
                "station_id": 7,
                "name": "Asha",
                "car_number": "KA-1-A",
                "phone": "0712345678",
                "hours": 3,
                "status": "pending"
            }
        ])))
        .mount(&server)
        .await;

    // Amount is hours times the flat rate, computed client-side.
    Mock::given(method("POST"))
        .and(path("/payments/process"))
        .and(body_json(serde_json::json!({
            "booking_id": 31,
            "amount": 180,
            "phone": "0712345678",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 5,
            "booking_id": 31,
            "amount": 180
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .env("EVCHARGE_API_URL", server.uri())
        .args(["pay", "31"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Payment of ₹180 recorded for booking #31.",
        ));
}

#[tokio::test]
async fn test_pay_unknown_booking_fails() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    seed_session(dir.path());

    Mock::given(method("GET"))
        .and(path("/bookings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .env("EVCHARGE_API_URL", server.uri())
        .args(["pay", "31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No booking found"));
}

#[tokio::test]
async fn test_bookings_scoped_to_current_user() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    seed_session(dir.path());

    Mock::given(method("GET"))
        .and(path("/admin/bookings"))
        .and(query_param("user_id", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 31,
                "station_id": 7,
                "phone": "0712345678",
                "car_number": "KA-1-A",
                "hours": 2,
                "amount": 120,
                "status": "paid",
                "date": "2025-04-02"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .env("EVCHARGE_API_URL", server.uri())
        .arg("bookings")
        .assert()
        .success()
        .stdout(predicate::str::contains("KA-1-A"))
        .stdout(predicate::str::contains("₹120"))
        .stdout(predicate::str::contains("paid"));
}

#[tokio::test]
async fn test_bookings_empty_message() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    seed_session(dir.path());

    Mock::given(method("GET"))
        .and(path("/admin/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .env("EVCHARGE_API_URL", server.uri())
        .arg("bookings")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookings yet."));
}

#[test]
fn test_bookings_require_login() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("evcharge")
        .env("EVCHARGE_HOME", dir.path())
        .arg("bookings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please login first"));
}
