//! API integration tests
//!
//! These tests require a running server with a migrated database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:9090";
const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Helper to create a user with a unique name and email
async fn create_user(client: &Client, label: &str) -> i64 {
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": format!("{}-{}", label, nonce),
            "email": format!("{}-{}@example.com", label, nonce)
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse user response");
    body["id"].as_i64().expect("No user ID")
}

/// Helper to create an available item owned by the given user
async fn create_item(client: &Client, owner_id: i64, name: &str) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} description", name),
            "available": true
        }))
        .send()
        .await
        .expect("Failed to send create item request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item response");
    body["id"].as_i64().expect("No item ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_user() {
    let client = Client::new();
    let user_id = create_user(&client, "lifecycle").await;

    let response = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64(), Some(user_id));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflict() {
    let client = Client::new();
    let user_id = create_user(&client, "dup").await;

    let existing: Value = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": "another-name-entirely",
            "email": existing["email"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_item_partial_update_keeps_blank_fields() {
    let client = Client::new();
    let owner_id = create_user(&client, "item-owner").await;
    let item_id = create_item(&client, owner_id, "Cordless drill").await;

    // Blank name must be ignored, availability flip applied
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item_id))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "name": "   ",
            "available": false
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Cordless drill");
    assert_eq!(body["available"], false);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_update_item_by_non_owner_rejected() {
    let client = Client::new();
    let owner_id = create_user(&client, "owner").await;
    let stranger_id = create_user(&client, "stranger").await;
    let item_id = create_item(&client, owner_id, "Ladder").await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item_id))
        .header(USER_ID_HEADER, stranger_id)
        .json(&json!({ "name": "Stolen ladder" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, stranger_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_search_blank_text_returns_empty() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_booking_approval_flow() {
    let client = Client::new();
    let owner_id = create_user(&client, "booking-owner").await;
    let booker_id = create_user(&client, "booker").await;
    let item_id = create_item(&client, owner_id, "Tent").await;

    let start = chrono::Utc::now() + chrono::Duration::days(1);
    let end = start + chrono::Duration::days(2);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, booker_id)
        .json(&json!({
            "start": start,
            "end": end,
            "item_id": item_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "WAITING");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Only the owner may approve
    let response = client
        .patch(format!(
            "{}/bookings/{}?approved=true",
            BASE_URL, booking_id
        ))
        .header(USER_ID_HEADER, booker_id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let response = client
        .patch(format!(
            "{}/bookings/{}?approved=true",
            BASE_URL, booking_id
        ))
        .header(USER_ID_HEADER, owner_id)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // Second approval attempt is rejected
    let response = client
        .patch(format!(
            "{}/bookings/{}?approved=true",
            BASE_URL, booking_id
        ))
        .header(USER_ID_HEADER, owner_id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, booker_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_booking_in_the_past_rejected() {
    let client = Client::new();
    let owner_id = create_user(&client, "past-owner").await;
    let booker_id = create_user(&client, "past-booker").await;
    let item_id = create_item(&client, owner_id, "Projector").await;

    let start = chrono::Utc::now() - chrono::Duration::days(2);
    let end = chrono::Utc::now() - chrono::Duration::days(1);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, booker_id)
        .json(&json!({
            "start": start,
            "end": end,
            "item_id": item_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, booker_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();
    let owner_id = create_user(&client, "self-booker").await;
    let item_id = create_item(&client, owner_id, "Mixer").await;

    let start = chrono::Utc::now() + chrono::Duration::days(1);
    let end = start + chrono::Duration::days(1);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "start": start,
            "end": end,
            "item_id": item_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_unknown_booking_state_rejected() {
    let client = Client::new();
    let user_id = create_user(&client, "state-filter").await;

    let response = client
        .get(format!("{}/bookings?state=SOMETIME", BASE_URL))
        .header(USER_ID_HEADER, user_id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unknown state: SOMETIME");

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_finished_booking() {
    let client = Client::new();
    let owner_id = create_user(&client, "comment-owner").await;
    let commenter_id = create_user(&client, "commenter").await;
    let item_id = create_item(&client, owner_id, "Sander").await;

    // Never rented the item
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item_id))
        .header(USER_ID_HEADER, commenter_id)
        .json(&json!({ "text": "Worked great" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Owner cannot comment either
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item_id))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({ "text": "My own tool is great" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, commenter_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_request_with_answering_item() {
    let client = Client::new();
    let requester_id = create_user(&client, "requester").await;
    let owner_id = create_user(&client, "answering-owner").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_ID_HEADER, requester_id)
        .json(&json!({ "description": "Need a pressure washer" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_i64().expect("No request ID");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));

    // Answer the request with an item
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "name": "Pressure washer",
            "description": "2000 PSI",
            "available": true,
            "request_id": request_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_ID_HEADER, requester_id)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));

    // Own requests exclude the listing for other users
    let body: Value = client
        .get(format!("{}/requests/all", BASE_URL))
        .header(USER_ID_HEADER, requester_id)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let ids: Vec<i64> = body
        .as_array()
        .expect("Expected array")
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert!(!ids.contains(&request_id));

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, requester_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_bad_pagination_rejected() {
    let client = Client::new();
    let user_id = create_user(&client, "paging").await;

    let response = client
        .get(format!("{}/items?from=-1&size=10", BASE_URL))
        .header(USER_ID_HEADER, user_id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/items?from=0&size=0", BASE_URL))
        .header(USER_ID_HEADER, user_id)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await;
}

/// Helper to list booking ids for a state filter, in response order
async fn booking_ids(client: &Client, path: &str, user_id: i64, state: &str) -> Vec<i64> {
    let body: Value = client
        .get(format!("{}{}?state={}", BASE_URL, path, state))
        .header(USER_ID_HEADER, user_id)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    body.as_array()
        .expect("Expected array")
        .iter()
        .map(|booking| booking["id"].as_i64().expect("No booking ID"))
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_state_filters_return_matching_subsets_sorted() {
    let client = Client::new();
    let owner_id = create_user(&client, "filter-owner").await;
    let booker_id = create_user(&client, "filter-booker").await;
    let item_id = create_item(&client, owner_id, "Kayak").await;

    // Three future bookings with staggered starts
    let now = chrono::Utc::now();
    let mut ids = Vec::new();
    for days in [1i64, 3, 5] {
        let start = now + chrono::Duration::days(days);
        let response = client
            .post(format!("{}/bookings", BASE_URL))
            .header(USER_ID_HEADER, booker_id)
            .json(&json!({
                "start": start,
                "end": start + chrono::Duration::hours(12),
                "item_id": item_id
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Failed to parse response");
        ids.push(body["id"].as_i64().expect("No booking ID"));
    }
    let (first, middle, last) = (ids[0], ids[1], ids[2]);

    // Reject the middle one so WAITING and REJECTED split the set
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, middle))
        .header(USER_ID_HEADER, owner_id)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    for (path, user_id) in [("/bookings", booker_id), ("/bookings/owner", owner_id)] {
        // Exact subset, latest start first
        assert_eq!(
            booking_ids(&client, path, user_id, "ALL").await,
            vec![last, middle, first]
        );
        assert_eq!(
            booking_ids(&client, path, user_id, "FUTURE").await,
            vec![last, middle, first]
        );
        assert_eq!(
            booking_ids(&client, path, user_id, "WAITING").await,
            vec![last, first]
        );
        assert_eq!(
            booking_ids(&client, path, user_id, "REJECTED").await,
            vec![middle]
        );
        assert!(booking_ids(&client, path, user_id, "CURRENT").await.is_empty());
        assert!(booking_ids(&client, path, user_id, "PAST").await.is_empty());
    }

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, owner_id))
        .send()
        .await;
    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, booker_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_blank_fields_rejected() {
    let client = Client::new();
    let user_id = create_user(&client, "blank-fields").await;

    // Whitespace-only item name
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, user_id)
        .json(&json!({
            "name": "   ",
            "description": "Looks fine",
            "available": true
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Item not saved. Item with empty name.");

    // Whitespace-only request description
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_ID_HEADER, user_id)
        .json(&json!({ "description": " \t " }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Request not saved. Request with empty description."
    );

    // Whitespace-only comment text
    let item_id = create_item(&client, user_id, "Heat gun").await;
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item_id))
        .header(USER_ID_HEADER, user_id)
        .json(&json!({ "text": "   " }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Comment not saved. Comment with empty text.");

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_name_conflict() {
    let client = Client::new();
    let user_id = create_user(&client, "dup-name").await;

    let existing: Value = client
        .get(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": existing["name"],
            "email": "entirely-different@example.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    let _ = client
        .delete(format!("{}/users/{}", BASE_URL, user_id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_missing_sharer_header_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
