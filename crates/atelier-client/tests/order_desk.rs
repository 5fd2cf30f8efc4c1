//! Integration tests for `OrderDesk`: optimistic tag writes, rollback on
//! backend failure, gate enforcement and follow-ups.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier_client::{AtelierClient, ClientError, DeskError, FollowUpOutcome, OrderDesk};
use atelier_core::{
    Gate, OrderStatus, StatusChange, TransitionError, DEFAULT_DISPLAY_TIMEZONE,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

fn order_json(id: i64, name: &str, tags: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "tags": tags,
        "customer": {"first_name": "Mona", "last_name": "Adel", "phone": "01001234567"},
        "line_items": [{"title": "Beaded Bracelet", "quantity": 2, "price": "150.00"}],
        "total_price": "300.00",
        "created_at": "2024-03-01T09:00:00Z"
    })
}

async fn desk_with(server: &MockServer, orders: serde_json::Value) -> OrderDesk {
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders))
        .mount(server)
        .await;
    let client = AtelierClient::with_base_url(&server.uri(), 5, "atelier-test/0.1", None)
        .expect("failed to build test client");
    OrderDesk::load(client, DEFAULT_DISPLAY_TIMEZONE)
        .await
        .expect("failed to load desk")
}

fn tags_of(desk: &OrderDesk, id: i64) -> Vec<String> {
    desk.board().get(id).unwrap().tags.as_slice().to_vec()
}

#[tokio::test]
async fn shipping_an_order_writes_tags_and_renders_notification() {
    let server = MockServer::start().await;
    let mut desk = desk_with(
        &server,
        json!([order_json(1, "#1120", "confirmed, confirmed_date:2024-03-02")]),
    )
    .await;

    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .and(body_json(json!({
            "tags": ["confirmed_date:2024-03-02", "shipped", "shipping_date:2024-03-05"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/whatsapp/templates/key/order_shipped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "order_shipped",
            "name": "Shipped",
            "body": "Hi {{customer_first_name}}, {{order_number}} is on its way"
        })))
        .mount(&server)
        .await;

    let outcome = desk
        .change_status(1, &StatusChange::to(OrderStatus::Shipped), today())
        .await
        .unwrap();

    assert_eq!(outcome.plan.to, OrderStatus::Shipped);
    assert_eq!(desk.board().get(1).unwrap().status(), OrderStatus::Shipped);
    assert_eq!(
        outcome.follow_ups,
        vec![FollowUpOutcome::ShippedMessage {
            message: "Hi Mona, #1120 is on its way".to_string(),
            link: Some(
                "https://wa.me/201001234567?text=Hi%20Mona%2C%20%231120%20is%20on%20its%20way"
                    .to_string()
            ),
        }]
    );
}

#[tokio::test]
async fn failed_write_restores_exact_prior_tags() {
    let server = MockServer::start().await;
    let mut desk = desk_with(
        &server,
        json!([order_json(1, "#1120", "ready_to_shipping_note, ready_to_ship, priority")]),
    )
    .await;
    let before = tags_of(&desk, 1);

    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = desk
        .change_status(1, &StatusChange::to(OrderStatus::Shipped), today())
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            DeskError::Client(ClientError::UnexpectedStatus { status: 503, .. })
        ),
        "got: {err:?}"
    );
    assert_eq!(tags_of(&desk, 1), before);
    assert_eq!(desk.board().get(1).unwrap().status(), OrderStatus::ReadyToShip);
}

#[tokio::test]
async fn missing_gate_input_writes_nothing() {
    let server = MockServer::start().await;
    let mut desk = desk_with(
        &server,
        json!([order_json(1, "#1120", "shipped, shipping_method:scooter")]),
    )
    .await;
    let before = tags_of(&desk, 1);

    let err = desk
        .change_status(1, &StatusChange::to(OrderStatus::Fulfilled), today())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeskError::Transition(TransitionError::InputRequired {
            gate: Gate::ShippingCost,
            ..
        })
    ));
    assert_eq!(tags_of(&desk, 1), before);
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.iter().all(|r| r.method.as_str() == "GET"),
        "no write may be sent while a gate is open"
    );
}

#[tokio::test]
async fn scooter_fulfillment_with_cost_records_it() {
    let server = MockServer::start().await;
    let mut desk = desk_with(
        &server,
        json!([order_json(1, "#1120", "shipped, shipping_method:scooter")]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let change = StatusChange::to(OrderStatus::Fulfilled).with_shipping_cost(Decimal::new(85, 0));
    let outcome = desk.change_status(1, &change, today()).await.unwrap();

    assert!(outcome.follow_ups.is_empty());
    let record = desk.board().get(1).unwrap().record();
    assert_eq!(record.status, OrderStatus::Fulfilled);
    assert_eq!(record.shipping_cost, Some(Decimal::new(85, 0)));
    assert_eq!(record.fulfillment_date(), Some(today()));
}

#[tokio::test]
async fn order_ready_sends_whatsapp_request() {
    let server = MockServer::start().await;
    let mut desk = desk_with(&server, json!([order_json(1, "#1120", "pending_note")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/whatsapp/order-ready"))
        .and(body_json(json!({"phone": "201001234567", "orderNumber": "#1120"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = desk
        .change_status(1, &StatusChange::to(OrderStatus::OrderReady), today())
        .await
        .unwrap();

    assert_eq!(
        outcome.follow_ups,
        vec![FollowUpOutcome::OrderReadySent {
            phone: "201001234567".to_string()
        }]
    );
}

#[tokio::test]
async fn failed_follow_up_keeps_committed_status() {
    let server = MockServer::start().await;
    let mut desk = desk_with(&server, json!([order_json(1, "#1120", "")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/whatsapp/order-ready"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let outcome = desk
        .change_status(1, &StatusChange::to(OrderStatus::OrderReady), today())
        .await
        .unwrap();

    assert!(matches!(outcome.follow_ups[0], FollowUpOutcome::Failed { .. }));
    assert_eq!(desk.board().get(1).unwrap().status(), OrderStatus::OrderReady);
}

#[tokio::test]
async fn past_custom_due_date_adds_priority() {
    let server = MockServer::start().await;
    let mut desk = desk_with(&server, json!([order_json(1, "#1120", "confirmed")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .and(body_json(json!({
            "tags": ["confirmed", "custom_due_date:2024-03-04", "priority"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let new_due = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    desk.set_custom_due_date(1, new_due, today()).await.unwrap();

    assert!(desk.board().get(1).unwrap().tags.contains("priority"));
}

#[tokio::test]
async fn extending_due_date_leaves_priority_alone() {
    let server = MockServer::start().await;
    let mut desk = desk_with(&server, json!([order_json(1, "#1120", "confirmed")])).await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // Default due date is 2024-03-08 (created 03-01 + 7 days).
    let new_due = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    desk.set_custom_due_date(1, new_due, today()).await.unwrap();

    let tags = &desk.board().get(1).unwrap().tags;
    assert_eq!(tags.value_of("custom_due_date"), Some("2024-03-20"));
    assert!(!tags.contains("priority"));
}

#[tokio::test]
async fn unknown_order_is_reported() {
    let server = MockServer::start().await;
    let mut desk = desk_with(&server, json!([])).await;
    let err = desk
        .change_status(99, &StatusChange::to(OrderStatus::Confirmed), today())
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::Core(_)));
}
