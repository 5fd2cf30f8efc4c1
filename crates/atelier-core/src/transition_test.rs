use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::*;
use crate::status::derive_status;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
}

fn apply(tags: &str, change: &StatusChange) -> TagList {
    let tags = TagList::parse(tags);
    let plan = plan_status_change(&tags, change, today()).expect("plan should succeed");
    plan.edit.applied_to(&tags)
}

#[test]
fn confirm_replaces_previous_marker_and_stamps_date() {
    let next = apply("order-ready, priority", &StatusChange::to(OrderStatus::Confirmed));
    assert_eq!(derive_status(&next), OrderStatus::Confirmed);
    assert!(!next.contains("order-ready"));
    assert!(next.contains("priority"));
    assert_eq!(next.value_of("confirmed_date"), Some("2024-05-02"));
}

#[test]
fn back_to_pending_leaves_no_marker() {
    let next = apply("on_hold, on_hold_date:2024-05-01", &StatusChange::to(OrderStatus::Pending));
    assert_eq!(derive_status(&next), OrderStatus::Pending);
    assert_eq!(next.as_slice(), ["on_hold_date:2024-05-01"]);
}

#[test]
fn fulfil_default_courier_proceeds_immediately() {
    let next = apply("shipped", &StatusChange::to(OrderStatus::Fulfilled));
    assert_eq!(derive_status(&next), OrderStatus::Fulfilled);
    assert!(!next.contains("shipped"));
    assert_eq!(next.value_of("fulfillment_date"), Some("2024-05-02"));
}

#[test]
fn fulfil_explicit_shipblu_proceeds_immediately() {
    let next = apply(
        "shipped, shipping_method:Shipblu",
        &StatusChange::to(OrderStatus::Fulfilled),
    );
    assert_eq!(derive_status(&next), OrderStatus::Fulfilled);
}

#[test]
fn fulfil_scooter_requires_shipping_cost() {
    let tags = TagList::parse("shipped, shipping_method:scooter");
    let err = plan_status_change(&tags, &StatusChange::to(OrderStatus::Fulfilled), today())
        .unwrap_err();
    assert_eq!(
        err,
        TransitionError::InputRequired {
            target: OrderStatus::Fulfilled,
            gate: Gate::ShippingCost
        }
    );
}

#[test]
fn fulfil_other_company_records_cost() {
    let change = StatusChange::to(OrderStatus::Fulfilled).with_shipping_cost(Decimal::new(6500, 2));
    let next = apply("shipped, shipping_method:other-company", &change);
    assert_eq!(next.value_of("shipping_cost"), Some("65.00"));
    assert_eq!(next.value_of("fulfillment_date"), Some("2024-05-02"));
}

#[test]
fn negative_shipping_cost_is_rejected() {
    let tags = TagList::parse("shipping_method:scooter");
    let change = StatusChange::to(OrderStatus::Fulfilled).with_shipping_cost(Decimal::new(-1, 0));
    assert!(matches!(
        plan_status_change(&tags, &change, today()),
        Err(TransitionError::NegativeShippingCost(_))
    ));
}

#[test]
fn fulfil_pickup_requires_and_uses_picked_date() {
    let tags = TagList::parse("ready_to_ship, shipping_method:pickup");
    let err = plan_status_change(&tags, &StatusChange::to(OrderStatus::Fulfilled), today())
        .unwrap_err();
    assert!(matches!(
        err,
        TransitionError::InputRequired {
            gate: Gate::FulfillmentDate,
            ..
        }
    ));

    let picked = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
    let change = StatusChange::to(OrderStatus::Fulfilled).with_fulfillment_date(picked);
    let next = apply("ready_to_ship, shipping_method:pickup", &change);
    assert_eq!(next.value_of("fulfillment_date"), Some("2024-04-30"));
}

#[test]
fn cancel_requires_non_blank_reason() {
    let tags = TagList::parse("confirmed");
    let change = StatusChange::to(OrderStatus::Cancelled).with_cancellation_reason("   ");
    let err = plan_status_change(&tags, &change, today()).unwrap_err();
    assert!(matches!(
        err,
        TransitionError::InputRequired {
            gate: Gate::CancellationReason,
            ..
        }
    ));
}

#[test]
fn cancel_before_shipping_records_reason_only() {
    let change =
        StatusChange::to(OrderStatus::Cancelled).with_cancellation_reason("Customer changed mind");
    let next = apply("confirmed", &change);
    assert_eq!(derive_status(&next), OrderStatus::Cancelled);
    assert_eq!(
        next.value_of("cancellation_reason"),
        Some("Customer changed mind")
    );
    assert!(!next.contains("cancelled_after_shipping"));
}

#[test]
fn cancel_after_shipping_keeps_both_tags() {
    let change = StatusChange::to(OrderStatus::Cancelled).with_cancellation_reason("Refused");
    let next = apply("shipped, shipping_date:2024-05-01", &change);
    assert!(next.contains("cancelled"));
    assert!(next.contains("cancelled_after_shipping"));
    assert_eq!(next.value_of("cancelled_date"), Some("2024-05-02"));
}

#[test]
fn cancel_after_fulfillment_does_not_flag_shipping() {
    let change = StatusChange::to(OrderStatus::Cancelled).with_cancellation_reason("Returned");
    let next = apply("fulfilled, fulfillment_date:2024-05-01", &change);
    assert_eq!(derive_status(&next), OrderStatus::Cancelled);
    assert!(!next.contains("cancelled_after_shipping"));
}

#[test]
fn shipping_queues_notification_follow_up() {
    let tags = TagList::parse("ready_to_ship");
    let plan = plan_status_change(&tags, &StatusChange::to(OrderStatus::Shipped), today()).unwrap();
    assert_eq!(plan.from, OrderStatus::ReadyToShip);
    assert_eq!(
        plan.follow_ups,
        vec![FollowUp::ShippedNotification {
            template_key: SHIPPED_TEMPLATE_KEY
        }]
    );
}

#[test]
fn order_ready_queues_whatsapp_follow_up() {
    let tags = TagList::parse("confirmed");
    let plan =
        plan_status_change(&tags, &StatusChange::to(OrderStatus::OrderReady), today()).unwrap();
    assert_eq!(plan.follow_ups, vec![FollowUp::OrderReadyMessage]);
}

#[test]
fn gate_error_message_names_gate_and_target() {
    let err = TransitionError::InputRequired {
        target: OrderStatus::Cancelled,
        gate: Gate::CancellationReason,
    };
    assert_eq!(
        err.to_string(),
        "cancellation reason is required before changing status to cancelled"
    );
}
