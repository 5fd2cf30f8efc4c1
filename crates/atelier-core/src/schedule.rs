//! Start date, due date and days-in-state counters for an order.
//!
//! All calendar math happens in the configured display timezone so a late
//! evening order in Cairo lands on the same day for every operator, whatever
//! the host machine's locale.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::making_time::{detect_making_time, MakingTime};
use crate::orders::Order;
use crate::record::{format_tag_date, OrderTagRecord, CUSTOM_DUE_DATE_KEY, PRIORITY_TAG};
use crate::status::OrderStatus;
use crate::tags::{TagEdit, TagList};

pub const DEFAULT_DISPLAY_TIMEZONE: Tz = chrono_tz::Africa::Cairo;

/// Calendar date of `instant` in `tz`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_add_days(Days::new(d)));
    shifted.unwrap_or(date)
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Derived timeline for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSchedule {
    pub status: OrderStatus,
    pub making_time: MakingTime,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    /// `true` when the due date comes from a `custom_due_date:` tag.
    pub custom_due: bool,
    pub days_since_created: i64,
    /// Days since the current status was stamped; `None` when unstamped.
    pub days_in_status: Option<i64>,
    /// Negative once the due date has passed.
    pub days_until_due: i64,
    pub overdue: bool,
}

impl OrderSchedule {
    /// Builds the schedule of `order` as seen on `today`.
    #[must_use]
    pub fn for_order(order: &Order, tz: Tz, today: NaiveDate) -> Self {
        let record = order.record();
        let making_time = detect_making_time(&order.line_items);
        let created = local_date(order.created_at, tz);
        let start_date = record.custom_start_date.unwrap_or(created);
        let due_date = record
            .custom_due_date
            .unwrap_or_else(|| add_days(start_date, making_time.days()));
        let days_until_due = days_between(today, due_date);

        Self {
            status: record.status,
            making_time,
            start_date,
            due_date,
            custom_due: record.custom_due_date.is_some(),
            days_since_created: days_between(created, today),
            days_in_status: record.current_stamp().map(|d| days_between(d, today)),
            days_until_due,
            overdue: days_until_due < 0 && !record.status.is_terminal(),
        }
    }
}

/// Start date: `custom_start_date:` tag, else the creation date in `tz`.
#[must_use]
pub fn start_date(order: &Order, tz: Tz) -> NaiveDate {
    OrderTagRecord::from_tags(&order.tags)
        .custom_start_date
        .unwrap_or_else(|| local_date(order.created_at, tz))
}

/// Due date: `custom_due_date:` tag, else start plus detected making time.
#[must_use]
pub fn due_date(order: &Order, tz: Tz) -> NaiveDate {
    OrderTagRecord::from_tags(&order.tags)
        .custom_due_date
        .unwrap_or_else(|| add_days(start_date(order, tz), detect_making_time(&order.line_items).days()))
}

/// Tag edit that sets a custom due date.
///
/// Pulling the date in (anything not later than `current_due`) or setting a
/// date already in the past escalates the order with the `priority` tag.
/// Pushing the date out is an extension and leaves priority alone.
#[must_use]
pub fn custom_due_date_edit(
    tags: &TagList,
    new_due: NaiveDate,
    current_due: NaiveDate,
    today: NaiveDate,
) -> TagEdit {
    let edit = TagEdit::new().set_value(CUSTOM_DUE_DATE_KEY, format_tag_date(new_due));
    let escalation = new_due <= current_due || new_due < today;
    if escalation && !tags.contains(PRIORITY_TAG) {
        tracing::debug!(%new_due, %current_due, "due date pulled in; marking priority");
        edit.add(PRIORITY_TAG)
    } else {
        edit
    }
}
