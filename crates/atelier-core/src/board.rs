//! Local working copy of the backend's order list.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::orders::Order;
use crate::schedule::OrderSchedule;
use crate::status::OrderStatus;
use crate::tags::TagList;
use crate::CoreError;

/// Orders fetched from the backend, mutated optimistically in place.
#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    orders: Vec<Order>,
}

impl OrderBoard {
    #[must_use]
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Mutable access to an order's tags, for optimistic edits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrderNotFound`] if no order has this id.
    pub fn tags_mut(&mut self, id: i64) -> Result<&mut TagList, CoreError> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .map(|o| &mut o.tags)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    /// Resolves an operator-supplied reference (`#1120`, `1120` or a backend
    /// id) to a single order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrderNotFound`] when nothing matches and
    /// [`CoreError::AmbiguousOrder`] when the number is shared by several
    /// orders.
    pub fn find(&self, reference: &str) -> Result<&Order, CoreError> {
        let matches: Vec<&Order> = self
            .orders
            .iter()
            .filter(|o| o.matches_reference(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(CoreError::OrderNotFound(reference.to_string())),
            [only] => Ok(*only),
            many => {
                // An exact id match beats a number collision.
                if let Some(exact) = many.iter().find(|o| o.id.to_string() == reference.trim()) {
                    return Ok(*exact);
                }
                Err(CoreError::AmbiguousOrder {
                    reference: reference.to_string(),
                    ids: many.iter().map(|o| o.id).collect(),
                })
            }
        }
    }

    pub fn with_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.status() == status)
    }

    /// Open orders whose due date has passed, most overdue first.
    #[must_use]
    pub fn overdue(&self, tz: Tz, today: NaiveDate) -> Vec<(&Order, OrderSchedule)> {
        let mut overdue: Vec<(&Order, OrderSchedule)> = self
            .orders
            .iter()
            .map(|o| (o, OrderSchedule::for_order(o, tz, today)))
            .filter(|(_, schedule)| schedule.overdue)
            .collect();
        overdue.sort_by_key(|(_, schedule)| schedule.days_until_due);
        overdue
    }
}
