//! Optimistic order mutations against the backend.
//!
//! The desk keeps a local [`OrderBoard`]. A mutation is planned, applied to
//! the board immediately, and the resulting tag list is sent to the backend.
//! If the write fails, the board is restored to the snapshot taken before the
//! edit. Follow-ups run only after a successful write and never roll it back.

use atelier_core::schedule::due_date;
use atelier_core::whatsapp::wa_me_link;
use atelier_core::{
    commit_or_revert, custom_due_date_edit, normalize_phone, plan_status_change, FollowUp, Order,
    OrderBoard, StatusChange, TagEdit, TagList, TransitionPlan,
};
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::client::AtelierClient;
use crate::error::DeskError;

/// What happened to one follow-up of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpOutcome {
    /// Shipping notification rendered for the operator to send.
    ShippedMessage {
        message: String,
        /// `None` when the order has no usable phone number.
        link: Option<String>,
    },
    OrderReadySent { phone: String },
    Skipped { follow_up: FollowUp, reason: String },
    Failed { follow_up: FollowUp, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusOutcome {
    pub plan: TransitionPlan,
    pub follow_ups: Vec<FollowUpOutcome>,
}

/// Local order board bound to a backend client.
pub struct OrderDesk {
    client: AtelierClient,
    board: OrderBoard,
    tz: Tz,
}

impl OrderDesk {
    #[must_use]
    pub fn new(client: AtelierClient, board: OrderBoard, tz: Tz) -> Self {
        Self { client, board, tz }
    }

    /// Fetches the order list and builds a desk around it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError`] if the order list cannot be fetched.
    pub async fn load(client: AtelierClient, tz: Tz) -> Result<Self, crate::ClientError> {
        let orders = client.list_orders().await?;
        Ok(Self::new(client, OrderBoard::new(orders), tz))
    }

    #[must_use]
    pub fn board(&self) -> &OrderBoard {
        &self.board
    }

    #[must_use]
    pub fn client(&self) -> &AtelierClient {
        &self.client
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Plans and commits a status change, then runs its follow-ups.
    ///
    /// # Errors
    ///
    /// - [`DeskError::Core`] if `order_id` is not on the board.
    /// - [`DeskError::Transition`] if a gate input is missing; nothing is
    ///   written.
    /// - [`DeskError::Client`] if the backend rejects the write; the board is
    ///   rolled back.
    pub async fn change_status(
        &mut self,
        order_id: i64,
        change: &StatusChange,
        today: NaiveDate,
    ) -> Result<StatusOutcome, DeskError> {
        let tags = self.board.tags_mut(order_id)?;
        let plan = plan_status_change(tags, change, today)?;

        self.commit_edit(order_id, &plan.edit).await?;
        tracing::info!(order_id, from = %plan.from, to = %plan.to, "status changed");

        let mut follow_ups = Vec::with_capacity(plan.follow_ups.len());
        for follow_up in &plan.follow_ups {
            follow_ups.push(self.run_follow_up(order_id, follow_up).await);
        }

        Ok(StatusOutcome { plan, follow_ups })
    }

    /// Sets a custom due date, escalating to `priority` when the date is
    /// pulled in or already past. Returns the applied edit.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Core`] for an unknown order and
    /// [`DeskError::Client`] if the backend rejects the write; the board is
    /// rolled back in that case.
    pub async fn set_custom_due_date(
        &mut self,
        order_id: i64,
        new_due: NaiveDate,
        today: NaiveDate,
    ) -> Result<TagEdit, DeskError> {
        let order = self
            .board
            .get(order_id)
            .ok_or_else(|| atelier_core::CoreError::OrderNotFound(order_id.to_string()))?;
        let current_due = due_date(order, self.tz);
        let edit = custom_due_date_edit(&order.tags, new_due, current_due, today);

        self.commit_edit(order_id, &edit).await?;
        tracing::info!(order_id, %current_due, %new_due, "custom due date set");
        Ok(edit)
    }

    /// Applies an arbitrary tag edit optimistically.
    ///
    /// # Errors
    ///
    /// Same as [`OrderDesk::set_custom_due_date`].
    pub async fn apply_edit(&mut self, order_id: i64, edit: &TagEdit) -> Result<(), DeskError> {
        self.commit_edit(order_id, edit).await
    }

    async fn commit_edit(&mut self, order_id: i64, edit: &TagEdit) -> Result<(), DeskError> {
        let client = &self.client;
        let tags = self.board.tags_mut(order_id)?;

        let result = commit_or_revert(
            tags,
            |tags: &mut TagList| edit.apply(tags),
            |next: TagList| async move { client.update_order_tags(order_id, &next).await },
        )
        .await;

        if let Err(err) = &result {
            tracing::warn!(order_id, error = %err, "tag update failed; local changes reverted");
        }
        result.map_err(DeskError::from)
    }

    async fn run_follow_up(&self, order_id: i64, follow_up: &FollowUp) -> FollowUpOutcome {
        let Some(order) = self.board.get(order_id) else {
            return FollowUpOutcome::Skipped {
                follow_up: follow_up.clone(),
                reason: "order no longer on the board".to_string(),
            };
        };

        match follow_up {
            FollowUp::ShippedNotification { template_key } => {
                self.shipped_message(order, follow_up, template_key).await
            }
            FollowUp::OrderReadyMessage => self.order_ready_message(order, follow_up).await,
        }
    }

    async fn shipped_message(
        &self,
        order: &Order,
        follow_up: &FollowUp,
        template_key: &str,
    ) -> FollowUpOutcome {
        match self.client.template_by_key(template_key).await {
            Ok(template) => {
                let message = template.render_for(order);
                let link = order.phone().and_then(|phone| wa_me_link(phone, &message));
                FollowUpOutcome::ShippedMessage { message, link }
            }
            Err(err) => {
                tracing::warn!(order = %order.name, template_key, error = %err, "shipped template unavailable");
                FollowUpOutcome::Failed {
                    follow_up: follow_up.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn order_ready_message(&self, order: &Order, follow_up: &FollowUp) -> FollowUpOutcome {
        let Some(phone) = order.phone().and_then(normalize_phone) else {
            return FollowUpOutcome::Skipped {
                follow_up: follow_up.clone(),
                reason: "order has no phone number".to_string(),
            };
        };

        match self.client.send_order_ready(&phone, &order.name).await {
            Ok(()) => FollowUpOutcome::OrderReadySent { phone },
            Err(err) => {
                tracing::warn!(order = %order.name, error = %err, "order-ready message failed");
                FollowUpOutcome::Failed {
                    follow_up: follow_up.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }
}
