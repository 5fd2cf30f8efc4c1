//! Distributable profit pool (DPP) and its split into payout shares.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayoutError;
use crate::orders::Order;
use crate::schedule::local_date;
use crate::status::OrderStatus;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutShare {
    pub name: String,
    /// Percent of DPP, `0..=100`.
    pub percent: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutConfig {
    #[serde(default)]
    pub shares: Vec<PayoutShare>,
}

impl PayoutConfig {
    /// Sum of every share's percent.
    #[must_use]
    pub fn allocated_percent(&self) -> Decimal {
        self.shares.iter().map(|s| s.percent).sum()
    }

    /// # Errors
    ///
    /// Returns [`PayoutError`] for blank or duplicate names, a percent outside
    /// `0..=100`, or shares that together exceed 100%.
    pub fn validate(&self) -> Result<(), PayoutError> {
        let hundred = Decimal::ONE_HUNDRED;
        let mut seen = HashSet::new();

        for share in &self.shares {
            if share.name.trim().is_empty() {
                return Err(PayoutError::EmptyShareName);
            }
            if !seen.insert(share.name.trim().to_lowercase()) {
                return Err(PayoutError::DuplicateShare(share.name.clone()));
            }
            if share.percent < Decimal::ZERO || share.percent > hundred {
                return Err(PayoutError::PercentOutOfRange {
                    name: share.name.clone(),
                    percent: share.percent.to_string(),
                });
            }
        }

        let total = self.allocated_percent();
        if total > hundred {
            return Err(PayoutError::OverAllocated(total.normalize().to_string()));
        }
        Ok(())
    }
}

/// Load and validate payout shares from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_payout_config(path: &Path) -> Result<PayoutConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PayoutFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: PayoutConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::PayoutFileParse)?;

    config
        .validate()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    Ok(config)
}

/// Total price of orders whose derived status is `paid`, optionally limited to
/// orders created (in `tz`) within `from..=to`.
#[must_use]
pub fn paid_revenue(
    orders: &[Order],
    tz: Tz,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status() == OrderStatus::Paid)
        .filter(|o| {
            let created = local_date(o.created_at, tz);
            from.is_none_or(|f| created >= f) && to.is_none_or(|t| created <= t)
        })
        .map(|o| o.total_price)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutLine {
    pub name: String,
    pub percent: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutReport {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub shipping: Decimal,
    pub dpp: Decimal,
    pub lines: Vec<PayoutLine>,
    /// DPP left after every share is paid; equals DPP when DPP is not positive.
    pub retained: Decimal,
}

impl PayoutReport {
    /// Splits `revenue - expenses - shipping` across the configured shares.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError`] if `config` does not validate.
    pub fn compute(
        revenue: Decimal,
        expenses: Decimal,
        shipping: Decimal,
        config: &PayoutConfig,
    ) -> Result<Self, PayoutError> {
        config.validate()?;

        let dpp = revenue - expenses - shipping;
        let lines: Vec<PayoutLine> = config
            .shares
            .iter()
            .map(|share| {
                let amount = if dpp > Decimal::ZERO {
                    (dpp * share.percent / Decimal::ONE_HUNDRED).round_dp(2)
                } else {
                    Decimal::ZERO
                };
                PayoutLine {
                    name: share.name.clone(),
                    percent: share.percent,
                    amount,
                }
            })
            .collect();

        let paid: Decimal = lines.iter().map(|l| l.amount).sum();
        if dpp <= Decimal::ZERO {
            tracing::warn!(%dpp, "distributable profit pool is not positive; no payouts");
        }

        Ok(Self {
            revenue,
            expenses,
            shipping,
            dpp,
            lines,
            retained: dpp - paid,
        })
    }
}

#[cfg(test)]
#[path = "payout_test.rs"]
mod tests;
