pub mod app_config;
pub mod board;
pub mod config;
pub mod error;
pub mod import;
pub mod making_time;
pub mod optimistic;
pub mod orders;
pub mod payout;
pub mod record;
pub mod schedule;
pub mod shipping;
pub mod status;
pub mod tags;
pub mod transition;
pub mod whatsapp;

pub use app_config::{AppConfig, Environment};
pub use board::OrderBoard;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, ImportError, PayoutError};
pub use import::{
    parse_line, parse_shipping_costs, DuplicateOrder, ImportPlan, OrderCandidate, ParsedBatch,
    ShippingCostEntry, ShippingCostImport,
};
pub use making_time::{detect_making_time, MakingTime};
pub use optimistic::{commit_or_revert, Optimistic};
pub use orders::{Customer, LineItem, Order};
pub use payout::{load_payout_config, paid_revenue, PayoutConfig, PayoutReport, PayoutShare};
pub use record::{OrderTagRecord, ShippingMethod};
pub use schedule::{custom_due_date_edit, today_in, OrderSchedule, DEFAULT_DISPLAY_TIMEZONE};
pub use shipping::{summarize, LedgerSummary, RecordStatus, ShippingRecord, ShippingType};
pub use status::{derive_status, OrderStatus};
pub use tags::{TagEdit, TagList, TagOp};
pub use transition::{
    plan_status_change, FollowUp, Gate, StatusChange, TransitionError, TransitionPlan,
};
pub use whatsapp::{normalize_phone, wa_me_link, MessageTemplate};
