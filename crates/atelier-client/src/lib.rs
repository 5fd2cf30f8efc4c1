pub mod client;
pub mod desk;
pub mod error;
pub mod types;

pub use client::AtelierClient;
pub use desk::{FollowUpOutcome, OrderDesk, StatusOutcome};
pub use error::{ClientError, DeskError};
pub use types::{BulkImportReceipt, RevertReceipt, UploadResults};
