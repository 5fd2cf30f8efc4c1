use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("order reference {reference} matches several orders: {ids:?}")]
    AmbiguousOrder { reference: String, ids: Vec<i64> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read payout config at {path}: {source}")]
    PayoutFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse payout config: {0}")]
    PayoutFileParse(#[from] serde_yaml::Error),

    #[error("invalid payout config: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("no valid entries found in pasted text")]
    NoValidEntries,

    #[error("{0} duplicate order number(s) still need an order picked")]
    UnresolvedDuplicates(usize),

    #[error("order number {0} is not one of the duplicates")]
    UnknownDuplicate(String),

    #[error("order {order_id} is not a candidate for {order_number}")]
    NotACandidate { order_number: String, order_id: i64 },

    #[error("no entries matched an order")]
    NothingToImport,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayoutError {
    #[error("payout share name must be non-empty")]
    EmptyShareName,

    #[error("duplicate payout share: '{0}'")]
    DuplicateShare(String),

    #[error("share '{name}' has percent {percent}; must be between 0 and 100")]
    PercentOutOfRange { name: String, percent: String },

    #[error("payout shares total {0}%, more than 100%")]
    OverAllocated(String),
}
