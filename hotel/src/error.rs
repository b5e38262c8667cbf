//! Errors raised by the domain managers.

use chrono::NaiveDate;
use hotel_orm::{MappingError, PersistenceError};

/// A business rule was broken. Distinct from storage failures so callers can
/// tell "you asked for something impossible" from "the database failed".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("room {0} not found")]
    RoomNotFound(i64),
    #[error("room {0} is unavailable")]
    RoomUnavailable(i64),
    #[error("room number {0} already exists")]
    DuplicateRoomNumber(i32),
    #[error("price per night must be positive, got {0}")]
    NonPositivePrice(f32),
    #[error("customer {0} not found")]
    CustomerNotFound(i64),
    #[error("booking {0} not found")]
    BookingNotFound(i64),
    #[error("service {0} not found")]
    ServiceNotFound(i64),
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("total amount must not be negative, got {0}")]
    NegativeAmount(f32),
}

/// Errors from domain operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("row {line}: {source}")]
    Import {
        line: usize,
        #[source]
        source: MappingError,
    },
    #[error("row {line} rejected: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: InvariantViolation,
    },
}

impl ServiceError {
    pub fn is_invariant_violation(&self) -> bool {
        self.invariant().is_some()
    }

    pub fn invariant(&self) -> Option<&InvariantViolation> {
        match self {
            ServiceError::Invariant(v) | ServiceError::Rejected { source: v, .. } => Some(v),
            _ => None,
        }
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
