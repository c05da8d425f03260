//! Common types shared across Verdant crates.

/// Unified error type for garden logic.
#[derive(thiserror::Error, Debug)]
pub enum GardenError {
    /// A spend was attempted with fewer stars than the cost.
    #[error("not enough stars: need {cost}, have {points}")]
    InsufficientFunds { cost: i64, points: i64 },
    /// The daily check-in reward was already claimed for the current date.
    #[error("already checked in today")]
    AlreadyCheckedIn,
    /// An action the garden rules forbid.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A persisted value could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
    /// The underlying store rejected a read or write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GardenResult<T> = Result<T, GardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_names_both_amounts() {
        let err = GardenError::InsufficientFunds {
            cost: 2000,
            points: 150,
        };
        assert_eq!(err.to_string(), "not enough stars: need 2000, have 150");
    }

    #[test]
    fn io_errors_convert() {
        fn read_missing() -> GardenResult<String> {
            Ok(std::fs::read_to_string("/no/such/verdant/file")?)
        }
        assert!(matches!(read_missing(), Err(GardenError::Io(_))));
    }
}
