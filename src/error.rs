use std::error::Error;

use rusoto_ce::GetCostAndUsageError;
use rusoto_core::RusotoError;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug)]
pub enum BillingApiError {
    NoneValue,
    ToPrimitive,
    ParseAmount(String),
    CostAndUsageError(RusotoError<GetCostAndUsageError>),
    SerializeError(serde_json::Error),
}

impl Display for BillingApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BillingApiError::NoneValue => write!(f, "Value is None"),
            BillingApiError::ToPrimitive => {
                write!(f, "Failed to convert bigDecimal to primitive")
            }
            BillingApiError::ParseAmount(ref amount) => {
                write!(f, "Failed to parse cost amount: {}", amount)
            }
            BillingApiError::CostAndUsageError(ref error) => std::fmt::Display::fmt(error, f),
            BillingApiError::SerializeError(ref error) => std::fmt::Display::fmt(error, f),
        }
    }
}

impl Error for BillingApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            BillingApiError::CostAndUsageError(ref error) => Some(error),
            BillingApiError::SerializeError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<GetCostAndUsageError>> for BillingApiError {
    fn from(e: RusotoError<GetCostAndUsageError>) -> BillingApiError {
        BillingApiError::CostAndUsageError(e)
    }
}

impl From<serde_json::Error> for BillingApiError {
    fn from(e: serde_json::Error) -> BillingApiError {
        BillingApiError::SerializeError(e)
    }
}
