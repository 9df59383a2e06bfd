//! Payment method selection.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
///
/// Card numbers are checked client-side only; no payment is captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Pay now with a card.
    Card,
    /// Cash on delivery.
    #[default]
    Cod,
}

/// Returned when a payment method string is neither `card` nor `cod`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl PaymentMethod {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cod => "cod",
        }
    }

    /// Label for the checkout submit button.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self {
            Self::Card => "Pay Now",
            Self::Cod => "Place Order",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "cod" => Ok(Self::Cod),
            other => Err(UnknownPaymentMethod(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("cod".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cod);
        assert!("CARD".parse::<PaymentMethod>().is_err());
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Card).unwrap(),
            "\"card\""
        );
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cod);
        assert_eq!(PaymentMethod::Card.submit_label(), "Pay Now");
        assert_eq!(PaymentMethod::Cod.submit_label(), "Place Order");
    }
}
