//! Payment methods

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the table pays
///
/// Wire names are the ones printed on the till and stored in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Efectivo
    #[default]
    #[serde(rename = "Efectivo")]
    Cash,
    /// SINPE Móvil transfer
    #[serde(rename = "SINPE")]
    Sinpe,
    /// Tarjeta, the only method that carries the card surcharge
    #[serde(rename = "Tarjeta")]
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Sinpe, Self::Card];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Sinpe => "SINPE",
            Self::Card => "Tarjeta",
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, Self::Card)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment method: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"Tarjeta\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Sinpe).unwrap(), "\"SINPE\"");
        let m: PaymentMethod = serde_json::from_str("\"Efectivo\"").unwrap();
        assert_eq!(m, PaymentMethod::Cash);
    }

    #[test]
    fn test_parse() {
        assert_eq!("tarjeta".parse::<PaymentMethod>(), Ok(PaymentMethod::Card));
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
