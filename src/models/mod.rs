//! Wire shapes exchanged with the catalog API and their conversions into
//! domain types.

pub mod coupon;
pub mod discount;
pub mod error;
pub mod page;
pub mod product;

/// JSON decimals arrive as numbers (Jackson `BigDecimal`) but some
/// deployments serialize them as strings.
pub(crate) mod decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::product::parse_decimal_cents;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn number_to_cents(value: f64) -> Option<i64> {
        if value.is_finite() && value >= 0.0 {
            Some((value * 100.0).round() as i64)
        } else {
            None
        }
    }

    fn raw_to_cents<E: serde::de::Error>(raw: Raw) -> Result<i64, E> {
        match raw {
            Raw::Number(value) => number_to_cents(value)
                .ok_or_else(|| E::custom(format!("invalid amount {value}"))),
            Raw::Text(text) => parse_decimal_cents(&text)
                .ok_or_else(|| E::custom(format!("invalid amount `{text}`"))),
        }
    }

    /// Amount in currency units <-> cents.
    pub mod cents {
        use super::*;

        pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_f64(*cents as f64 / 100.0)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
            raw_to_cents(Raw::deserialize(deserializer)?)
        }
    }

    /// Optional amount in currency units <-> cents.
    pub mod cents_option {
        use super::*;

        pub fn serialize<S: Serializer>(
            cents: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match cents {
                Some(value) => serializer.serialize_some(&(*value as f64 / 100.0)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            match Option::<Raw>::deserialize(deserializer)? {
                Some(raw) => raw_to_cents(raw).map(Some),
                None => Ok(None),
            }
        }
    }

    /// Plain decimal (percentages, coupon values) accepted as number or string.
    pub mod float {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
            match Raw::deserialize(deserializer)? {
                Raw::Number(value) => Ok(value),
                Raw::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| {
                        <D::Error as serde::de::Error>::custom(format!("invalid decimal `{text}`"))
                    }),
            }
        }
    }
}
