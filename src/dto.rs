use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::LedgerDate;

pub const DEBIT: &str = "debit";
pub const CREDIT: &str = "credit";

/// A financial record as it appears in the input dataset.
///
/// Records are never validated. Missing string fields become empty strings,
/// a missing or unparseable amount becomes `NaN` and a missing or
/// unparseable date becomes [`LedgerDate::Invalid`]. [`Default`] follows the
/// same rules, so a default record has a `NaN` amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub transaction_date: LedgerDate,
    #[serde(default = "nan", deserialize_with = "deserialize_amount")]
    pub transaction_amount: f64,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_description: String,
    #[serde(default)]
    pub merchant_name: String,
    #[serde(default)]
    pub card_type: String,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            transaction_id: String::new(),
            transaction_date: LedgerDate::default(),
            transaction_amount: f64::NAN,
            transaction_type: String::new(),
            transaction_description: String::new(),
            merchant_name: String::new(),
            card_type: String::new(),
        }
    }
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<LedgerDate>,
        amount: f64,
        tx_type: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: id.into(),
            transaction_date: date.into(),
            transaction_amount: amount,
            transaction_type: tx_type.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.transaction_description = description.into();
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant_name = merchant.into();
        self
    }

    pub fn with_card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = card_type.into();
        self
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == DEBIT
    }

    pub fn is_credit(&self) -> bool {
        self.transaction_type == CREDIT
    }
}

fn nan() -> f64 {
    f64::NAN
}

/// Parses a decimal string into `f64` once, at ingestion.
///
/// Accepts plain and exponent notation plus the exact spellings `Infinity`,
/// `+Infinity` and `-Infinity`. Other words (`inf`, `nan`, `infinity`) and
/// empty input give `NaN`.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim();
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if unsigned
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Accepts numbers and numeric-looking strings. Anything else is `NaN`.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(parse_amount(v))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<f64, E> {
            Ok(f64::NAN)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(f64::NAN)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(f64::NAN)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<f64, D2::Error> {
            d.deserialize_any(AmountVisitor)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(f64::NAN)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(f64::NAN)
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}
