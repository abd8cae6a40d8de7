//! Decimal helpers and serde adapters for monetary values.
//!
//! Money is carried as [`BigDecimal`] end to end; nothing in the crate rounds
//! mid-calculation. Rounding to 2 fraction digits happens in exactly two
//! places: the derived tax percent (which the backend stores rounded) and the
//! serialization boundary, where every monetary field becomes a decimal
//! string like `"32.25"`.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Deserializer, Serializer};

/// Round to 2 fraction digits, half-up. Matches the backend's
/// `quantize(Decimal("0.01"), ROUND_HALF_UP)`.
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Render a monetary value as a decimal string with exactly 2 fraction
/// digits, e.g. `30` becomes `"30.00"`.
pub fn to_money_string(value: &BigDecimal) -> String {
    round2(value).to_string()
}

/// Serialize a monetary value as a 2-fraction-digit decimal string.
pub(crate) fn serialize_money<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_money_string(value))
}

/// Serialize a non-monetary decimal (quantity, tax rate) as a plain decimal
/// string, preserving whatever scale the value carries.
pub(crate) fn serialize_decimal<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Deserialize a decimal from its string form.
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BigDecimal::from_str(s.trim()).map_err(serde::de::Error::custom)
}

/// Deserialize an optional decimal from either a JSON string or a JSON
/// number. Extractor output is not trustworthy about which one it emits;
/// anything unparseable becomes `None` rather than failing the whole
/// document. Numbers go through their decimal text form, never through a
/// binary float.
pub(crate) fn deserialize_lenient_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(&dec("2.345")), dec("2.35"));
        assert_eq!(round2(&dec("2.344")), dec("2.34"));
        assert_eq!(round2(&dec("2.5")), dec("2.50"));
    }

    #[test]
    fn money_string_pads_to_two_digits() {
        assert_eq!(to_money_string(&BigDecimal::from(30)), "30.00");
        assert_eq!(to_money_string(&dec("32.25")), "32.25");
        assert_eq!(to_money_string(&dec("0")), "0.00");
    }

    #[test]
    fn money_string_rounds_excess_precision() {
        // 107.999... style artifacts from division must not leak out.
        assert_eq!(to_money_string(&dec("107.9999999999")), "108.00");
    }

    #[test]
    fn serialize_money_emits_string() {
        #[derive(Serialize)]
        struct Wrap<'a> {
            #[serde(serialize_with = "super::serialize_money")]
            v: &'a BigDecimal,
        }

        let v = dec("7.5");
        let j = serde_json::to_value(Wrap { v: &v }).unwrap();
        assert_eq!(j.get("v").and_then(|v| v.as_str()), Some("7.50"));
    }

    #[test]
    fn deserialize_decimal_rejects_garbage() {
        #[derive(serde::Deserialize)]
        struct Wrap {
            #[serde(deserialize_with = "super::deserialize_decimal")]
            v: BigDecimal,
        }

        let ok: Wrap = serde_json::from_value(serde_json::json!({"v": "12.50"})).unwrap();
        assert_eq!(ok.v, dec("12.50"));
        assert!(serde_json::from_value::<Wrap>(serde_json::json!({"v": "reee"})).is_err());
    }

    #[test]
    fn lenient_decimal_accepts_numbers_strings_and_junk() {
        #[derive(serde::Deserialize)]
        struct Wrap {
            #[serde(default, deserialize_with = "super::deserialize_lenient_decimal")]
            v: Option<BigDecimal>,
        }

        let from_num: Wrap = serde_json::from_value(serde_json::json!({"v": 7.5})).unwrap();
        assert_eq!(from_num.v, Some(dec("7.5")));

        let from_bool: Wrap = serde_json::from_value(serde_json::json!({"v": true})).unwrap();
        assert_eq!(from_bool.v, None);

        let from_str: Wrap = serde_json::from_value(serde_json::json!({"v": "7.5"})).unwrap();
        assert_eq!(from_str.v, Some(dec("7.5")));

        let from_junk: Wrap = serde_json::from_value(serde_json::json!({"v": "n/a"})).unwrap();
        assert_eq!(from_junk.v, None);

        let missing: Wrap = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(missing.v, None);
    }
}
