//! `serde` interop: any serde data format can produce or consume a [`JsonValue`].
//!
//! This is how JSON text reaches the engine; the engine itself only sees the
//! value tree.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Decimal, JsonObject, JsonValue};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Int(v) => serializer.serialize_i32(*v),
            JsonValue::Long(v) => serializer.serialize_i64(*v),
            JsonValue::Decimal(d) => d.serialize(serializer),
            JsonValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonValue::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Integral values that fit `i128` or `u128` keep full precision.
///
/// Every other value goes through [`Decimal::to_f64`], which rounds to the
/// nearest `f64` (and to an infinity past its range): serde's data model has
/// no arbitrary-precision number. Render with [`JsonValue::to_json_string`]
/// to keep the exact text.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(v) = self.to_i128() {
            if let Ok(v) = i64::try_from(v) {
                return serializer.serialize_i64(v);
            }
            if let Ok(v) = u64::try_from(v) {
                return serializer.serialize_u64(v);
            }
            return serializer.serialize_i128(v);
        }
        if let Some(v) = self.to_u128() {
            return serializer.serialize_u128(v);
        }
        serializer.serialize_f64(self.to_f64())
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonValue, E> {
        Ok(JsonValue::from_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonValue, E> {
        Ok(JsonValue::from_u64(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<JsonValue, E> {
        Ok(JsonValue::from_i128(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<JsonValue, E> {
        match i128::try_from(v) {
            Ok(v) => Ok(JsonValue::from_i128(v)),
            Err(_) => Ok(JsonValue::Decimal(Decimal::from(v))),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonValue, E> {
        Decimal::from_f64(v)
            .map(JsonValue::Decimal)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v.into()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        JsonValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut object = JsonObject::with_capacity(map.size_hint().unwrap_or(0).min(4096));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value()?;
            object.insert(key, value).map_err(de::Error::custom)?;
        }
        Ok(JsonValue::Object(object))
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::value::{JsonKind, JsonValue};

    #[test]
    fn parses_through_serde_json() {
        let value: JsonValue =
            serde_json::from_str(r#"{"a":1,"b":[true,null,"x"],"c":2.5,"d":18446744073709551615}"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("a"), Some(&JsonValue::Int(1)));
        assert_eq!(object.get("c").unwrap().kind(), JsonKind::Decimal);
        assert_eq!(object.get("d").unwrap().as_i128(), Some(u64::MAX as i128));
        assert_eq!(value.to_string(), r#"{"a":1,"b":[true,null,"x"],"c":2.5,"d":18446744073709551615}"#);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = serde_json::from_str::<JsonValue>(r#"{"a":1,"a":2}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate object key `a`"));
    }

    #[test]
    fn decimals_serialize_exact_integers_and_rounded_fractions() {
        let big = JsonValue::Decimal("123456789012345678901234567890".parse().unwrap());
        assert_eq!(serde_json::to_string(&big).unwrap(), "123456789012345678901234567890");

        let precise = JsonValue::Decimal("0.1000000000000000000001".parse().unwrap());
        assert_eq!(serde_json::to_string(&precise).unwrap(), "0.1");
        assert_eq!(precise.to_json_string(), "0.1000000000000000000001");
    }

    #[test]
    fn serializes_through_serde_json() {
        let value: JsonValue = serde_json::from_str(r#"[1,{"k":"v"},-7,null]"#).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,{"k":"v"},-7,null]"#);
    }
}
