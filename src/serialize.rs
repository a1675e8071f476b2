//! Contains custom serialization and deserialization functions.

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serializer};
use steamid_ng::SteamID;

/// Serializes and deserializes a number to and from a string. Steam encodes most 64-bit values
/// as strings in its JSON bodies.
pub mod string {
    use std::fmt::Display;
    use std::str::FromStr;
    use serde::{de, Serializer, Deserialize, Deserializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// Deserializes an optional string-encoded number where `"0"` means absent.
pub fn option_string_0_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if s == "0" => Ok(None),
        Some(s) => s.parse::<T>()
            .map(Some)
            .map_err(de::Error::custom),
        None => Ok(None),
    }
}

/// Deserializes a bool from a bool or an integer (`0`/`1`).
pub fn from_int_to_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl Visitor<'_> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a bool or an integer")
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(de::Error::invalid_value(Unexpected::Unsigned(other), &"0 or 1")),
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(de::Error::invalid_value(Unexpected::Signed(other), &"0 or 1")),
            }
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

/// Deserializes an optional string-encoded number.
pub fn option_str_to_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    struct OptionVisitor<T> {
        marker: PhantomData<T>,
    }

    impl<'de, T> Visitor<'de> for OptionVisitor<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        type Value = Option<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string-encoded number or none")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            String::deserialize(deserializer)?
                .parse()
                .map(Some)
                .map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_option(OptionVisitor { marker: PhantomData })
}

/// Serializes a [`SteamID`] as its 64-bit representation in a string.
pub fn steamid_as_string<S>(steamid: &SteamID, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&u64::from(*steamid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct StringlyTyped {
        #[serde(with = "string")]
        value: u64,
        #[serde(default)]
        #[serde(deserialize_with = "option_string_0_as_none")]
        instanceid: Option<u64>,
        #[serde(deserialize_with = "from_int_to_bool")]
        tradable: bool,
    }

    #[test]
    fn deserializes_stringly_typed_values() {
        let parsed: StringlyTyped = serde_json::from_str(
            r#"{"value":"12345678901","instanceid":"0","tradable":1}"#,
        ).unwrap();

        assert_eq!(parsed.value, 12345678901);
        assert_eq!(parsed.instanceid, None);
        assert!(parsed.tradable);
    }
}
