//! Fixed wire date formats.
//!
//! The API's dates are asymmetric: outbound encoding writes
//! `yyyy-MM-dd HH:mm:ss`, inbound decoding expects `yyyy-MM-ddTHH:mm:ssZ`.
//! Both are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

pub const ENCODE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DECODE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn encode(date: &DateTime<Utc>) -> String {
    date.format(ENCODE_FORMAT).to_string()
}

pub fn decode(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, DECODE_FORMAT).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde adapter for required date fields.
pub mod tfl_date {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional date fields.
pub mod tfl_date_option {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_some(&encode(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => decode(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
