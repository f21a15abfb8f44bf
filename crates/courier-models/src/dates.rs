//! Wire encoding for timestamps.
//!
//! The API speaks Mongo relaxed extended JSON for dates:
//! `{"$date": "2020-04-08T17:54:14.692Z"}`. The modules here plug into
//! `#[serde(with = "...")]` on model fields.

/// Serde `with`-module for `DateTime<Utc>` fields.
pub mod mongo_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct DateRepr {
        #[serde(rename = "$date")]
        date: String,
    }

    fn to_repr(value: &DateTime<Utc>) -> DateRepr {
        DateRepr {
            date: value.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn from_repr(repr: DateRepr) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&repr.date).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_repr(value).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        from_repr(DateRepr::deserialize(deserializer)?).map_err(D::Error::custom)
    }

    /// Variant for `Option<DateTime<Utc>>` fields. Pair with
    /// `#[serde(default, skip_serializing_if = "Option::is_none")]`.
    pub mod option {
        use super::*;

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<DateRepr>::deserialize(deserializer)?
                .map(|repr| from_repr(repr).map_err(D::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mongo_date;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "mongo_date")]
        at: DateTime<Utc>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct MaybeStamped {
        #[serde(
            default,
            with = "mongo_date::option",
            skip_serializing_if = "Option::is_none"
        )]
        at: Option<DateTime<Utc>>,
    }

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 4, 8, 17, 54, 14).unwrap()
    }

    #[test]
    fn test_serializes_as_dollar_date() {
        let json = serde_json::to_string(&Stamped { at: sample() }).unwrap();
        assert_eq!(json, r#"{"at":{"$date":"2020-04-08T17:54:14.000Z"}}"#);
    }

    #[test]
    fn test_roundtrip() {
        let original = Stamped { at: sample() };
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_rejects_malformed_date() {
        let result = serde_json::from_str::<Stamped>(r#"{"at":{"$date":"yesterday"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bare_string() {
        let result = serde_json::from_str::<Stamped>(r#"{"at":"2020-04-08T17:54:14.000Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_absent_field() {
        let parsed: MaybeStamped = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.at, None);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "{}");
    }

    #[test]
    fn test_optional_present_field() {
        let original = MaybeStamped { at: Some(sample()) };
        let json = serde_json::to_string(&original).unwrap();
        let parsed: MaybeStamped = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
