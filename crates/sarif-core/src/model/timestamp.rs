use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A SARIF timestamp.
///
/// Valid values are written as `yyyy-MM-ddTHH:mm:ss.fffZ`. Text that does
/// not parse as RFC 3339 is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Utc(DateTime<Utc>),
    Unparsed(String),
}

impl Timestamp {
    pub fn parse(text: &str) -> Self {
        match DateTime::parse_from_rfc3339(text) {
            Ok(dt) => Timestamp::Utc(dt.with_timezone(&Utc)),
            Err(_) => Timestamp::Unparsed(text.to_string()),
        }
    }

    pub fn to_sarif_string(&self) -> String {
        match self {
            Timestamp::Utc(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Timestamp::Unparsed(s) => s.clone(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Utc(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_sarif_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_to_milliseconds() {
        let ts = Timestamp::parse("2016-07-16T14:18:25Z");
        assert_eq!(ts.to_sarif_string(), "2016-07-16T14:18:25.000Z");

        let ts = Timestamp::parse("2016-07-16T16:18:43.119123+02:00");
        assert_eq!(ts.to_sarif_string(), "2016-07-16T14:18:43.119Z");
    }

    #[test]
    fn test_unparsed_passthrough() {
        let ts: Timestamp = serde_json::from_str(r#""yesterday""#).unwrap();
        assert_eq!(ts, Timestamp::Unparsed("yesterday".into()));
        assert_eq!(serde_json::to_string(&ts).unwrap(), r#""yesterday""#);
    }
}
