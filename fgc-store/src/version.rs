use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ConfigError;

/// Schema version tag stored in every config document.
///
/// Ordering is lexicographic on `(major, minor, patch)`, which is what the
/// derived `Ord` gives for this field order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Build a version from signed components, rejecting negative or
    /// oversized values.
    pub fn from_components(
        major: i64,
        minor: i64,
        patch: i64,
    ) -> Result<Self, ConfigError> {
        let convert = |value: i64| {
            u32::try_from(value).map_err(|_| {
                ConfigError::MalformedVersion(format!(
                    "{major}.{minor}.{patch}"
                ))
            })
        };

        Ok(Self::new(convert(major)?, convert(minor)?, convert(patch)?))
    }

    /// Structured form used when patching loosely-typed documents.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(String::from("major"), Value::from(self.major));
        map.insert(String::from("minor"), Value::from(self.minor));
        map.insert(String::from("patch"), Value::from(self.patch));
        Value::Object(map)
    }

    /// Read a version back from its structured form.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let component = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_i64)
                .ok_or_else(|| ConfigError::MalformedVersion(value.to_string()))
        };

        Self::from_components(
            component("major")?,
            component("minor")?,
            component("patch")?,
        )
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedVersion(s.to_string());

        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(malformed());
        };

        let parse = |part: &str| -> Result<u32, ConfigError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        Ok(Self::new(parse(major)?, parse(minor)?, parse(patch)?))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use serde_json::json;

    use super::Version;
    use crate::errors::ConfigError;

    fn v(s: &str) -> Version {
        s.parse().expect("version should parse")
    }

    #[test]
    fn given_dotted_strings_when_parsed_then_display_round_trips() {
        for raw in ["0.1.0", "1.0.0", "10.20.30", "0.0.0", "4294967295.0.1"] {
            assert_eq!(v(raw).to_string(), raw);
        }
    }

    #[test]
    fn given_malformed_strings_when_parsed_then_returns_malformed_version() {
        let inputs = [
            "",
            "1",
            "1.0",
            "1.0.0.0",
            "1..0",
            "-1.0.0",
            "+1.0.0",
            "a.b.c",
            " 1.0.0",
            "1.0.99999999999",
        ];
        for raw in inputs {
            let result = raw.parse::<Version>();
            assert!(
                matches!(result, Err(ConfigError::MalformedVersion(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn given_versions_when_compared_then_order_is_lexicographic() {
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.1") < v("1.2.2"));
        assert!(v("1.2.2") >= v("0.1.1"));
        assert_eq!(v("0.1.1"), v("0.1.1"));
        assert_eq!(v("0.9.9").cmp(&v("1.0.0")), Ordering::Less);
        assert_eq!(v("2.0.0").cmp(&v("1.99.99")), Ordering::Greater);
    }

    #[test]
    fn given_negative_components_when_constructed_then_rejected() {
        assert!(Version::from_components(0, -1, 0).is_err());
        assert_eq!(
            Version::from_components(0, 1, 0).expect("valid components"),
            Version::new(0, 1, 0)
        );
    }

    #[test]
    fn given_version_when_converted_to_value_then_reads_back() {
        let version = Version::new(3, 1, 4);
        let value = version.to_value();

        assert_eq!(value, json!({"major": 3, "minor": 1, "patch": 4}));
        assert_eq!(
            Version::from_value(&value).expect("value should decode"),
            version
        );
    }

    #[test]
    fn given_incomplete_value_when_read_then_returns_malformed_version() {
        let missing = json!({"major": 0, "minor": 1});
        let negative = json!({"major": 0, "minor": -1, "patch": 0});
        let textual = json!("0.1.0");

        for value in [missing, negative, textual] {
            assert!(matches!(
                Version::from_value(&value),
                Err(ConfigError::MalformedVersion(_))
            ));
        }
    }
}
