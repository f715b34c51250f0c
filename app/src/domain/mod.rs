use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParameterName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ParameterName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    SecureString,
    StringList,
}

impl ParameterType {
    pub const ALL: [ParameterType; 3] = [Self::String, Self::SecureString, Self::StringList];

    /// Spelling used by the parameter store API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::SecureString => "SecureString",
            Self::StringList => "StringList",
        }
    }

    /// Types selected when `--types` is not given.
    pub fn defaults() -> Vec<ParameterType> {
        vec![Self::String, Self::SecureString]
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown parameter type '{0}'. Expected one of: String, SecureString, StringList")]
pub struct UnknownParameterType(pub String);

impl FromStr for ParameterType {
    type Err = UnknownParameterType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownParameterType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMetadata {
    name: ParameterName,
    parameter_type: ParameterType,
}

impl ParameterMetadata {
    pub fn new(name: impl Into<ParameterName>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            parameter_type,
        }
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    pub fn into_name(self) -> ParameterName {
        self.name
    }
}

/// A resolved parameter. `value` is already decrypted for `SecureString`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    name: ParameterName,
    parameter_type: ParameterType,
    value: String,
}

impl ParameterValue {
    pub fn new(
        name: impl Into<ParameterName>,
        parameter_type: ParameterType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_round_trips_provider_spelling() {
        for t in ParameterType::ALL {
            assert_eq!(t.as_str().parse::<ParameterType>().unwrap(), t);
        }
    }

    #[test]
    fn test_parameter_type_is_case_sensitive() {
        let err = "securestring".parse::<ParameterType>().unwrap_err();
        assert_eq!(err, UnknownParameterType("securestring".to_string()));
        assert!(err.to_string().contains("securestring"));
    }

    #[test]
    fn test_default_types() {
        assert_eq!(
            ParameterType::defaults(),
            vec![ParameterType::String, ParameterType::SecureString]
        );
    }

    #[test]
    fn test_unknown_type_message() {
        let err = UnknownParameterType("Blob".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown parameter type 'Blob'. Expected one of: String, SecureString, StringList"
        );
    }

    #[test]
    fn test_names_convert_from_owned_and_borrowed_strings() {
        let owned: ParameterName = format!("/app/{}", "port").into();
        let borrowed: ParameterName = "/app/port".into();

        assert_eq!(owned, borrowed);

        let value = ParameterValue::new(
            format!("/app/db/{}", "host"),
            ParameterType::SecureString,
            "db.local",
        );
        assert_eq!(value.name().as_str(), "/app/db/host");
        assert_eq!(value.parameter_type(), ParameterType::SecureString);
        assert_eq!(value.value(), "db.local");
    }
}
