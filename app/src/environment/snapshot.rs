use std::collections::HashSet;
use std::env;

/// Names of the environment variables present when the process started.
///
/// Captured once and only read afterwards; the formatter uses it to detect
/// collisions with variables the caller's shell already defines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    names: HashSet<String>,
}

impl EnvironmentSnapshot {
    pub fn capture() -> Self {
        Self::from_names(env::vars_os().map(|(key, _)| key.to_string_lossy().into_owned()))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
