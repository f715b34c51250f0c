use std::env;

/// Unset and empty variables are both treated as absent.
pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|value| !value.is_empty())
}

/// First of `env_names` that is set.
pub fn first_env(env_names: &[&str]) -> Option<String> {
    env_names.iter().find_map(|name| optional_env(name))
}
