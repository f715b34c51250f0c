use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    domain::ParameterValue,
    environment::{EnvironmentSnapshot, env_var_name},
    error::SsmEnvError,
};

/// What to do when a derived variable name is already set in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    #[default]
    Allow,
    Hide,
    Fail,
}

impl CollisionPolicy {
    /// `fail_exists` wins when both flags are set.
    pub fn from_flags(hide_exists: bool, fail_exists: bool) -> Self {
        match (hide_exists, fail_exists) {
            (_, true) => Self::Fail,
            (true, false) => Self::Hide,
            (false, false) => Self::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix every line with `export `.
    pub export: bool,
    pub collision: CollisionPolicy,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            export: true,
            collision: CollisionPolicy::Allow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// A line copied verbatim from a multi-value parameter.
    Raw(String),
    Assignment { name: String, value: String },
}

impl OutputLine {
    /// Values are placed inside double quotes as they are. Quotes, `$` and
    /// newlines in the value are not escaped.
    pub fn render(&self, export: bool) -> String {
        let prefix = if export { "export " } else { "" };
        match self {
            Self::Raw(line) => format!("{prefix}{line}"),
            Self::Assignment { name, value } => format!(r#"{prefix}{name}="{value}""#),
        }
    }
}

/// Turns resolved parameters into shell lines.
///
/// Parameters named in `multi_values` contribute their non-blank lines as
/// they are. Every other parameter becomes one assignment, keyed by
/// [`env_var_name`]; when two parameters map to the same variable the later
/// one wins. Raw lines come first, ordered by the position of their parameter
/// in `multi_values`, then the assignments sorted by name.
pub struct OutputFormatter<'a> {
    snapshot: &'a EnvironmentSnapshot,
    multi_values: Vec<String>,
    options: FormatOptions,
}

impl<'a> OutputFormatter<'a> {
    pub fn new(
        snapshot: &'a EnvironmentSnapshot,
        multi_values: Vec<String>,
        options: FormatOptions,
    ) -> Self {
        Self {
            snapshot,
            multi_values,
            options,
        }
    }

    pub fn format(&self, values: &[ParameterValue]) -> Result<Vec<OutputLine>, SsmEnvError> {
        let mut raw_groups: Vec<Vec<String>> = vec![Vec::new(); self.multi_values.len()];
        let mut scalars: BTreeMap<String, String> = BTreeMap::new();

        for parameter in values {
            let name = parameter.name().as_str();

            if let Some(position) = self.multi_values.iter().position(|m| m == name) {
                raw_groups[position].extend(
                    parameter
                        .value()
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(str::to_string),
                );
                continue;
            }

            let env_name = env_var_name(name);
            if env_name.is_empty() {
                warn!(parameter = name, "Parameter name yields no variable name, skipping");
                continue;
            }

            if self.snapshot.contains(&env_name) {
                match self.options.collision {
                    CollisionPolicy::Fail => {
                        return Err(SsmEnvError::Collision { name: env_name });
                    }
                    CollisionPolicy::Hide => {
                        debug!(variable = env_name.as_str(), "Variable already set, hiding");
                        continue;
                    }
                    CollisionPolicy::Allow => {}
                }
            }

            if scalars
                .insert(env_name.clone(), parameter.value().to_string())
                .is_some()
            {
                debug!(
                    variable = env_name.as_str(),
                    parameter = name,
                    "Variable produced by several parameters, keeping the last one"
                );
            }
        }

        let mut lines: Vec<OutputLine> = raw_groups
            .into_iter()
            .flatten()
            .map(OutputLine::Raw)
            .collect();
        lines.extend(
            scalars
                .into_iter()
                .map(|(name, value)| OutputLine::Assignment { name, value }),
        );

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterType;

    fn value(name: &str, value: &str) -> ParameterValue {
        ParameterValue::new(name, ParameterType::String, value)
    }

    fn run(
        snapshot: &EnvironmentSnapshot,
        multi_values: &[&str],
        options: FormatOptions,
        values: &[ParameterValue],
    ) -> Result<Vec<String>, SsmEnvError> {
        let formatter = OutputFormatter::new(
            snapshot,
            multi_values.iter().map(|m| m.to_string()).collect(),
            options,
        );
        let lines = formatter.format(values)?;
        Ok(lines.iter().map(|line| line.render(options.export)).collect())
    }

    #[test]
    fn test_collision_policy_from_flags() {
        assert_eq!(CollisionPolicy::from_flags(false, false), CollisionPolicy::Allow);
        assert_eq!(CollisionPolicy::from_flags(true, false), CollisionPolicy::Hide);
        assert_eq!(CollisionPolicy::from_flags(false, true), CollisionPolicy::Fail);
        assert_eq!(CollisionPolicy::from_flags(true, true), CollisionPolicy::Fail);
    }

    #[test]
    fn test_scalars_are_sorted() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &[],
            FormatOptions::default(),
            &[value("/app/B", "2"), value("/app/a", "1")],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export A="1""#, r#"export B="2""#]);
    }

    #[test]
    fn test_without_export() {
        let options = FormatOptions {
            export: false,
            ..Default::default()
        };
        let output = run(
            &EnvironmentSnapshot::empty(),
            &["/app/list"],
            options,
            &[value("/app/a", "1"), value("/app/list", "X=1")],
        )
        .unwrap();

        assert_eq!(output, vec!["X=1", r#"A="1""#]);
    }

    #[test]
    fn test_hide_existing_variables() {
        let options = FormatOptions {
            collision: CollisionPolicy::Hide,
            ..Default::default()
        };
        let output = run(
            &EnvironmentSnapshot::from_names(["A"]),
            &[],
            options,
            &[value("A", "1"), value("B", "2")],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export B="2""#]);
    }

    #[test]
    fn test_allow_overwrites_existing_variables() {
        let output = run(
            &EnvironmentSnapshot::from_names(["A"]),
            &[],
            FormatOptions::default(),
            &[value("A", "1")],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export A="1""#]);
    }

    #[test]
    fn test_fail_on_existing_variable() {
        let options = FormatOptions {
            collision: CollisionPolicy::Fail,
            ..Default::default()
        };
        let result = run(
            &EnvironmentSnapshot::from_names(["A"]),
            &[],
            options,
            &[value("B", "2"), value("/x/a", "1")],
        );

        match result {
            Err(SsmEnvError::Collision { name }) => assert_eq!(name, "A"),
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_values_come_first_in_selector_order() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &["SECOND", "LIST"],
            FormatOptions::default(),
            &[
                value("A", "1"),
                value("LIST", "x\ny\n\nz\n"),
                value("SECOND", "FOO=bar\r\nBAZ=qux"),
            ],
        )
        .unwrap();

        assert_eq!(
            output,
            vec![
                "export FOO=bar",
                "export BAZ=qux",
                "export x",
                "export y",
                "export z",
                r#"export A="1""#,
            ]
        );
    }

    #[test]
    fn test_blank_multi_value_lines_are_dropped() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &["LIST"],
            FormatOptions::default(),
            &[value("LIST", "FOO=1\n   \n\t\r\n  BAR=2")],
        )
        .unwrap();

        assert_eq!(output, vec!["export FOO=1", "export   BAR=2"]);
    }

    #[test]
    fn test_multi_values_skip_collision_checks() {
        let options = FormatOptions {
            collision: CollisionPolicy::Fail,
            ..Default::default()
        };
        let output = run(
            &EnvironmentSnapshot::from_names(["LIST"]),
            &["LIST"],
            options,
            &[value("LIST", "x")],
        )
        .unwrap();

        assert_eq!(output, vec!["export x"]);
    }

    #[test]
    fn test_last_parameter_wins_for_same_variable() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &[],
            FormatOptions::default(),
            &[value("/a/port", "1"), value("/b/db.port", "2")],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export PORT="2""#]);
    }

    #[test]
    fn test_values_are_not_escaped() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &[],
            FormatOptions::default(),
            &[value("/a/msg", r#"say "hi""#)],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export MSG="say "hi"""#]);
    }

    #[test]
    fn test_separator_only_names_are_skipped() {
        let output = run(
            &EnvironmentSnapshot::empty(),
            &[],
            FormatOptions::default(),
            &[value("/", "x"), value("/a", "1")],
        )
        .unwrap();

        assert_eq!(output, vec![r#"export A="1""#]);
    }
}
