use std::fmt;

use crate::{domain::ParameterType, error::SsmEnvError};

/// Splits comma separated flag values into trimmed, non-empty items.
///
/// Flags may be repeated, so the input is every occurrence of the flag.
pub fn split_csv<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .map(|item| item.trim_matches(' '))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    key: String,
    values: Vec<String>,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Parses `KEY=VALUE`. `KEY=` matches any parameter carrying the tag.
    pub fn parse(tag: &str) -> Result<Self, SsmEnvError> {
        let mut parts = tag.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SsmEnvError::configuration(format!(
                "Invalid tag format: {tag}"
            )));
        };

        if key.is_empty() {
            return Err(SsmEnvError::configuration(format!(
                "Invalid tag format: {tag}"
            )));
        }

        let values = if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        };

        Ok(Self::new(key, values))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn absorb(&mut self, other: TagFilter) {
        for value in other.values {
            if !self.values.contains(&value) {
                self.values.push(value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterFilter {
    Names(Vec<String>),
    Paths { paths: Vec<String>, recursive: bool },
    Tag(TagFilter),
}

/// Which user-facing selection a query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Names,
    Paths,
    Tags,
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names => write!(f, "names"),
            Self::Paths => write!(f, "paths"),
            Self::Tags => write!(f, "tags"),
        }
    }
}

/// One describe query: the dimension filters plus the type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    dimension: FilterDimension,
    filters: Vec<ParameterFilter>,
    types: Vec<ParameterType>,
}

impl FilterSpec {
    pub fn new(
        dimension: FilterDimension,
        filters: Vec<ParameterFilter>,
        types: Vec<ParameterType>,
    ) -> Self {
        Self {
            dimension,
            filters,
            types,
        }
    }

    pub fn dimension(&self) -> FilterDimension {
        self.dimension
    }

    pub fn filters(&self) -> &[ParameterFilter] {
        &self.filters
    }

    pub fn types(&self) -> &[ParameterType] {
        &self.types
    }
}

#[derive(Debug, Clone)]
pub struct FilterBuilder {
    names: Vec<String>,
    paths: Vec<String>,
    tags: Vec<String>,
    types: Vec<String>,
    recursive: bool,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            paths: Vec::new(),
            tags: Vec::new(),
            types: Vec::new(),
            recursive: true,
        }
    }

    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.names.extend(split_csv(names));
        self
    }

    pub fn paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        self.paths.extend(split_csv(paths));
        self
    }

    pub fn tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags.extend(split_csv(tags));
        self
    }

    /// Empty means the default `String,SecureString`.
    pub fn types<S: AsRef<str>>(mut self, types: &[S]) -> Self {
        self.types.extend(split_csv(types));
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// One spec per supplied dimension, in the order names, paths, tags.
    /// No dimension at all gives an empty list.
    pub fn build(&self) -> Result<Vec<FilterSpec>, SsmEnvError> {
        let types = self.parse_types()?;
        let tags = self.parse_tags()?;
        let mut specs = Vec::with_capacity(3);

        if !self.names.is_empty() {
            specs.push(FilterSpec::new(
                FilterDimension::Names,
                vec![ParameterFilter::Names(self.names.clone())],
                types.clone(),
            ));
        }

        if !self.paths.is_empty() {
            specs.push(FilterSpec::new(
                FilterDimension::Paths,
                vec![ParameterFilter::Paths {
                    paths: self.paths.clone(),
                    recursive: self.recursive,
                }],
                types.clone(),
            ));
        }

        if !tags.is_empty() {
            specs.push(FilterSpec::new(
                FilterDimension::Tags,
                tags.into_iter().map(ParameterFilter::Tag).collect(),
                types,
            ));
        }

        Ok(specs)
    }

    fn parse_types(&self) -> Result<Vec<ParameterType>, SsmEnvError> {
        if self.types.is_empty() {
            return Ok(ParameterType::defaults());
        }

        let mut types = Vec::with_capacity(self.types.len());
        for raw in &self.types {
            let parsed = raw
                .parse::<ParameterType>()
                .map_err(|e| SsmEnvError::configuration(e.to_string()))?;
            if !types.contains(&parsed) {
                types.push(parsed);
            }
        }
        Ok(types)
    }

    fn parse_tags(&self) -> Result<Vec<TagFilter>, SsmEnvError> {
        let mut merged: Vec<TagFilter> = Vec::new();
        for raw in &self.tags {
            let tag = TagFilter::parse(raw)?;
            match merged.iter_mut().find(|existing| existing.key == tag.key) {
                Some(existing) => existing.absorb(tag),
                None => merged.push(tag),
            }
        }
        Ok(merged)
    }
}
