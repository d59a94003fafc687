//! Filter criteria as entered by the user, and their wire form.

use std::fmt;
use std::str::FromStr;

/// A structured filter field (everything except free-text search).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Stage,
    MinValue,
    MaxValue,
    StartDate,
    EndDate,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Stage,
        FilterKey::MinValue,
        FilterKey::MaxValue,
        FilterKey::StartDate,
        FilterKey::EndDate,
    ];

    /// Query-string parameter name.
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterKey::Stage => "stage",
            FilterKey::MinValue => "minValue",
            FilterKey::MaxValue => "maxValue",
            FilterKey::StartDate => "startDate",
            FilterKey::EndDate => "endDate",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

impl FromStr for FilterKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .into_iter()
            .find(|key| key.param_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown filter '{s}'"))
    }
}

/// Raw search text and filter values, exactly as typed.
///
/// An empty (or whitespace-only) value means "not filtering on this field".
/// No parsing happens client-side; the server validates the values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub stage: String,
    pub min_value: String,
    pub max_value: String,
    pub start_date: String,
    pub end_date: String,
}

impl FilterCriteria {
    pub fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Stage => &self.stage,
            FilterKey::MinValue => &self.min_value,
            FilterKey::MaxValue => &self.max_value,
            FilterKey::StartDate => &self.start_date,
            FilterKey::EndDate => &self.end_date,
        }
    }

    pub fn set(&mut self, key: FilterKey, value: String) {
        let slot = match key {
            FilterKey::Stage => &mut self.stage,
            FilterKey::MinValue => &mut self.min_value,
            FilterKey::MaxValue => &mut self.max_value,
            FilterKey::StartDate => &mut self.start_date,
            FilterKey::EndDate => &mut self.end_date,
        };
        *slot = value;
    }

    /// True if the search text or any filter is non-empty.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || FilterKey::ALL
                .into_iter()
                .any(|key| !self.get(key).trim().is_empty())
    }
}

/// Flat, ordered query-string parameters for one deals request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    /// Normalizes criteria plus pagination into request parameters.
    ///
    /// Values are trimmed; blank values are omitted entirely. `page` and
    /// `limit` are always present.
    pub fn build(criteria: &FilterCriteria, page: u32, limit: u32) -> Self {
        let mut params = Vec::with_capacity(8);

        let fields = std::iter::once(("search", criteria.search.as_str())).chain(
            FilterKey::ALL
                .into_iter()
                .map(|key| (key.param_name(), criteria.get(key))),
        );

        for (name, value) in fields {
            let value = value.trim();
            if !value.is_empty() {
                params.push((name, value.to_string()));
            }
        }

        params.push(("page", page.to_string()));
        params.push(("limit", limit.to_string()));

        Self(params)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }
}
