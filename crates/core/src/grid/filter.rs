//! Attribute-based variation filtering.

use std::collections::BTreeMap;

use crate::types::Variation;

/// Attribute name to desired value. Empty values impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    constraints: BTreeMap<String, String>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style constraint.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.constraints.insert(name.to_owned(), value.to_owned());
    }

    /// The requested value for an attribute, if any (possibly empty).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.constraints.get(name).map(String::as_str)
    }

    /// Whether no constraint would reject anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Constraints with a non-empty value, ordered by attribute name.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Whether `variation` satisfies every non-empty constraint.
    ///
    /// A variation without a value for a constrained attribute never matches,
    /// nor does one whose value is empty ("any").
    #[must_use]
    pub fn matches(&self, variation: &Variation) -> bool {
        self.active()
            .all(|(name, wanted)| variation.attribute(name) == Some(wanted))
    }
}

/// Keep the variations matching `criteria`, preserving their order.
#[must_use]
pub fn filter(variations: Vec<Variation>, criteria: &FilterCriteria) -> Vec<Variation> {
    if criteria.is_empty() {
        return variations;
    }
    variations
        .into_iter()
        .filter(|v| criteria.matches(v))
        .collect()
}
