//! Products and their attribute definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ProductId, VariationId};

/// Product type tag. Only [`ProductType::Variable`] products have variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Simple,
    Variable,
    Grouped,
    External,
}

impl ProductType {
    /// The lowercase tag stored in the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Variable => "variable",
            Self::Grouped => "grouped",
            Self::External => "external",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown product type tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product type: {0}")]
pub struct UnknownProductType(pub String);

impl FromStr for ProductType {
    type Err = UnknownProductType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "variable" => Ok(Self::Variable),
            "grouped" => Ok(Self::Grouped),
            "external" => Ok(Self::External),
            other => Err(UnknownProductType(other.to_owned())),
        }
    }
}

/// Where an attribute's selectable values come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Taxonomy-backed: values are the attribute's global term list.
    Enumerated,
    /// Values are an inline option list attached to the product.
    Freeform { options: Vec<String> },
}

/// An axis of variation declared on a product (e.g. color, size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Stable identifier, also used as the filter query key.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    pub kind: AttributeKind,
}

impl Attribute {
    /// Create a taxonomy-backed attribute.
    #[must_use]
    pub fn enumerated(name: &str, label: &str) -> Self {
        Self {
            name: name.to_owned(),
            label: label.to_owned(),
            kind: AttributeKind::Enumerated,
        }
    }

    /// Create an attribute with an inline option list.
    #[must_use]
    pub fn freeform<I, S>(name: &str, label: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_owned(),
            label: label.to_owned(),
            kind: AttributeKind::Freeform {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    #[must_use]
    pub const fn is_enumerated(&self) -> bool {
        matches!(self.kind, AttributeKind::Enumerated)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub product_type: ProductType,
    /// Attribute definitions in declaration order.
    pub attributes: Vec<Attribute>,
    /// Child variation IDs in menu order.
    pub children: Vec<VariationId>,
}

impl Product {
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.product_type == ProductType::Variable
    }

    /// Whether the variation table can manage this product: it must be a
    /// variable product with at least one variation.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.is_variable() && !self.children.is_empty()
    }

    /// Look up an attribute definition by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
