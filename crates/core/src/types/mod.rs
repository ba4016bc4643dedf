//! Catalog types.
//!
//! Type-safe wrappers and records for products, their attributes and their
//! variations.

pub mod id;
pub mod price;
pub mod product;
pub mod variation;

pub use id::{ImageId, ParseIdError, ProductId, VariationId};
pub use price::{PriceError, parse_regular_price};
pub use product::{Attribute, AttributeKind, Product, ProductType, UnknownProductType};
pub use variation::Variation;
