//! Variant dimensions and the shopper's choices among them.

use crate::ids::{VariantOptionId, VariantTypeId};
use serde::{Deserialize, Serialize};

/// A variant dimension, e.g. "Size" or "Color".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantType {
    pub id: VariantTypeId,
    pub name: String,
}

impl VariantType {
    pub fn new(id: impl Into<VariantTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One admin-defined value of a variant dimension, e.g. "Large".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantOption {
    pub id: VariantOptionId,
    pub name: String,
    pub variant_type: VariantType,
}

impl VariantOption {
    pub fn new(
        id: impl Into<VariantOptionId>,
        name: impl Into<String>,
        variant_type: VariantType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variant_type,
        }
    }
}

/// The options of one variant type available for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGroup {
    pub variant_type: VariantType,
    pub options: Vec<VariantOption>,
}

impl VariantGroup {
    /// Whether `option_id` is one of this group's options.
    pub fn contains(&self, option_id: &VariantOptionId) -> bool {
        self.options.iter().any(|o| &o.id == option_id)
    }
}

/// A chosen option, carried on a cart line.
///
/// Names are denormalized so the cart can render labels without the
/// catalog at hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantSelection {
    pub type_id: VariantTypeId,
    pub type_name: String,
    pub option_id: VariantOptionId,
    pub option_name: String,
}

impl VariantSelection {
    /// Selection of `option`.
    pub fn of(option: &VariantOption) -> Self {
        Self {
            type_id: option.variant_type.id.clone(),
            type_name: option.variant_type.name.clone(),
            option_id: option.id.clone(),
            option_name: option.name.clone(),
        }
    }

    /// "Type: Value" label, e.g. "Size: Large".
    pub fn label(&self) -> String {
        format!("{}: {}", self.type_name, self.option_name)
    }

    /// Join selections into "Size: Large, Color: Red". Empty input gives an
    /// empty string.
    pub fn join_labels(selections: &[VariantSelection]) -> String {
        selections
            .iter()
            .map(VariantSelection::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
