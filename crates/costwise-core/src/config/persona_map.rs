//! Persona → category lookup table.
//!
//! Each rule names a category and, optionally, the persona dimension whose
//! value selects the sub-categories and weight to use. Adding a category or a
//! variant is a configuration change; no caller branches on persona values.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::defaults::DEFAULT_SUB_CATEGORY_WEIGHT;
use crate::errors::ConfigError;
use crate::models::{Category, PersonaDimension};

/// A sub-category to include, with its weight inside the category.
///
/// Deserializes from either `"name"` or `{ name = "...", weight = 0.5 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SubCategorySpec")]
pub struct SubCategoryFilter {
    pub name: String,
    pub weight: f64,
}

impl SubCategoryFilter {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubCategorySpec {
    Name(String),
    Weighted {
        name: String,
        #[serde(default = "default_sub_weight")]
        weight: f64,
    },
}

fn default_sub_weight() -> f64 {
    DEFAULT_SUB_CATEGORY_WEIGHT
}

impl From<SubCategorySpec> for SubCategoryFilter {
    fn from(spec: SubCategorySpec) -> Self {
        match spec {
            SubCategorySpec::Name(name) => Self::new(name, DEFAULT_SUB_CATEGORY_WEIGHT),
            SubCategorySpec::Weighted { name, weight } => Self::new(name, weight),
        }
    }
}

/// Sub-categories (and optional weight override) for one dimension value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVariant {
    pub sub_categories: Vec<SubCategoryFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// One category row of the lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    /// Weight of this category in the overall confidence.
    pub weight: f64,
    /// Persona dimension selecting a variant. `None` applies to every persona.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyed_by: Option<PersonaDimension>,
    /// Used when `keyed_by` is `None`. Empty matches every sub-category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_categories: Vec<SubCategoryFilter>,
    /// Keyed by dimension value (`"1br"`, `"premium"`, `"car"`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, CategoryVariant>,
}

impl CategoryRule {
    /// Variant for a dimension value, ignoring ASCII case in the table key.
    pub fn variant(&self, key: &str) -> Option<&CategoryVariant> {
        self.variants
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

/// The full ordered lookup table. Rule order is output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaCategoryMap {
    pub categories: Vec<CategoryRule>,
}

impl PersonaCategoryMap {
    /// Every category the table knows about, in table order.
    pub fn known_categories(&self) -> Vec<Category> {
        self.categories.iter().map(|r| r.category.clone()).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(invalid("persona_category_map", "must declare at least one category"));
        }
        let mut seen = HashSet::new();
        for rule in &self.categories {
            let name = rule.category.as_str();
            if name.is_empty() {
                return Err(invalid("persona_category_map", "category names must be non-empty"));
            }
            if !seen.insert(name) {
                return Err(invalid(name, "category declared more than once"));
            }
            check_weight(name, rule.weight)?;
            check_sub_categories(name, &rule.sub_categories)?;

            match rule.keyed_by {
                None if !rule.variants.is_empty() => {
                    return Err(invalid(name, "variants require keyed_by"));
                }
                Some(_) if rule.variants.is_empty() => {
                    return Err(invalid(name, "keyed_by requires at least one variant"));
                }
                Some(_) if !rule.sub_categories.is_empty() => {
                    return Err(invalid(name, "keyed rules take sub-categories from variants"));
                }
                _ => {}
            }

            if let Some(dimension) = rule.keyed_by {
                for (key, variant) in &rule.variants {
                    if !dimension.accepts(key) {
                        return Err(invalid(
                            name,
                            &format!("{key:?} is not a valid {dimension} value"),
                        ));
                    }
                    if let Some(w) = variant.weight {
                        check_weight(name, w)?;
                    }
                    check_sub_categories(name, &variant.sub_categories)?;
                }
            }
        }
        Ok(())
    }
}

fn check_weight(field: &str, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("weight {weight} must be finite and non-negative")))
    }
}

fn check_sub_categories(field: &str, subs: &[SubCategoryFilter]) -> Result<(), ConfigError> {
    for sub in subs {
        if sub.name.trim().is_empty() {
            return Err(invalid(field, "sub-category names must be non-empty"));
        }
        if !(sub.weight.is_finite() && sub.weight > 0.0) {
            return Err(invalid(
                field,
                &format!("sub-category {} weight must be positive", sub.name),
            ));
        }
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl Default for PersonaCategoryMap {
    fn default() -> Self {
        use PersonaDimension::{Housing, Lifestyle, Transport};

        Self {
            categories: vec![
                keyed(
                    "housing",
                    0.40,
                    Housing,
                    &[
                        ("studio", None, &[("studio_rent", 1.0)]),
                        ("1br", None, &[("1br_rent", 1.0)]),
                        ("2br", None, &[("2br_rent", 1.0)]),
                        ("3br", None, &[("3br_rent", 1.0)]),
                        ("villa", None, &[("villa_rent", 1.0)]),
                    ],
                ),
                keyed(
                    "utilities",
                    0.10,
                    Housing,
                    &[
                        ("studio", None, &[("utilities_small_apartment", 1.0), ("internet", 0.5)]),
                        ("1br", None, &[("utilities_small_apartment", 1.0), ("internet", 0.5)]),
                        ("2br", None, &[("utilities_large_apartment", 1.0), ("internet", 0.5)]),
                        ("3br", None, &[("utilities_large_apartment", 1.0), ("internet", 0.5)]),
                        ("villa", None, &[("utilities_villa", 1.0), ("internet", 0.3)]),
                    ],
                ),
                keyed(
                    "groceries",
                    0.15,
                    Lifestyle,
                    &[
                        ("budget", None, &[("groceries_basic", 1.0)]),
                        ("standard", None, &[("groceries_basic", 1.0), ("groceries_mid", 1.0)]),
                        ("premium", None, &[("groceries_mid", 0.5), ("groceries_premium", 1.0)]),
                    ],
                ),
                keyed(
                    "dining",
                    0.08,
                    Lifestyle,
                    &[
                        ("budget", Some(0.05), &[("casual_dining", 1.0)]),
                        ("standard", None, &[("casual_dining", 1.0), ("mid_range_dining", 1.0)]),
                        ("premium", Some(0.12), &[("mid_range_dining", 0.5), ("fine_dining", 1.0)]),
                    ],
                ),
                keyed(
                    "entertainment",
                    0.05,
                    Lifestyle,
                    &[
                        ("budget", Some(0.03), &[("cinema", 1.0)]),
                        ("standard", None, &[("cinema", 1.0), ("gym_membership", 1.0)]),
                        ("premium", Some(0.08), &[("gym_membership", 1.0), ("leisure_premium", 1.0)]),
                    ],
                ),
                keyed(
                    "transport",
                    0.15,
                    Transport,
                    &[
                        ("public", None, &[("metro_pass", 1.0), ("bus_pass", 1.0)]),
                        ("car", None, &[("fuel", 1.0), ("parking", 1.0)]),
                        ("rideshare", None, &[("rideshare_fare", 1.0)]),
                    ],
                ),
            ],
        }
    }
}

type VariantRow<'a> = (&'a str, Option<f64>, &'a [(&'a str, f64)]);

fn keyed(
    category: &str,
    weight: f64,
    dimension: PersonaDimension,
    rows: &[VariantRow<'_>],
) -> CategoryRule {
    let variants = rows
        .iter()
        .map(|(key, weight, subs)| {
            let variant = CategoryVariant {
                sub_categories: subs
                    .iter()
                    .map(|(name, w)| SubCategoryFilter::new(*name, *w))
                    .collect(),
                weight: *weight,
            };
            (key.to_string(), variant)
        })
        .collect();

    CategoryRule {
        category: Category::new(category),
        weight,
        keyed_by: Some(dimension),
        sub_categories: Vec::new(),
        variants,
    }
}
