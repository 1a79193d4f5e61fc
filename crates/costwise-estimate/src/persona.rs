//! Persona → categories, sub-category filters, and weights.
//!
//! All decisions come from the [`PersonaCategoryMap`] table.

use costwise_core::config::{PersonaCategoryMap, SubCategoryFilter};
use costwise_core::errors::CostwiseResult;
use costwise_core::{Category, PersonaInput};
use serde::Serialize;

/// What to aggregate for one category of a resolved persona.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPlan {
    pub category: Category,
    /// Empty means every sub-category of the category.
    pub sub_categories: Vec<SubCategoryFilter>,
    /// Weight of this category in the overall confidence.
    pub weight: f64,
}

impl CategoryPlan {
    pub fn sub_category_names(&self) -> Vec<String> {
        self.sub_categories.iter().map(|s| s.name.clone()).collect()
    }

    /// Weight of a sample from `sub_category`. Unfiltered plans weigh everything 1.0;
    /// a sub-category outside the filter weighs 0.
    pub fn sample_weight(&self, sub_category: &str) -> f64 {
        if self.sub_categories.is_empty() {
            return 1.0;
        }
        self.sub_categories
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(sub_category))
            .map_or(0.0, |s| s.weight)
    }
}

/// Ordered plans for one persona.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPersona {
    pub persona: PersonaInput,
    pub plans: Vec<CategoryPlan>,
}

impl ResolvedPersona {
    pub fn total_weight(&self) -> f64 {
        self.plans.iter().map(|p| p.weight).sum()
    }
}

/// Table-driven persona resolver.
#[derive(Debug, Clone)]
pub struct PersonaResolver {
    map: PersonaCategoryMap,
}

impl PersonaResolver {
    pub fn new(map: PersonaCategoryMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &PersonaCategoryMap {
        &self.map
    }

    /// Resolve a validated persona. Rules keyed by a dimension with no variant
    /// for this persona's value are not relevant and are skipped.
    pub fn resolve(&self, persona: &PersonaInput) -> ResolvedPersona {
        let plans = self
            .map
            .categories
            .iter()
            .filter_map(|rule| match rule.keyed_by {
                None => Some(CategoryPlan {
                    category: rule.category.clone(),
                    sub_categories: rule.sub_categories.clone(),
                    weight: rule.weight,
                }),
                Some(dimension) => rule.variant(persona.key_for(dimension)).map(|variant| {
                    CategoryPlan {
                        category: rule.category.clone(),
                        sub_categories: variant.sub_categories.clone(),
                        weight: variant.weight.unwrap_or(rule.weight),
                    }
                }),
            })
            .collect();

        ResolvedPersona {
            persona: *persona,
            plans,
        }
    }

    /// Parse raw persona fields, then resolve. Any unrecognized value fails
    /// with `InvalidPersona`; there is no partial result.
    pub fn resolve_raw(
        &self,
        housing: &str,
        lifestyle: &str,
        transport: &str,
    ) -> CostwiseResult<ResolvedPersona> {
        let persona = PersonaInput::parse(housing, lifestyle, transport)?;
        Ok(self.resolve(&persona))
    }
}

impl Default for PersonaResolver {
    fn default() -> Self {
        Self::new(PersonaCategoryMap::default())
    }
}
