use std::collections::BTreeMap;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{Asset, Category};

#[derive(Clone, Debug, Default, Deserialize, Getters, new, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    categories: Vec<Category>,
    assets_by_category: BTreeMap<String, Vec<Asset>>,
}

impl PortfolioSnapshot {
    pub fn assets_for(&self, category_id: &str) -> &[Asset] {
        self.assets_by_category
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id() == category_id)
    }
}
