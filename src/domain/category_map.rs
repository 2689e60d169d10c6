// ============================================================
// Layer 3 — CategoryMap
// ============================================================
// COCO's native category ids run 1..=90 with gaps, which makes
// them useless as column indices of a label matrix. CategoryMap
// re-numbers categories 0..n in the order the `categories` list
// of the instances file gives them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub category_id: BTreeMap<String, usize>,
    pub id_category: BTreeMap<usize, String>,
}

impl CategoryMap {
    /// Assign ids by enumeration order. A repeated name keeps its
    /// first id so the mapping stays a bijection.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::default();
        for name in names {
            let name = name.into();
            if map.category_id.contains_key(&name) {
                continue;
            }
            let id = map.category_id.len();
            map.id_category.insert(id, name.clone());
            map.category_id.insert(name, id);
        }
        map
    }

    pub fn len(&self) -> usize {
        self.category_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.category_id.get(name).copied()
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.id_category.get(&id).map(String::as_str)
    }

    /// Multi-hot vector over all categories for the given names.
    /// Unknown names are ignored.
    pub fn multi_hot<S: AsRef<str>>(&self, names: &[S]) -> Vec<f32> {
        let mut row = vec![0.0f32; self.len()];
        for name in names {
            if let Some(id) = self.id(name.as_ref()) {
                row[id] = 1.0;
            }
        }
        row
    }
}
