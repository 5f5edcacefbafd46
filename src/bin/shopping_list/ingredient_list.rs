use std::{
    collections::BTreeMap,
    ops::Deref,
};

use itertools::Itertools;

use crate::database::models::recipe_ingredient::CartIngredient;

/// Aggregation key. Ordered by name first, then unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IngredientKey {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientKey {
    pub fn new(name: &str, measurement_unit: &str) -> Self {
        Self {
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        }
    }
}

/// Summed amounts per (name, unit).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IngredientList {
    inner: BTreeMap<IngredientKey, i64>,
}

impl IngredientList {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn add_amount(&mut self, key: IngredientKey, amount: i64) {
        self.inner
            .entry(key)
            .and_modify(|current_amount| {
                *current_amount += amount;
            })
            .or_insert(amount);
    }

    pub fn add_ingredient(&mut self, ingredient: &CartIngredient) {
        self.add_amount(
            IngredientKey::new(&ingredient.name, &ingredient.measurement_unit),
            ingredient.amount.into(),
        );
    }

    /// One display line per key, e.g. `flour - 500 g`.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .iter()
            .map(|(key, amount)| format!("{} - {} {}", key.name, amount, key.measurement_unit))
            .collect_vec()
    }
}

impl<'a> FromIterator<&'a CartIngredient> for IngredientList {
    fn from_iter<T: IntoIterator<Item = &'a CartIngredient>>(iter: T) -> Self {
        let mut list = IngredientList::new();
        iter.into_iter()
            .for_each(|ingredient| list.add_ingredient(ingredient));
        list
    }
}

impl Deref for IngredientList {
    type Target = BTreeMap<IngredientKey, i64>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for IngredientList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}
