use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use itertools::Itertools;

use crate::{
    association::Association,
    database::models::{
        auth_token::AuthToken,
        ingredient::Ingredient,
        recipe::{Recipe, RecipeSummary},
        recipe_ingredient::{CartIngredient, RecipeIngredient},
        user::{AuthorSummary, User},
    },
};

use super::data_loader::{DataLoader, LoaderError};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tokens: BTreeMap<String, AuthToken>,
    recipes: BTreeMap<i32, Recipe>,
    ingredients: BTreeMap<i32, Ingredient>,
    recipe_ingredients: Vec<RecipeIngredient>,
    shopping_carts: BTreeSet<(i32, i32)>,
    favorites: BTreeSet<(i32, i32)>,
    follows: BTreeSet<(i32, i32)>,
}

/// Test double mirroring the relational schema in plain collections.
#[derive(Default)]
pub struct MemoryLoader {
    tables: Mutex<Tables>,
    cart_loads: AtomicUsize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: i32, username: &str) -> Self {
        let user = User::new(
            id,
            format!("{username}@example.com"),
            username.to_owned(),
            String::new(),
            String::new(),
        );
        self.tables.lock().unwrap().users.insert(id, user);
        self
    }

    pub fn with_token(self, token: &str, user_id: i32) -> Self {
        self.tables
            .lock()
            .unwrap()
            .tokens
            .insert(token.to_owned(), AuthToken::new(token.to_owned(), user_id));
        self
    }

    pub fn with_recipe(self, id: i32, author_id: i32, name: &str) -> Self {
        let recipe = Recipe::new(id, author_id, name.to_owned(), String::new(), 10, None);
        self.tables.lock().unwrap().recipes.insert(id, recipe);
        self
    }

    pub fn with_ingredient(self, id: i32, name: &str, measurement_unit: &str) -> Self {
        let ingredient = Ingredient::new(id, name.to_owned(), measurement_unit.to_owned());
        self.tables.lock().unwrap().ingredients.insert(id, ingredient);
        self
    }

    pub fn with_recipe_ingredient(self, recipe_id: i32, ingredient_id: i32, amount: i32) -> Self {
        {
            let mut tables = self.tables.lock().unwrap();
            let id = tables.recipe_ingredients.len() as i32 + 1;
            tables
                .recipe_ingredients
                .push(RecipeIngredient::new(id, recipe_id, ingredient_id, amount));
        }
        self
    }

    pub fn with_follow(self, user_id: i32, author_id: i32) -> Self {
        self.tables.lock().unwrap().follows.insert((user_id, author_id));
        self
    }

    pub fn with_cart_entry(self, user_id: i32, recipe_id: i32) -> Self {
        self.tables
            .lock()
            .unwrap()
            .shopping_carts
            .insert((user_id, recipe_id));
        self
    }

    /// How many times the cart contents were read.
    pub fn cart_loads(&self) -> usize {
        self.cart_loads.load(Ordering::SeqCst)
    }

    pub fn has_association(&self, user_id: i32, association: Association) -> bool {
        let tables = self.tables.lock().unwrap();
        match association {
            Association::Favorite(recipe_id) => tables.favorites.contains(&(user_id, recipe_id)),
            Association::ShoppingCart(recipe_id) => {
                tables.shopping_carts.contains(&(user_id, recipe_id))
            }
            Association::Subscription(author_id) => tables.follows.contains(&(user_id, author_id)),
        }
    }
}

impl Tables {
    fn set_for(&mut self, association: Association) -> (&mut BTreeSet<(i32, i32)>, i32) {
        match association {
            Association::Favorite(recipe_id) => (&mut self.favorites, recipe_id),
            Association::ShoppingCart(recipe_id) => (&mut self.shopping_carts, recipe_id),
            Association::Subscription(author_id) => (&mut self.follows, author_id),
        }
    }

    // Newest first, like the recipes listing of an author
    fn recipes_of(&self, author_id: i32) -> Vec<RecipeSummary> {
        self.recipes
            .values()
            .rev()
            .filter(|recipe| recipe.author_id == author_id)
            .cloned()
            .map(RecipeSummary::from)
            .collect()
    }
}

impl DataLoader for MemoryLoader {
    fn authenticate(&self, token: &str) -> Result<Option<i32>, LoaderError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tokens.get(token).map(|token| token.user_id))
    }

    fn load_cart_ingredients(&self, user_id: i32) -> Result<Vec<CartIngredient>, LoaderError> {
        self.cart_loads.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.lock().unwrap();
        let rows = tables
            .recipe_ingredients
            .iter()
            .filter(|row| tables.shopping_carts.contains(&(user_id, row.recipe_id)))
            .filter_map(|row| {
                tables.ingredients.get(&row.ingredient_id).map(|ingredient| {
                    CartIngredient::new(
                        ingredient.name.clone(),
                        ingredient.measurement_unit.clone(),
                        row.amount,
                    )
                })
            })
            .collect();

        Ok(rows)
    }

    fn load_recipe(&self, recipe_id: i32) -> Result<Option<RecipeSummary>, LoaderError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.recipes.get(&recipe_id).cloned().map(RecipeSummary::from))
    }

    fn load_author(
        &self,
        viewer_id: i32,
        author_id: i32,
    ) -> Result<Option<AuthorSummary>, LoaderError> {
        let tables = self.tables.lock().unwrap();
        let Some(author) = tables.users.get(&author_id).cloned() else {
            return Ok(None);
        };

        let is_subscribed = tables.follows.contains(&(viewer_id, author_id));
        let recipes = tables.recipes_of(author_id);

        Ok(Some(AuthorSummary::from_parts(author, is_subscribed, recipes)))
    }

    fn load_subscriptions(
        &self,
        viewer_id: i32,
        limit: i64,
        offset: i64,
        recipes_limit: Option<usize>,
    ) -> Result<(i64, Vec<AuthorSummary>), LoaderError> {
        let tables = self.tables.lock().unwrap();

        // Follows are ordered by (user, author), so authors come out ascending
        let followed = tables
            .follows
            .iter()
            .filter(|(user_id, _)| *user_id == viewer_id)
            .filter_map(|(_, author_id)| tables.users.get(author_id))
            .collect_vec();

        let authors = followed
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|&author| {
                let recipes = tables.recipes_of(author.id);
                AuthorSummary::from_parts(author.clone(), true, recipes)
                    .with_recipes_limit(recipes_limit)
            })
            .collect();

        Ok((followed.len() as i64, authors))
    }

    fn insert_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError> {
        let mut tables = self.tables.lock().unwrap();
        let (set, target_id) = tables.set_for(association);
        Ok(set.insert((user_id, target_id)))
    }

    fn delete_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError> {
        let mut tables = self.tables.lock().unwrap();
        let (set, target_id) = tables.set_for(association);
        Ok(set.remove(&(user_id, target_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_user(1, "reader")
            .with_user(2, "baker")
            .with_user(3, "grill")
            .with_user(4, "vegan")
            .with_recipe(10, 2, "Rye bread")
            .with_recipe(11, 2, "Brioche")
            .with_recipe(12, 2, "Bagels")
            .with_recipe(13, 4, "Hummus")
            .with_follow(1, 4)
            .with_follow(1, 2)
            .with_follow(3, 2)
    }

    #[test]
    fn subscriptions_are_ordered_by_author() {
        let (count, authors) = loader().load_subscriptions(1, 10, 0, None).unwrap();

        assert_eq!(count, 2);
        assert_eq!(authors.iter().map(|author| author.id).collect_vec(), vec![2, 4]);
        assert!(authors.iter().all(|author| author.is_subscribed));
    }

    #[test]
    fn subscriptions_are_paged() {
        let (count, authors) = loader().load_subscriptions(1, 1, 1, None).unwrap();

        assert_eq!(count, 2);
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].username, "vegan");
    }

    #[test]
    fn recipes_limit_keeps_newest_and_full_count() {
        let (_, authors) = loader().load_subscriptions(1, 10, 0, Some(2)).unwrap();

        let baker = &authors[0];
        assert_eq!(
            baker.recipes.iter().map(|recipe| recipe.id).collect_vec(),
            vec![12, 11]
        );
        assert_eq!(baker.recipes_count, 3);
    }

    #[test]
    fn nobody_followed() {
        let (count, authors) = loader().load_subscriptions(2, 10, 0, None).unwrap();

        assert_eq!(count, 0);
        assert!(authors.is_empty());
    }

    #[test]
    fn tokens_resolve_to_their_owner() {
        let loader = loader().with_token("abc", 3);

        assert_eq!(loader.authenticate("abc").unwrap(), Some(3));
        assert_eq!(loader.authenticate("abd").unwrap(), None);
    }
}
