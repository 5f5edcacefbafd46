use diesel::r2d2::PoolError;
use thiserror::Error;

use crate::{
    association::Association,
    database::models::{recipe::RecipeSummary, recipe_ingredient::CartIngredient, user::AuthorSummary},
};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Everything the request handlers need from storage.
///
/// Calls are blocking; async callers go through `spawn_blocking`.
pub trait DataLoader: Send + Sync {
    /// Resolves an API token to the id of its owner.
    fn authenticate(&self, token: &str) -> Result<Option<i32>, LoaderError>;

    /// Ingredient rows of every recipe currently in the user's cart, unaggregated.
    fn load_cart_ingredients(&self, user_id: i32) -> Result<Vec<CartIngredient>, LoaderError>;

    fn load_recipe(&self, recipe_id: i32) -> Result<Option<RecipeSummary>, LoaderError>;

    /// `is_subscribed` is computed from `viewer_id`'s point of view.
    fn load_author(
        &self,
        viewer_id: i32,
        author_id: i32,
    ) -> Result<Option<AuthorSummary>, LoaderError>;

    /// One page of the authors `viewer_id` follows, ordered by author id,
    /// together with the total number of followed authors.
    fn load_subscriptions(
        &self,
        viewer_id: i32,
        limit: i64,
        offset: i64,
        recipes_limit: Option<usize>,
    ) -> Result<(i64, Vec<AuthorSummary>), LoaderError>;

    /// Returns `false` when the association was already there.
    fn insert_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError>;

    /// Returns `false` when there was nothing to delete.
    fn delete_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError>;
}
