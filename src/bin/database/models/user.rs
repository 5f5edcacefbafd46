use diesel::prelude::*;
use lombok::AllArgsConstructor;
use serde::Serialize;

use super::recipe::RecipeSummary;

#[derive(Queryable, Selectable, Identifiable, AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::database::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// An author as seen by a subscriber.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: usize,
}

impl AuthorSummary {
    pub fn from_parts(user: User, is_subscribed: bool, recipes: Vec<RecipeSummary>) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            recipes_count: recipes.len(),
            recipes,
        }
    }

    /// Keeps the first `limit` recipes. `recipes_count` still counts all of them.
    pub fn with_recipes_limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.recipes.truncate(limit);
        }
        self
    }
}
