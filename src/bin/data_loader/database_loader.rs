use diesel::{
    r2d2::{ConnectionManager, PooledConnection},
    PgConnection,
};
use itertools::Itertools;
use lombok::AllArgsConstructor;
use tracing::{trace, trace_span};

use crate::{
    association::Association,
    database::{
        connection::DbPool,
        models::{
            auth_token::AuthToken,
            favorite::Favorite,
            follow::Follow,
            recipe::{Recipe, RecipeSummary},
            recipe_ingredient::CartIngredient,
            shopping_cart::ShoppingCart,
            user::{AuthorSummary, User},
        },
    },
};

use super::data_loader::{DataLoader, LoaderError};

#[derive(AllArgsConstructor)]
pub struct DatabaseLoader {
    pool: DbPool,
}

impl DatabaseLoader {
    fn connection(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, LoaderError> {
        Ok(self.pool.get()?)
    }
}

impl DataLoader for DatabaseLoader {
    fn authenticate(&self, token: &str) -> Result<Option<i32>, LoaderError> {
        use crate::database::schema::auth_tokens;
        use diesel::prelude::*;

        let mut connection = self.connection()?;

        let token = auth_tokens::table
            .find(token)
            .select(AuthToken::as_select())
            .first(&mut connection)
            .optional()?;

        Ok(token.map(|token| token.user_id))
    }

    fn load_cart_ingredients(&self, user_id: i32) -> Result<Vec<CartIngredient>, LoaderError> {
        use crate::database::schema::{ingredients, recipe_ingredients, shopping_carts};
        use diesel::prelude::*;

        let span = trace_span!("load_cart_ingredients", user_id);
        let _guard = span.enter();

        let mut connection = self.connection()?;

        let rows = recipe_ingredients::table
            .inner_join(ingredients::table)
            .inner_join(
                shopping_carts::table.on(shopping_carts::recipe_id.eq(recipe_ingredients::recipe_id)),
            )
            .filter(shopping_carts::user_id.eq(user_id))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load::<CartIngredient>(&mut connection)?;

        trace!("Loaded {} cart ingredient rows", rows.len());

        Ok(rows)
    }

    fn load_recipe(&self, recipe_id: i32) -> Result<Option<RecipeSummary>, LoaderError> {
        use crate::database::schema::recipes;
        use diesel::prelude::*;

        let mut connection = self.connection()?;

        let recipe = recipes::table
            .find(recipe_id)
            .select(Recipe::as_select())
            .first(&mut connection)
            .optional()?;

        Ok(recipe.map(RecipeSummary::from))
    }

    fn load_author(
        &self,
        viewer_id: i32,
        author_id: i32,
    ) -> Result<Option<AuthorSummary>, LoaderError> {
        use crate::database::schema::{follows, recipes, users};
        use diesel::dsl::exists;
        use diesel::prelude::*;

        let mut connection = self.connection()?;

        let Some(author) = users::table
            .find(author_id)
            .select(User::as_select())
            .first(&mut connection)
            .optional()?
        else {
            return Ok(None);
        };

        let is_subscribed =
            diesel::select(exists(follows::table.find((viewer_id, author_id))))
                .get_result::<bool>(&mut connection)?;

        let recipes = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .order(recipes::id.desc())
            .select(Recipe::as_select())
            .load(&mut connection)?
            .into_iter()
            .map(RecipeSummary::from)
            .collect();

        Ok(Some(AuthorSummary::from_parts(author, is_subscribed, recipes)))
    }

    fn load_subscriptions(
        &self,
        viewer_id: i32,
        limit: i64,
        offset: i64,
        recipes_limit: Option<usize>,
    ) -> Result<(i64, Vec<AuthorSummary>), LoaderError> {
        use crate::database::schema::{follows, recipes, users};
        use diesel::prelude::*;

        let span = trace_span!("load_subscriptions", viewer_id, limit, offset);
        let _guard = span.enter();

        let mut connection = self.connection()?;

        let count = follows::table
            .filter(follows::user_id.eq(viewer_id))
            .count()
            .get_result::<i64>(&mut connection)?;

        let authors = follows::table
            .inner_join(users::table.on(users::id.eq(follows::author_id)))
            .filter(follows::user_id.eq(viewer_id))
            .order(users::id.asc())
            .limit(limit)
            .offset(offset)
            .select(User::as_select())
            .load::<User>(&mut connection)?;

        let author_ids = authors.iter().map(|author| author.id).collect_vec();
        let mut recipes_by_author = recipes::table
            .filter(recipes::author_id.eq_any(author_ids))
            .order(recipes::id.desc())
            .select(Recipe::as_select())
            .load::<Recipe>(&mut connection)?
            .into_iter()
            .into_group_map_by(|recipe| recipe.author_id);

        trace!("Loaded {} of {count} followed authors", authors.len());

        let authors = authors
            .into_iter()
            .map(|author| {
                let recipes = recipes_by_author
                    .remove(&author.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(RecipeSummary::from)
                    .collect();
                AuthorSummary::from_parts(author, true, recipes).with_recipes_limit(recipes_limit)
            })
            .collect();

        Ok((count, authors))
    }

    fn insert_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError> {
        use crate::database::schema::{favorites, follows, shopping_carts};
        use diesel::{insert_into, prelude::*};

        let mut connection = self.connection()?;

        // The composite primary keys turn a duplicate into a no-op
        let inserted = match association {
            Association::Favorite(recipe_id) => insert_into(favorites::table)
                .values(Favorite::new(user_id, recipe_id))
                .on_conflict_do_nothing()
                .execute(&mut connection)?,
            Association::ShoppingCart(recipe_id) => insert_into(shopping_carts::table)
                .values(ShoppingCart::new(user_id, recipe_id))
                .on_conflict_do_nothing()
                .execute(&mut connection)?,
            Association::Subscription(author_id) => insert_into(follows::table)
                .values(Follow::new(user_id, author_id))
                .on_conflict_do_nothing()
                .execute(&mut connection)?,
        };

        Ok(inserted > 0)
    }

    fn delete_association(
        &self,
        user_id: i32,
        association: Association,
    ) -> Result<bool, LoaderError> {
        use crate::database::schema::{favorites, follows, shopping_carts};
        use diesel::{delete, prelude::*};

        let mut connection = self.connection()?;

        let deleted = match association {
            Association::Favorite(recipe_id) => {
                delete(favorites::table.find((user_id, recipe_id))).execute(&mut connection)?
            }
            Association::ShoppingCart(recipe_id) => {
                delete(shopping_carts::table.find((user_id, recipe_id))).execute(&mut connection)?
            }
            Association::Subscription(author_id) => {
                delete(follows::table.find((user_id, author_id))).execute(&mut connection)?
            }
        };

        Ok(deleted > 0)
    }
}
