use serde::Serialize;
use tracing::info;

use crate::{
    data_loader::data_loader::DataLoader,
    database::models::{recipe::RecipeSummary, user::AuthorSummary},
    error::AppError,
};

/// A user-to-target link the user can switch on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    Favorite(i32),
    ShoppingCart(i32),
    Subscription(i32),
}

impl Association {
    fn already_exists_message(&self) -> &'static str {
        match self {
            Association::Favorite(_) => "Recipe is already in favorites",
            Association::ShoppingCart(_) => "Recipe is already in the shopping cart",
            Association::Subscription(_) => "Already subscribed to this author",
        }
    }
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Target {
    Recipe(RecipeSummary),
    Author(AuthorSummary),
}

fn load_target(
    loader: &dyn DataLoader,
    user_id: i32,
    association: Association,
) -> Result<Target, AppError> {
    match association {
        Association::Favorite(recipe_id) | Association::ShoppingCart(recipe_id) => loader
            .load_recipe(recipe_id)?
            .map(Target::Recipe)
            .ok_or(AppError::NotFound("recipe")),
        Association::Subscription(author_id) => loader
            .load_author(user_id, author_id)?
            .map(Target::Author)
            .ok_or(AppError::NotFound("author")),
    }
}

/// Creates the link and returns the target as the user now sees it.
pub fn add(
    loader: &dyn DataLoader,
    user_id: i32,
    association: Association,
) -> Result<Target, AppError> {
    load_target(loader, user_id, association)?;

    if association == Association::Subscription(user_id) {
        return Err(AppError::InvalidSubscription);
    }

    if !loader.insert_association(user_id, association)? {
        return Err(AppError::AlreadyExists(association.already_exists_message()));
    }

    info!(user_id, ?association, "Association added");

    // Reload so that author summaries reflect the new subscription
    load_target(loader, user_id, association)
}

/// Removes the link if present. Removing a missing link is not an error.
pub fn remove(
    loader: &dyn DataLoader,
    user_id: i32,
    association: Association,
) -> Result<(), AppError> {
    load_target(loader, user_id, association)?;

    if loader.delete_association(user_id, association)? {
        info!(user_id, ?association, "Association removed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::memory_loader::MemoryLoader;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_user(1, "cook")
            .with_user(2, "chef")
            .with_recipe(10, 2, "Pancakes")
            .with_recipe(11, 2, "Borscht")
    }

    #[test]
    fn add_favorite_returns_recipe_summary() {
        let loader = loader();

        let target = add(&loader, 1, Association::Favorite(10)).unwrap();

        match target {
            Target::Recipe(recipe) => {
                assert_eq!(recipe.id, 10);
                assert_eq!(recipe.name, "Pancakes");
            }
            other => panic!("unexpected target {other:?}"),
        }
        assert!(loader.has_association(1, Association::Favorite(10)));
    }

    #[test]
    fn adding_twice_is_rejected() {
        let loader = loader();

        add(&loader, 1, Association::ShoppingCart(10)).unwrap();
        let err = add(&loader, 1, Association::ShoppingCart(10)).unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[test]
    fn kinds_do_not_interfere() {
        let loader = loader();

        add(&loader, 1, Association::Favorite(10)).unwrap();
        add(&loader, 1, Association::ShoppingCart(10)).unwrap();

        remove(&loader, 1, Association::Favorite(10)).unwrap();

        assert!(!loader.has_association(1, Association::Favorite(10)));
        assert!(loader.has_association(1, Association::ShoppingCart(10)));
    }

    #[test]
    fn remove_then_add_again() {
        let loader = loader();

        add(&loader, 1, Association::ShoppingCart(11)).unwrap();
        remove(&loader, 1, Association::ShoppingCart(11)).unwrap();
        add(&loader, 1, Association::ShoppingCart(11)).unwrap();

        assert!(loader.has_association(1, Association::ShoppingCart(11)));
    }

    #[test]
    fn removing_missing_link_is_ok() {
        let loader = loader();

        remove(&loader, 1, Association::Favorite(11)).unwrap();
    }

    #[test]
    fn unknown_targets_are_not_found() {
        let loader = loader();

        assert!(matches!(
            add(&loader, 1, Association::Favorite(99)),
            Err(AppError::NotFound("recipe"))
        ));
        assert!(matches!(
            remove(&loader, 1, Association::Subscription(99)),
            Err(AppError::NotFound("author"))
        ));
    }

    #[test]
    fn cannot_subscribe_to_self() {
        let loader = loader();

        let err = add(&loader, 1, Association::Subscription(1)).unwrap_err();

        assert!(matches!(err, AppError::InvalidSubscription));
        assert!(!loader.has_association(1, Association::Subscription(1)));
    }

    #[test]
    fn subscription_reports_author_with_recipes() {
        let loader = loader();

        let target = add(&loader, 1, Association::Subscription(2)).unwrap();

        match target {
            Target::Author(author) => {
                assert!(author.is_subscribed);
                assert_eq!(author.recipes_count, 2);
                // newest first
                assert_eq!(author.recipes[0].id, 11);
            }
            other => panic!("unexpected target {other:?}"),
        }
    }
}
