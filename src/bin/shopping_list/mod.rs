pub mod ingredient_list;
pub mod renderer;

use tracing::trace;

use crate::data_loader::data_loader::{DataLoader, LoaderError};

use self::ingredient_list::IngredientList;

/// Sums the ingredients of every recipe in the user's cart.
///
/// The caller is responsible for authenticating `user_id`.
pub fn aggregate(loader: &dyn DataLoader, user_id: i32) -> Result<IngredientList, LoaderError> {
    let rows = loader.load_cart_ingredients(user_id)?;
    let list: IngredientList = rows.iter().collect();

    trace!(user_id, "Aggregated {} rows into {} lines", rows.len(), list.len());

    Ok(list)
}
