use std::sync::Arc;

use crate::{data_loader::data_loader::DataLoader, shopping_list::renderer::ShoppingListRenderer};

#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<dyn DataLoader>,
    pub renderer: Arc<ShoppingListRenderer>,
}

impl AppState {
    pub fn new(loader: Arc<dyn DataLoader>, renderer: ShoppingListRenderer) -> Self {
        Self {
            loader,
            renderer: Arc::new(renderer),
        }
    }
}
