use crate::{
    api::ApiClient,
    error::ApiError,
    models::{Allergen, Consumable},
};

/// CatalogGateway
///
/// The consumables and allergens reference lists, readable by every role.
#[derive(Clone, Debug)]
pub struct CatalogGateway {
    api: ApiClient,
}

impl CatalogGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn consumables(&self) -> Result<Vec<Consumable>, ApiError> {
        self.api.get_json("/consommables").await
    }

    pub async fn allergens(&self) -> Result<Vec<Allergen>, ApiError> {
        self.api.get_json("/allergenes").await
    }
}
