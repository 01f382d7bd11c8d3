use serde::Serialize;

use super::{ScreenOutcome, View};
use crate::{
    gateways::Gateways,
    models::{Allergen, Consumable},
};

/// CatalogView
///
/// The consumables table and the allergen list, readable by every role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub consumables: Vec<Consumable>,
    pub allergens: Vec<Allergen>,
}

pub(crate) async fn catalog(gateways: &Gateways) -> ScreenOutcome {
    let loaded = tokio::try_join!(gateways.catalog.consumables(), gateways.catalog.allergens());

    match loaded {
        Ok((consumables, allergens)) => ScreenOutcome::Ready(View::Catalog(CatalogView {
            consumables,
            allergens,
        })),
        Err(e) => {
            tracing::error!("failed to load catalog: {}", e);
            ScreenOutcome::Failed("Impossible de récupérer les données.".to_string())
        }
    }
}
