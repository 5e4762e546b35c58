//! Favorite-store commands. All of these require a signed-in session.

use tilbud_client::FavoritesRegistry;
use tilbud_core::types::StoreId;

use super::{CliError, Context};

/// List the signed-in user's favorite stores.
pub async fn list() -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let token = ctx
        .session
        .bearer()
        .ok_or(tilbud_client::ClientError::NotAuthenticated)?;

    let stores = ctx.gateway.favorite_stores(token).await?;
    if stores.is_empty() {
        println!("Ingen favoritbutikker endnu.");
        return Ok(());
    }

    for store in &stores {
        println!(
            "★ {}  {} - {}, {} {}",
            store.id,
            store.name,
            store.brand.display_name,
            store.address.postal_code.postal_code,
            store.address.postal_code.city,
        );
    }
    Ok(())
}

/// Flip a store's favorite status and report the result.
pub async fn toggle(id: &str) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let mut registry = FavoritesRegistry::new(ctx.gateway.clone());

    // Load first so the toggle direction reflects backend state, not an
    // empty local set.
    registry.load(&ctx.session).await?;

    let id = StoreId::new(id);
    let now_favorite = registry.toggle(&ctx.session, &id).await?;
    if now_favorite {
        println!("Tilføjet til favoritter: {id}");
    } else {
        println!("Fjernet fra favoritter: {id}");
    }
    Ok(())
}
