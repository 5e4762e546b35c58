//! Store browsing: listing, free-text search, and the product pipeline.

use tilbud_client::FavoritesRegistry;
use tilbud_core::filter::{self, FilterOptions, RangeBounds, SortKey, parse_bound};
use tilbud_core::search::{self, PRODUCT_SEARCH_PATHS, STORE_SEARCH_PATHS};
use tilbud_core::types::{Product, Store, StoreId};

use super::{CliError, Context};

/// Structured criteria for `stores show`, straight from the flags.
#[derive(Debug, Default)]
pub struct ShowCriteria {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_discount: Option<String>,
    pub max_discount: Option<String>,
    pub in_stock: bool,
    pub sort: Option<String>,
}

impl ShowCriteria {
    /// Lower the raw flags into pipeline options.
    ///
    /// All numeric parsing funnels through [`parse_bound`], so malformed
    /// values degrade to "unset" instead of failing the command.
    fn to_options(&self) -> FilterOptions {
        FilterOptions {
            categories: self.categories.iter().cloned().collect(),
            price_range: range_from(self.min_price.as_deref(), self.max_price.as_deref()),
            discount_range: range_from(self.min_discount.as_deref(), self.max_discount.as_deref()),
            stock_only: self.in_stock,
        }
    }

    /// Parse the sort flag; an unrecognized key leaves the order unchanged.
    fn sort_key(&self) -> Option<SortKey> {
        let raw = self.sort.as_deref()?;
        match raw.parse() {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!(%e, "Ignoring sort flag");
                None
            }
        }
    }
}

fn range_from(min: Option<&str>, max: Option<&str>) -> Option<RangeBounds> {
    let bounds = RangeBounds::new(
        min.and_then(parse_bound),
        max.and_then(parse_bound),
    );
    (!bounds.is_unbounded()).then_some(bounds)
}

/// List stores, optionally narrowed server-side by postal code and
/// client-side by free text. Favorite stores are starred when signed in.
pub async fn list(postal_code: Option<&str>, query: Option<&str>) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    let mut stores = match postal_code {
        Some(code) => ctx.gateway.stores_by_postal_code(code).await?,
        None => ctx.gateway.stores().await?,
    };

    let mut registry = FavoritesRegistry::new(ctx.gateway.clone());
    if ctx.session.is_authenticated() {
        registry.load(&ctx.session).await?;
    }
    registry.decorate(&mut stores);

    let visible = search::search(&stores, query.unwrap_or(""), STORE_SEARCH_PATHS);
    if visible.is_empty() {
        println!("Ingen butikker fundet.");
        return Ok(());
    }

    for store in visible {
        print_store_line(store);
    }
    Ok(())
}

/// Show one store's discounted products through the full pipeline:
/// free-text search first, then the structured filters and sort.
pub async fn show(id: &str, criteria: &ShowCriteria) -> Result<(), CliError> {
    let ctx = Context::from_env()?;
    let store = ctx.gateway.store(&StoreId::new(id)).await?;

    println!(
        "{} ({}) - {}, {} {}",
        store.name,
        store.brand.display_name,
        store.address.address_line,
        store.address.postal_code.postal_code,
        store.address.postal_code.city,
    );

    let narrowed: Vec<Product> = search::search(
        &store.products,
        criteria.query.as_deref().unwrap_or(""),
        PRODUCT_SEARCH_PATHS,
    )
    .into_iter()
    .cloned()
    .collect();

    let products = filter::apply(&narrowed, &criteria.to_options(), criteria.sort_key());
    if products.is_empty() {
        println!("Ingen nedsatte varer matcher.");
        return Ok(());
    }

    for product in products {
        print_product_line(product);
    }
    Ok(())
}

fn print_store_line(store: &Store) {
    let marker = if store.is_favorite { "★" } else { " " };
    println!(
        "{marker} {}  {} - {}, {} {} ({} varer)",
        store.id,
        store.name,
        store.brand.display_name,
        store.address.postal_code.postal_code,
        store.address.postal_code.city,
        store.products.len(),
    );
}

fn print_product_line(product: &Product) {
    println!(
        "  {:>7.2} kr  (-{:.0}%)  {}  [{} stk]",
        product.price.new_price,
        product.price.percent_discount,
        product.product_name,
        product.stock.quantity,
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_range_from_flags() {
        assert_eq!(range_from(None, None), None);
        assert_eq!(
            range_from(Some("5"), None),
            Some(RangeBounds::new(Some(5.0), None))
        );
        // Malformed bounds degrade to unset rather than erroring.
        assert_eq!(range_from(Some("abc"), Some("NaN")), None);
    }

    #[test]
    fn test_unknown_sort_flag_is_ignored() {
        let criteria = ShowCriteria {
            sort: Some("alphabetical".to_owned()),
            ..ShowCriteria::default()
        };
        assert_eq!(criteria.sort_key(), None);

        let criteria = ShowCriteria {
            sort: Some("discount-desc".to_owned()),
            ..ShowCriteria::default()
        };
        assert_eq!(criteria.sort_key(), Some(SortKey::DiscountDesc));
    }

    #[test]
    fn test_criteria_lowering() {
        let criteria = ShowCriteria {
            categories: vec!["Mejeri".to_owned()],
            min_price: Some("10".to_owned()),
            max_price: Some("20".to_owned()),
            in_stock: true,
            ..ShowCriteria::default()
        };
        let options = criteria.to_options();
        assert!(options.categories.contains("Mejeri"));
        assert_eq!(options.price_range, Some(RangeBounds::new(Some(10.0), Some(20.0))));
        assert_eq!(options.discount_range, None);
        assert!(options.stock_only);
    }
}
