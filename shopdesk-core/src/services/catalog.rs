//! Product catalog - cached, de-duplicated product and category fetching
//!
//! All product reads (the product list page, the categories page and the
//! global products hook) go through here. Results are cached per query in
//! `moka` (bounded, 5-minute TTL) and concurrent requests for the same query
//! share one network call. Any product mutation should call
//! [`ProductCatalog::invalidate`].

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthToken, Product};
use crate::ports::ShopApi;

/// Sentinel category meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Most product lists kept at once
const MAX_CACHED_QUERIES: u64 = 100;

/// How long a cached list is served before it is fetched again
pub const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Which product list to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductQuery {
    All,
    Search(String),
    Category(String),
}

impl ProductQuery {
    /// Resolve the list filters into one query
    ///
    /// A selected category other than [`ALL_CATEGORIES`] wins; a non-empty
    /// search applies only when no category is selected.
    pub fn from_filters(category: &str, search: &str) -> Self {
        if !category.is_empty() && category != ALL_CATEGORIES {
            Self::Category(category.to_string())
        } else if !search.is_empty() {
            Self::Search(search.to_string())
        } else {
            Self::All
        }
    }

    /// Page error shown when this query fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::All => "Failed to fetch products",
            Self::Search(_) => "Failed to search products",
            Self::Category(_) => "Failed to fetch products by category",
        }
    }
}

pub struct ProductCatalog {
    api: Arc<dyn ShopApi>,
    products: Cache<ProductQuery, Arc<Vec<Product>>>,
    categories: Cache<(), Arc<Vec<String>>>,
}

impl ProductCatalog {
    pub fn new(api: Arc<dyn ShopApi>) -> Self {
        Self::with_ttl(api, CATALOG_TTL)
    }

    pub fn with_ttl(api: Arc<dyn ShopApi>, ttl: Duration) -> Self {
        Self {
            api,
            products: Cache::builder()
                .max_capacity(MAX_CACHED_QUERIES)
                .time_to_live(ttl)
                .build(),
            categories: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Products for `query`, from cache or a single shared request
    ///
    /// Failures are not cached; the next call tries again.
    pub async fn products(
        &self,
        auth: Option<&AuthToken>,
        query: &ProductQuery,
    ) -> Result<Arc<Vec<Product>>> {
        self.products
            .try_get_with(query.clone(), async {
                let response = match query {
                    ProductQuery::All => self.api.list_products(auth, None).await?,
                    ProductQuery::Search(q) => self.api.list_products(auth, Some(q.as_str())).await?,
                    ProductQuery::Category(c) => self.api.products_by_category(auth, c).await?,
                };
                Ok::<_, Error>(Arc::new(response.products))
            })
            .await
            .map_err(Error::from_shared)
    }

    /// Category slugs, cached like products
    pub async fn categories(&self, auth: Option<&AuthToken>) -> Result<Arc<Vec<String>>> {
        self.categories
            .try_get_with((), async {
                let categories = self.api.list_categories(auth).await?;
                Ok::<_, Error>(Arc::new(categories))
            })
            .await
            .map_err(Error::from_shared)
    }

    /// Drop every cached result; in-flight requests still complete for
    /// their current waiters
    pub fn invalidate(&self) {
        self.products.invalidate_all();
        self.categories.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ApiCall, InMemoryShop};
    use crate::domain::NewProduct;

    #[test]
    fn test_category_wins_over_search() {
        assert_eq!(
            ProductQuery::from_filters("smartphones", "mascara"),
            ProductQuery::Category("smartphones".to_string())
        );
        assert_eq!(
            ProductQuery::from_filters(ALL_CATEGORIES, "mascara"),
            ProductQuery::Search("mascara".to_string())
        );
        assert_eq!(ProductQuery::from_filters(ALL_CATEGORIES, ""), ProductQuery::All);
        assert_eq!(ProductQuery::from_filters("", ""), ProductQuery::All);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_share_one_call() {
        let shop = Arc::new(InMemoryShop::seeded().with_latency(Duration::from_millis(200)));
        let catalog = ProductCatalog::new(Arc::clone(&shop) as Arc<dyn ShopApi>);

        let (a, b, c) = tokio::join!(
            catalog.products(None, &ProductQuery::All),
            catalog.products(None, &ProductQuery::All),
            catalog.products(None, &ProductQuery::All),
        );
        assert_eq!(a.unwrap().len(), 8);
        assert!(b.is_ok() && c.is_ok());
        assert_eq!(shop.calls(), vec![ApiCall::ListProducts]);
    }

    #[tokio::test]
    async fn test_distinct_queries_fetch_separately() {
        let shop = Arc::new(InMemoryShop::seeded());
        let catalog = ProductCatalog::new(Arc::clone(&shop) as Arc<dyn ShopApi>);

        catalog.products(None, &ProductQuery::All).await.unwrap();
        let beauty = catalog
            .products(None, &ProductQuery::Category("beauty".to_string()))
            .await
            .unwrap();
        assert!(beauty.iter().all(|p| p.category == "beauty"));
        catalog.products(None, &ProductQuery::All).await.unwrap();

        assert_eq!(
            shop.calls(),
            vec![
                ApiCall::ListProducts,
                ApiCall::ProductsByCategory("beauty".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let shop = Arc::new(InMemoryShop::seeded());
        let catalog = ProductCatalog::new(Arc::clone(&shop) as Arc<dyn ShopApi>);

        catalog.categories(None).await.unwrap();
        catalog.categories(None).await.unwrap();
        catalog.invalidate();
        catalog.categories(None).await.unwrap();

        assert_eq!(
            shop.calls(),
            vec![ApiCall::ListCategories, ApiCall::ListCategories]
        );
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let shop = Arc::new(InMemoryShop::seeded());
        let catalog = ProductCatalog::new(Arc::clone(&shop) as Arc<dyn ShopApi>);

        shop.fail_with(500, None);
        assert!(catalog.products(None, &ProductQuery::All).await.is_err());

        shop.clear_failure();
        assert!(catalog.products(None, &ProductQuery::All).await.is_ok());
        assert_eq!(shop.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_lists_are_fetched_again() {
        let shop = Arc::new(InMemoryShop::seeded());
        let catalog =
            ProductCatalog::with_ttl(Arc::clone(&shop) as Arc<dyn ShopApi>, Duration::from_millis(50));

        let before = catalog.products(None, &ProductQuery::All).await.unwrap();
        let lamp = NewProduct {
            title: "Desk Lamp".to_string(),
            description: String::new(),
            price: 24.0,
            category: "home-decoration".to_string(),
            brand: String::new(),
            stock: 3,
        };
        shop.create_product(None, &lamp).await.unwrap();
        assert_eq!(
            catalog.products(None, &ProductQuery::All).await.unwrap().len(),
            before.len()
        );

        tokio::time::sleep(Duration::from_millis(120)).await;
        let after = catalog.products(None, &ProductQuery::All).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let shop = Arc::new(InMemoryShop::seeded());
        let catalog = ProductCatalog::new(Arc::clone(&shop) as Arc<dyn ShopApi>);

        for i in 0..(MAX_CACHED_QUERIES * 3) {
            let query = ProductQuery::Search(format!("query-{}", i));
            catalog.products(None, &query).await.unwrap();
        }
        catalog.products.run_pending_tasks().await;

        assert!(catalog.products.entry_count() <= MAX_CACHED_QUERIES);
    }
}
