//! JSON-file backed product store.
//!
//! The data file holds a map of product id to product. It is loaded once at
//! startup into memory; stock mutations rewrite the whole file under the
//! write lock so the on-disk copy never interleaves with a concurrent
//! purchase.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::api::{ApiError, Product};
use crate::product_metrics;

#[derive(Debug)]
pub struct ProductRepository {
    file_path: PathBuf,
    products: RwLock<HashMap<String, Product>>,
}

impl ProductRepository {
    /// Load the catalog from `path`. A missing file starts an empty catalog
    /// (useful for fresh deployments); an unreadable or malformed file is a
    /// startup error.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let file_path = path.as_ref().to_path_buf();
        let products = match tokio::fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, Product>>(&bytes)
                .map_err(|err| {
                    ApiError::Inventory(format!(
                        "failed to parse product data file '{}': {err}",
                        file_path.display()
                    ))
                })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    file_path = %file_path.display(),
                    "product data file does not exist, starting with an empty catalog"
                );
                HashMap::new()
            }
            Err(err) => {
                return Err(ApiError::Inventory(format!(
                    "failed to read product data file '{}': {err}",
                    file_path.display()
                )))
            }
        };
        debug!(
            file_path = %file_path.display(),
            count = products.len(),
            "loaded product catalog"
        );
        Ok(Self {
            file_path,
            products: RwLock::new(products),
        })
    }

    /// All products, ordered by product id for stable responses.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Product> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        all
    }

    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Product, ApiError> {
        let products = self.products.read().await;
        products
            .values()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_by_category(&self, category: &str) -> Vec<Product> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        matching
    }

    /// Replace a product's stock level and persist the catalog.
    #[instrument(skip(self))]
    pub async fn update_stock(&self, name: &str, stock: u32) -> Result<(), ApiError> {
        let mut products = self.products.write().await;
        let product = products
            .values_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ApiError::NotFound(name.to_string()))?;
        product.stock = stock;
        Self::persist(&self.file_path, &products).await
    }

    /// Purchase `quantity` units: checks availability, decrements stock and
    /// persists, all under the write lock so concurrent purchases cannot
    /// oversell. Returns the remaining stock.
    #[instrument(skip(self))]
    pub async fn buy(&self, name: &str, quantity: u32) -> Result<u32, ApiError> {
        let mut products = self.products.write().await;
        let product = products
            .values_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ApiError::NotFound(name.to_string()))?;
        if product.stock < quantity {
            return Err(ApiError::InsufficientStock {
                name: name.to_string(),
                available: product.stock,
                requested: quantity,
            });
        }
        product.stock -= quantity;
        let remaining = product.stock;
        let sold = product.clone();
        Self::persist(&self.file_path, &products).await?;
        product_metrics::record_sale(&sold, quantity);
        debug!(product = %name, quantity, remaining, "purchase recorded");
        Ok(remaining)
    }

    async fn persist(
        file_path: &Path,
        products: &HashMap<String, Product>,
    ) -> Result<(), ApiError> {
        let bytes = serde_json::to_vec_pretty(products).map_err(|err| {
            ApiError::Inventory(format!("failed to serialize product data: {err}"))
        })?;
        tokio::fs::write(file_path, bytes).await.map_err(|err| {
            ApiError::Inventory(format!(
                "failed to write product data file '{}': {err}",
                file_path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "product-repository-test-{}-{}.json",
            std::process::id(),
            FILE_SEQ.fetch_add(1, Ordering::SeqCst)
        ))
    }

    fn sample_product(id: &str, name: &str, stock: u32) -> Product {
        Product {
            product_id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: 10.0,
            stock,
            category: "tools".to_string(),
            tags: vec![],
        }
    }

    async fn seeded_repository(products: &[Product]) -> (ProductRepository, PathBuf) {
        let path = temp_path();
        let map: HashMap<String, Product> = products
            .iter()
            .map(|p| (p.product_id.clone(), p.clone()))
            .collect();
        tokio::fs::write(&path, serde_json::to_vec_pretty(&map).unwrap())
            .await
            .unwrap();
        let repo = ProductRepository::load(&path).await.unwrap();
        (repo, path)
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let repo = ProductRepository::load(temp_path()).await.unwrap();
        assert!(repo.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_a_startup_error() {
        let path = temp_path();
        tokio::fs::write(&path, b"not json").await.unwrap();
        let err = ProductRepository::load(&path).await.unwrap_err();
        assert_eq!(err.code(), "INVENTORY_ACCESS_ERROR");
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn lookups_by_name_and_category() {
        let (repo, path) = seeded_repository(&[
            sample_product("P001", "Hammer", 5),
            sample_product("P002", "Screwdriver", 3),
        ])
        .await;

        let hammer = repo.get_by_name("Hammer").await.unwrap();
        assert_eq!(hammer.product_id, "P001");

        let err = repo.get_by_name("Drill").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("Drill".to_string()));

        let tools = repo.get_by_category("tools").await;
        assert_eq!(tools.len(), 2);
        assert!(repo.get_by_category("garden").await.is_empty());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn buy_decrements_stock_and_persists() {
        let (repo, path) = seeded_repository(&[sample_product("P001", "Hammer", 5)]).await;

        let remaining = repo.buy("Hammer", 2).await.unwrap();
        assert_eq!(remaining, 3);

        // Reload from disk to prove the mutation was persisted.
        let reloaded = ProductRepository::load(&path).await.unwrap();
        assert_eq!(reloaded.get_by_name("Hammer").await.unwrap().stock, 3);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn buy_rejects_insufficient_stock_without_mutating() {
        let (repo, path) = seeded_repository(&[sample_product("P001", "Hammer", 1)]).await;

        let err = repo.buy("Hammer", 2).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::InsufficientStock {
                name: "Hammer".to_string(),
                available: 1,
                requested: 2,
            }
        );
        assert_eq!(repo.get_by_name("Hammer").await.unwrap().stock, 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn update_stock_replaces_level() {
        let (repo, path) = seeded_repository(&[sample_product("P001", "Hammer", 1)]).await;

        repo.update_stock("Hammer", 40).await.unwrap();
        assert_eq!(repo.get_by_name("Hammer").await.unwrap().stock, 40);

        let reloaded = ProductRepository::load(&path).await.unwrap();
        assert_eq!(reloaded.get_by_name("Hammer").await.unwrap().stock, 40);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
