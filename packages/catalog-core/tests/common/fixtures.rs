//! Test datasets

use catalog_core::{
    CatalogConfig, CatalogService, Category, InMemoryCatalogRepository, Product,
};

/// `Electronics(1) > Laptops(2)` with one product in each
pub fn electronics_laptops() -> (Vec<Category>, Vec<Product>) {
    (
        vec![
            Category::new("1", "Electronics"),
            Category::new("2", "Laptops").with_parent("1"),
        ],
        vec![
            Product::new("p1", "Product 1", 100.0, "1"),
            Product::new("p2", "Product 2", 200.0, "2"),
        ],
    )
}

/// Three-level hierarchy plus a separate root and an uncategorized bucket
///
/// ```text
/// Books(b)
/// Electronics(1)
///   Laptops(2)
///     Gaming(3)
///   Phones(4)
/// Uncategorized(u)
/// ```
pub fn storefront() -> (Vec<Category>, Vec<Product>) {
    (
        vec![
            Category::new("1", "Electronics"),
            Category::new("2", "Laptops").with_parent("1"),
            Category::new("3", "Gaming").with_parent("2"),
            Category::new("4", "Phones").with_parent("1"),
            Category::new("b", "Books"),
            Category::new("u", "Uncategorized"),
        ],
        vec![
            Product::new("p1", "Radio", 40.0, "1").with_stock(3),
            Product::new("p2", "Ultrabook", 1200.0, "2").with_stock(5),
            Product::new("p3", "Gaming Rig", 2500.0, "3").with_stock(1),
            Product::new("p4", "Handset", 600.0, "4").with_stock(10),
            Product::new("p5", "Novel", 15.0, "b").with_stock(40),
        ],
    )
}

pub fn repository(dataset: (Vec<Category>, Vec<Product>)) -> InMemoryCatalogRepository {
    InMemoryCatalogRepository::seeded(dataset.0, dataset.1)
}

/// Loaded service over an in-memory repository
pub async fn service_with(
    dataset: (Vec<Category>, Vec<Product>),
    config: CatalogConfig,
) -> CatalogService<InMemoryCatalogRepository> {
    CatalogService::connect(repository(dataset), config)
        .await
        .expect("in-memory refresh cannot fail")
}

pub fn product_ids(products: &[Product]) -> Vec<String> {
    products.iter().map(|p| p.id.clone()).collect()
}
