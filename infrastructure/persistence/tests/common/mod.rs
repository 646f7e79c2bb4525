//! Behaviour every product storage adapter must share.
#![allow(dead_code)]

use std::sync::Arc;

use business::domain::errors::RepositoryError;
use business::domain::product::dto::{DeleteResult, ProductCreateDto, ProductVariantCreateDto};
use business::domain::product::model::{Product, ProductImage, ProductVariant};
use business::domain::product::repository::ProductUnitOfWork;
use business::domain::product::value_objects::{Season, Size};

pub fn variant_dto(
    price: f64,
    stock: i32,
    color: &str,
    size: Size,
    images: &[&str],
) -> ProductVariantCreateDto {
    ProductVariantCreateDto {
        price,
        stock,
        color: color.to_string(),
        size,
        base64_images: images.iter().map(|i| i.to_string()).collect(),
    }
}

pub fn jacket_dto() -> ProductCreateDto {
    ProductCreateDto {
        name: "Jacket".to_string(),
        description: None,
        season: Season::Winter,
        variants: vec![variant_dto(49.99, 10, "black", Size::M, &["base64A"])],
    }
}

pub fn two_variant_dto() -> ProductCreateDto {
    ProductCreateDto {
        name: "Sneaker".to_string(),
        description: Some("Canvas low-top".to_string()),
        season: Season::Summer,
        variants: vec![
            variant_dto(59.5, 3, "white", Size::L, &["w1", "w2"]),
            variant_dto(61.0, 8, "red", Size::Xl, &["r1"]),
        ],
    }
}

pub fn assert_price(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "price {actual} differs from {expected}"
    );
}

pub async fn create(store: &dyn ProductUnitOfWork, dto: ProductCreateDto) -> Product {
    let mut repository = store.begin().await.unwrap();
    let product = repository.create(dto).await.unwrap();
    repository.commit().await.unwrap();
    product
}

pub async fn find(store: &dyn ProductUnitOfWork, id: i64) -> Result<Product, RepositoryError> {
    let mut repository = store.begin().await.unwrap();
    let result = repository.find_by_id(id).await;
    repository.commit().await.unwrap();
    result
}

pub async fn find_all(store: &dyn ProductUnitOfWork) -> Vec<Product> {
    let mut repository = store.begin().await.unwrap();
    let products = repository.find_all().await.unwrap();
    repository.commit().await.unwrap();
    products
}

pub async fn update(
    store: &dyn ProductUnitOfWork,
    product: &Product,
) -> Result<Product, RepositoryError> {
    let mut repository = store.begin().await.unwrap();
    let updated = repository.update(product).await?;
    repository.commit().await.unwrap();
    Ok(updated)
}

pub async fn delete(store: &dyn ProductUnitOfWork, id: i64) -> DeleteResult {
    let mut repository = store.begin().await.unwrap();
    let result = repository.delete_by_id(id).await.unwrap();
    repository.commit().await.unwrap();
    result
}

pub async fn decrease(
    store: &dyn ProductUnitOfWork,
    variant_id: i64,
    quantity: i32,
) -> Result<Product, RepositoryError> {
    let mut repository = store.begin().await.unwrap();
    let product = repository.decrease_stock(variant_id, quantity).await?;
    repository.commit().await.unwrap();
    Ok(product)
}

pub async fn stock_of(store: &dyn ProductUnitOfWork, product_id: i64, variant_id: i64) -> i32 {
    find(store, product_id)
        .await
        .unwrap()
        .variant(variant_id)
        .map(|v| v.stock)
        .unwrap()
}

pub async fn created_product_matches_submission(store: &dyn ProductUnitOfWork) {
    let submitted = two_variant_dto();
    let created = create(store, submitted.clone()).await;

    assert!(created.id > 0);
    assert_eq!(created.name, submitted.name);
    assert_eq!(created.description, submitted.description);
    assert_eq!(created.season, submitted.season);
    assert_eq!(created.variants.len(), submitted.variants.len());
    for (variant, expected) in created.variants.iter().zip(&submitted.variants) {
        assert!(variant.id > 0);
        assert_price(variant.price, expected.price);
        assert_eq!(variant.stock, expected.stock);
        assert_eq!(variant.color, expected.color);
        assert_eq!(variant.size, expected.size);
        let images: Vec<&str> = variant
            .images
            .iter()
            .map(|i| i.base64_data.as_str())
            .collect();
        let expected_images: Vec<&str> = expected
            .base64_images
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(images, expected_images);
        assert!(variant.images.iter().all(|i| i.id > 0));
    }

    let found = find(store, created.id).await.unwrap();
    assert_eq!(found, created);
}

pub async fn missing_product_is_not_found(store: &dyn ProductUnitOfWork) {
    let result = find(store, 987_654).await;
    assert_eq!(result.unwrap_err(), RepositoryError::ProductNotFound(987_654));
}

pub async fn catalog_lists_every_product_in_id_order(store: &dyn ProductUnitOfWork) {
    let first = create(store, jacket_dto()).await;
    let second = create(store, two_variant_dto()).await;

    let products = find_all(store).await;

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(products[1].variants.len(), 2);
    assert_eq!(products[1].variants[0].images.len(), 2);
}

pub async fn uncommitted_create_is_rolled_back(store: &dyn ProductUnitOfWork) {
    let product_id = {
        let mut repository = store.begin().await.unwrap();
        let product = repository.create(two_variant_dto()).await.unwrap();
        product.id
    };

    assert_eq!(
        find(store, product_id).await.unwrap_err(),
        RepositoryError::ProductNotFound(product_id)
    );
    assert!(find_all(store).await.is_empty());
}

pub async fn update_overwrites_scalars_and_replaces_subtree(store: &dyn ProductUnitOfWork) {
    let created = create(store, two_variant_dto()).await;
    let kept = created.variants[0].clone();
    let dropped = created.variants[1].clone();

    let payload = Product {
        id: created.id,
        name: "Sneaker v2".to_string(),
        description: None,
        season: Season::Spring,
        variants: vec![
            ProductVariant {
                stock: 1,
                images: vec![kept.images[0].clone()],
                ..kept.clone()
            },
            ProductVariant {
                id: 0,
                price: 75.25,
                stock: 4,
                color: "green".to_string(),
                size: Size::Xs,
                images: vec![ProductImage {
                    id: 0,
                    base64_data: "g1".to_string(),
                }],
            },
        ],
    };

    let updated = update(store, &payload).await.unwrap();

    assert_eq!(updated.name, "Sneaker v2");
    assert_eq!(updated.description, None);
    assert_eq!(updated.season, Season::Spring);
    assert_eq!(updated.variants.len(), 2);
    assert_eq!(updated.variants[0].id, kept.id);
    assert_eq!(updated.variants[0].stock, 1);
    assert_eq!(updated.variants[0].images, vec![kept.images[0].clone()]);
    assert_ne!(updated.variants[1].id, dropped.id);
    assert!(updated.variants[1].id > 0);
    assert_price(updated.variants[1].price, 75.25);
    assert!(updated.variant(dropped.id).is_none());

    assert_eq!(find(store, created.id).await.unwrap(), updated);
    assert_eq!(
        decrease(store, dropped.id, 1).await.unwrap_err(),
        RepositoryError::VariantNotFound(dropped.id)
    );
}

pub async fn update_with_same_payload_is_idempotent(store: &dyn ProductUnitOfWork) {
    let created = create(store, two_variant_dto()).await;
    let mut payload = created.clone();
    payload.name = "Renamed".to_string();
    payload.variants[1].stock = 0;

    let first = update(store, &payload).await.unwrap();
    let second = update(store, &payload).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(find(store, created.id).await.unwrap(), second);
}

pub async fn update_ignores_ids_from_other_products(store: &dyn ProductUnitOfWork) {
    let mine = create(store, jacket_dto()).await;
    let other = create(store, two_variant_dto()).await;

    let mut payload = mine.clone();
    payload.variants = vec![ProductVariant {
        images: vec![],
        ..other.variants[0].clone()
    }];
    let updated = update(store, &payload).await.unwrap();

    assert_ne!(updated.variants[0].id, other.variants[0].id);
    assert_eq!(find(store, other.id).await.unwrap(), other);
}

pub async fn update_of_missing_product_is_not_found(store: &dyn ProductUnitOfWork) {
    let mut payload = create(store, jacket_dto()).await;
    payload.id = 555_555;

    assert_eq!(
        update(store, &payload).await.unwrap_err(),
        RepositoryError::ProductNotFound(555_555)
    );
}

pub async fn delete_reports_result_and_cascades(store: &dyn ProductUnitOfWork) {
    let created = create(store, two_variant_dto()).await;
    let variant_id = created.variants[0].id;

    let missing = delete(store, created.id + 1_000).await;
    assert_eq!(missing, DeleteResult::not_found());

    let deleted = delete(store, created.id).await;
    assert_eq!(deleted, DeleteResult::deleted());

    assert_eq!(
        find(store, created.id).await.unwrap_err(),
        RepositoryError::ProductNotFound(created.id)
    );
    assert_eq!(
        decrease(store, variant_id, 1).await.unwrap_err(),
        RepositoryError::VariantNotFound(variant_id)
    );
    assert_eq!(delete(store, created.id).await, DeleteResult::not_found());
}

pub async fn jacket_scenario(store: &dyn ProductUnitOfWork) {
    let created = create(store, jacket_dto()).await;
    assert!(created.id > 0);
    assert_eq!(created.variants.len(), 1);
    let variant_id = created.variants[0].id;
    assert!(variant_id > 0);
    assert_eq!(created.variants[0].stock, 10);

    let after = decrease(store, variant_id, 3).await.unwrap();
    assert_eq!(after.id, created.id);
    assert_eq!(after.variant(variant_id).map(|v| v.stock), Some(7));

    let refused = decrease(store, variant_id, 100).await.unwrap_err();
    assert_eq!(
        refused,
        RepositoryError::InsufficientStock {
            variant_id,
            available: 7,
            requested: 100
        }
    );
    assert_eq!(stock_of(store, created.id, variant_id).await, 7);
}

pub async fn decrease_of_missing_variant_is_not_found(store: &dyn ProductUnitOfWork) {
    assert_eq!(
        decrease(store, 424_242, 1).await.unwrap_err(),
        RepositoryError::VariantNotFound(424_242)
    );
}

pub async fn non_positive_quantity_is_refused(store: &dyn ProductUnitOfWork) {
    let created = create(store, jacket_dto()).await;
    let variant_id = created.variants[0].id;

    for quantity in [0, -5] {
        assert_eq!(
            decrease(store, variant_id, quantity).await.unwrap_err(),
            RepositoryError::InvalidQuantity {
                variant_id,
                quantity
            }
        );
    }
    assert_eq!(stock_of(store, created.id, variant_id).await, 10);
}

pub async fn price_beyond_column_precision_is_refused(store: &dyn ProductUnitOfWork) {
    let mut dto = jacket_dto();
    dto.variants[0].price = 1e12;

    let result = {
        let mut repository = store.begin().await.unwrap();
        repository.create(dto).await
    };

    assert_eq!(result.unwrap_err(), RepositoryError::DatabaseError);
    assert!(find_all(store).await.is_empty());

    let mut dto = jacket_dto();
    dto.variants[0].price = ProductVariant::MAX_PRICE;
    let created = create(store, dto).await;
    assert_price(created.variants[0].price, ProductVariant::MAX_PRICE);
}

pub async fn decrease_to_exactly_zero_is_allowed(store: &dyn ProductUnitOfWork) {
    let created = create(store, jacket_dto()).await;
    let variant_id = created.variants[0].id;

    let after = decrease(store, variant_id, 10).await.unwrap();

    assert_eq!(after.variant(variant_id).map(|v| v.stock), Some(0));
}

/// Spawns one task per quantity, all decrementing the same variant at once.
/// Returns how many succeeded, how many were refused, and the final stock.
pub async fn race_decrements(
    store: Arc<dyn ProductUnitOfWork>,
    initial_stock: i32,
    quantities: &[i32],
) -> (usize, usize, i32) {
    let mut dto = jacket_dto();
    dto.variants[0].stock = initial_stock;
    let created = create(store.as_ref(), dto).await;
    let variant_id = created.variants[0].id;

    let handles: Vec<_> = quantities
        .iter()
        .map(|&quantity| {
            let store = store.clone();
            tokio::spawn(async move { decrease(store.as_ref(), variant_id, quantity).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(RepositoryError::InsufficientStock { .. }) => refused += 1,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    let final_stock = stock_of(store.as_ref(), created.id, variant_id).await;
    (succeeded, refused, final_stock)
}

pub async fn concurrent_decrements_summing_to_stock_all_succeed(store: Arc<dyn ProductUnitOfWork>) {
    let (succeeded, refused, final_stock) = race_decrements(store, 12, &[1, 2, 3, 1, 2, 3]).await;

    assert_eq!(succeeded, 6);
    assert_eq!(refused, 0);
    assert_eq!(final_stock, 0);
}

pub async fn oversubscribed_decrements_stop_at_zero(store: Arc<dyn ProductUnitOfWork>) {
    let (succeeded, refused, final_stock) = race_decrements(store, 10, &[2; 8]).await;

    assert_eq!(succeeded, 5);
    assert_eq!(refused, 3);
    assert_eq!(final_stock, 0);
}
