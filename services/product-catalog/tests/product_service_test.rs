//! 基于内存存储的商品服务测试

use catalog_auth_core::AuthUser;
use catalog_common::UserId;
use product_catalog::application::{CreateProductCommand, ProductService, UpdateProductCommand};
use product_catalog::domain::{ProductId, UnitOfWorkFactory};
use product_catalog::error::ProductError;
use product_catalog::infrastructure::persistence::InMemoryUnitOfWorkFactory;
use rust_decimal::Decimal;

fn alice() -> AuthUser {
    AuthUser {
        id: UserId::new(),
        username: "alice".to_string(),
    }
}

fn widget() -> CreateProductCommand {
    CreateProductCommand {
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: Decimal::new(999, 2),
        stock: 5,
    }
}

async fn seed(factory: &InMemoryUnitOfWorkFactory, service: &ProductService) -> ProductId {
    let uow = factory.begin().await.unwrap();
    let id = service.create(uow.as_ref(), widget(), &alice()).await.unwrap();
    uow.commit().await.unwrap();
    id
}

#[tokio::test]
async fn test_created_product_round_trips() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let id = seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    let product = service.get_by_id(uow.as_ref(), id).await.unwrap();

    assert_eq!(product.id, id);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.description, "A widget");
    assert_eq!(product.price, Decimal::new(999, 2));
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn test_duplicate_create_leaves_store_unchanged() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    let err = service
        .create(uow.as_ref(), widget(), &alice())
        .await
        .unwrap_err();
    assert!(matches!(err, ProductError::AlreadyExists { .. }));
    drop(uow);

    let uow = factory.begin().await.unwrap();
    assert_eq!(service.list_all(uow.as_ref()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_id_is_not_found_everywhere() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let uow = factory.begin().await.unwrap();
    let missing = ProductId(404);

    assert!(matches!(
        service.get_by_id(uow.as_ref(), missing).await,
        Err(ProductError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_by_id(uow.as_ref(), missing).await,
        Err(ProductError::NotFound { .. })
    ));
    assert!(matches!(
        service
            .update(uow.as_ref(), missing, UpdateProductCommand::default())
            .await,
        Err(ProductError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_update_only_changes_stock() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let id = seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    let cmd = UpdateProductCommand {
        stock: Some(12),
        ..Default::default()
    };
    service.update(uow.as_ref(), id, cmd).await.unwrap();
    uow.commit().await.unwrap();

    let uow = factory.begin().await.unwrap();
    let product = service.get_by_id(uow.as_ref(), id).await.unwrap();
    assert_eq!(product.stock, 12);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.description, "A widget");
    assert_eq!(product.price, Decimal::new(999, 2));
}

#[tokio::test]
async fn test_renaming_to_own_name_is_allowed() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let id = seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    let cmd = UpdateProductCommand {
        name: Some("Widget".to_string()),
        price: Some(Decimal::new(1250, 2)),
        ..Default::default()
    };
    service.update(uow.as_ref(), id, cmd).await.unwrap();
    uow.commit().await.unwrap();

    let uow = factory.begin().await.unwrap();
    let product = service.get_by_id(uow.as_ref(), id).await.unwrap();
    assert_eq!(product.price, Decimal::new(1250, 2));
}

#[tokio::test]
async fn test_uncommitted_delete_is_rolled_back() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let id = seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    service.delete_by_id(uow.as_ref(), id).await.unwrap();
    drop(uow);

    let uow = factory.begin().await.unwrap();
    assert!(service.get_by_id(uow.as_ref(), id).await.is_ok());
}

#[tokio::test]
async fn test_committed_delete_is_permanent() {
    let factory = InMemoryUnitOfWorkFactory::new();
    let service = ProductService::new();
    let id = seed(&factory, &service).await;

    let uow = factory.begin().await.unwrap();
    service.delete_by_id(uow.as_ref(), id).await.unwrap();
    uow.commit().await.unwrap();

    let uow = factory.begin().await.unwrap();
    assert!(matches!(
        service.get_by_id(uow.as_ref(), id).await,
        Err(ProductError::NotFound { id: missing }) if missing == id
    ));
}
