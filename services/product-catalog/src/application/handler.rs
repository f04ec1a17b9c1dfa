//! Business logic handler
//!
//! 所有操作都在调用方提供的工作单元内执行；提交由调用方负责。

use catalog_auth_core::AuthUser;
use catalog_errors::AppError;
use tracing::{info, warn};

use crate::domain::entities::Product;
use crate::domain::unit_of_work::UnitOfWork;
use crate::domain::value_objects::ProductId;
use crate::error::{ProductError, ServiceResult};

use super::commands::{CreateProductCommand, UpdateProductCommand};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductService;

impl ProductService {
    pub fn new() -> Self {
        Self
    }

    /// 创建商品
    pub async fn create(
        &self,
        uow: &dyn UnitOfWork,
        cmd: CreateProductCommand,
        user: &AuthUser,
    ) -> ServiceResult<ProductId> {
        cmd.validate()?;

        let products = uow.products();
        if products.exists_by_name(&cmd.name).await? {
            warn!(name = %cmd.name, "Product name already taken");
            return Err(ProductError::AlreadyExists { name: cmd.name });
        }

        let name = cmd.name.clone();
        let new_product = cmd.into_new_product();
        let id = match products.insert(&new_product, &user.id).await {
            Ok(id) => id,
            // 并发创建同名商品时由唯一约束兜底
            Err(AppError::Conflict(_)) => return Err(ProductError::AlreadyExists { name }),
            Err(e) => return Err(e.into()),
        };

        info!(product_id = %id, name = %name, user = %user.username, "Product created");
        Ok(id)
    }

    /// 查询全部商品
    pub async fn list_all(&self, uow: &dyn UnitOfWork) -> ServiceResult<Vec<Product>> {
        Ok(uow.products().select_all().await?)
    }

    /// 根据 ID 获取商品
    pub async fn get_by_id(&self, uow: &dyn UnitOfWork, id: ProductId) -> ServiceResult<Product> {
        uow.products()
            .select_by_id(id)
            .await?
            .ok_or(ProductError::NotFound { id })
    }

    /// 删除商品
    pub async fn delete_by_id(&self, uow: &dyn UnitOfWork, id: ProductId) -> ServiceResult<()> {
        let products = uow.products();
        if products.select_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound { id });
        }

        products.delete_by_id(id).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// 部分更新商品，未提供的字段保持不变
    pub async fn update(
        &self,
        uow: &dyn UnitOfWork,
        id: ProductId,
        cmd: UpdateProductCommand,
    ) -> ServiceResult<()> {
        let products = uow.products();
        let current = products
            .select_by_id(id)
            .await?
            .ok_or(ProductError::NotFound { id })?;

        cmd.validate()?;
        let changes = cmd.into_changes();
        if changes.is_empty() {
            return Ok(());
        }

        if let Some(name) = &changes.name {
            if *name != current.name && products.exists_by_name(name).await? {
                return Err(ProductError::AlreadyExists { name: name.clone() });
            }
        }

        match products.update_fields(id, &changes).await {
            Ok(()) => {}
            Err(AppError::Conflict(_)) => {
                return Err(ProductError::AlreadyExists {
                    name: changes.name.unwrap_or(current.name),
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(product_id = %id, "Product updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_common::UserId;
    use catalog_errors::AppResult;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use crate::domain::entities::ProductChanges;
    use crate::domain::repositories::{MockProductRepository, ProductRepository};

    struct MockUnitOfWork {
        repo: MockProductRepository,
    }

    #[async_trait]
    impl UnitOfWork for MockUnitOfWork {
        fn products(&self) -> &dyn ProductRepository {
            &self.repo
        }

        async fn commit(self: Box<Self>) -> AppResult<()> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> AppResult<()> {
            Ok(())
        }
    }

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::new(),
            username: "alice".to_string(),
        }
    }

    fn widget(id: i64) -> Product {
        Product {
            id: ProductId(id),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 5,
        }
    }

    fn create_widget() -> CreateProductCommand {
        CreateProductCommand {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            stock: 5,
        }
    }

    #[tokio::test]
    async fn test_create_inserts_when_name_is_free() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name()
            .with(eq("Widget"))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|_, _| Ok(ProductId(1)));
        let uow = MockUnitOfWork { repo };

        let id = ProductService::new()
            .create(&uow, create_widget(), &user())
            .await
            .unwrap();

        assert_eq!(id, ProductId(1));
    }

    #[tokio::test]
    async fn test_duplicate_name_never_inserts() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name().returning(|_| Ok(true));
        repo.expect_insert().never();
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new()
            .create(&uow, create_widget(), &user())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::AlreadyExists { ref name } if name == "Widget"));
    }

    #[tokio::test]
    async fn test_unique_violation_on_insert_maps_to_already_exists() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name().returning(|_| Ok(false));
        repo.expect_insert()
            .returning(|_, _| Err(AppError::conflict("products_name_key")));
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new()
            .create(&uow, create_widget(), &user())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_invalid_create_touches_nothing() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists_by_name().never();
        repo.expect_insert().never();
        let uow = MockUnitOfWork { repo };

        let mut cmd = create_widget();
        cmd.stock = -1;
        let err = ProductService::new()
            .create(&uow, cmd, &user())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id()
            .with(eq(ProductId(999)))
            .returning(|_| Ok(None));
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new()
            .get_by_id(&uow, ProductId(999))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound { id } if id == ProductId(999)));
    }

    #[tokio::test]
    async fn test_delete_missing_product_does_not_delete() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id().returning(|_| Ok(None));
        repo.expect_delete_by_id().never();
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new()
            .delete_by_id(&uow, ProductId(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_passes_only_supplied_fields() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id().returning(|id| Ok(Some(widget(id.0))));
        repo.expect_exists_by_name().never();
        repo.expect_update_fields()
            .withf(|id, changes: &ProductChanges| {
                *id == ProductId(1)
                    && changes.stock == Some(12)
                    && changes.name.is_none()
                    && changes.price.is_none()
                    && changes.description.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let uow = MockUnitOfWork { repo };

        let cmd = UpdateProductCommand {
            stock: Some(12),
            ..Default::default()
        };
        ProductService::new()
            .update(&uow, ProductId(1), cmd)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id().returning(|_| Ok(None));
        repo.expect_update_fields().never();
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new()
            .update(&uow, ProductId(5), UpdateProductCommand::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_update_is_a_no_op() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id().returning(|id| Ok(Some(widget(id.0))));
        repo.expect_update_fields().never();
        let uow = MockUnitOfWork { repo };

        ProductService::new()
            .update(&uow, ProductId(1), UpdateProductCommand::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_is_rejected() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_by_id().returning(|id| Ok(Some(widget(id.0))));
        repo.expect_exists_by_name()
            .with(eq("Gadget"))
            .returning(|_| Ok(true));
        repo.expect_update_fields().never();
        let uow = MockUnitOfWork { repo };

        let cmd = UpdateProductCommand {
            name: Some("Gadget".to_string()),
            ..Default::default()
        };
        let err = ProductService::new()
            .update(&uow, ProductId(1), cmd)
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::AlreadyExists { ref name } if name == "Gadget"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_unclassified() {
        let mut repo = MockProductRepository::new();
        repo.expect_select_all()
            .returning(|| Err(AppError::database("connection reset")));
        let uow = MockUnitOfWork { repo };

        let err = ProductService::new().list_all(&uow).await.unwrap_err();

        assert!(matches!(err, ProductError::Unclassified(_)));
    }
}
