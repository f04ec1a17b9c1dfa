//! 请求与响应结构

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::{CreateProductCommand, UpdateProductCommand};
use crate::domain::entities;
use crate::domain::value_objects::ProductId;

/// `POST /products` 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNewProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl From<CreateNewProductRequest> for CreateProductCommand {
    fn from(req: CreateNewProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
        }
    }
}

/// `PATCH /products/{id}` 请求体，所有字段可选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductToUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl From<ProductToUpdate> for UpdateProductCommand {
    fn from(req: ProductToUpdate) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 对外的商品结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl From<entities::Product> for Product {
    fn from(p: entities::Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetAllProductsResponse {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_accepts_float_price() {
        let req: CreateNewProductRequest = serde_json::from_value(json!({
            "name": "Widget",
            "description": "x",
            "price": 9.99,
            "stock": 5
        }))
        .unwrap();

        assert_eq!(req.price, Decimal::new(999, 2));
        assert_eq!(req.stock, 5);
    }

    #[test]
    fn test_create_request_requires_every_field() {
        for missing in ["name", "description", "price", "stock"] {
            let mut body = json!({
                "name": "Widget",
                "description": "x",
                "price": 9.99,
                "stock": 5
            });
            body.as_object_mut().unwrap().remove(missing);

            let err = serde_json::from_value::<CreateNewProductRequest>(body).unwrap_err();
            assert!(err.to_string().contains(missing), "{}", err);
        }
    }

    #[test]
    fn test_partial_update_leaves_missing_fields_unset() {
        let req: ProductToUpdate = serde_json::from_value(json!({ "stock": 12 })).unwrap();

        assert_eq!(req.stock, Some(12));
        assert!(req.name.is_none());
        assert!(req.description.is_none());
        assert!(req.price.is_none());
    }

    #[test]
    fn test_product_renders_price_as_number() {
        let product = Product {
            id: ProductId(1),
            name: "Widget".into(),
            description: "x".into(),
            price: Decimal::new(999, 2),
            stock: 5,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["price"].as_f64(), Some(9.99));
    }
}
