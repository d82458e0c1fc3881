use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, FieldError},
    models::Product,
};

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    /// Accepted on the wire but always overwritten with the caller.
    #[serde(default)]
    pub owner: Option<Uuid>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
        if self.name.chars().count() > NAME_MAX {
            errors.push(FieldError::new(
                "name",
                format!("must be at most {NAME_MAX} characters"),
            ));
        }
        if self.description.chars().count() > DESCRIPTION_MAX {
            errors.push(FieldError::new(
                "description",
                format!("must be at most {DESCRIPTION_MAX} characters"),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub owner: Option<Uuid>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            if name.is_empty() {
                errors.push(FieldError::new("name", "must not be empty"));
            }
            if name.chars().count() > NAME_MAX {
                errors.push(FieldError::new(
                    "name",
                    format!("must be at most {NAME_MAX} characters"),
                ));
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX {
                errors.push(FieldError::new(
                    "description",
                    format!("must be at most {DESCRIPTION_MAX} characters"),
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Wire view of a product. The owner is never exposed, no matter who asks.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image_url: product.image_url,
            price: product.price,
            stock: product.stock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductResponse>,
}
