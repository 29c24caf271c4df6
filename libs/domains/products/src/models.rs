use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

pub const MSG_QUANTITY_REDUCED: &str = "Product quantity reduced successfully";
pub const MSG_QUANTITY_NOT_SUFFICIENT: &str = "Product quantity not sufficient";

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Server-generated identifier
    pub id: String,
    /// Owner identifier
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Units in stock, never negative
    pub qty: i32,
}

/// Input for inserting a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub qty: i32,
}

/// Result of a successful insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedProduct {
    pub id: String,
}

impl InsertedProduct {
    pub fn message(&self) -> String {
        format!("Product inserted successfully: {}", self.id)
    }
}

/// One line of an order: take `qty` units of `product_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReductionItem {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 1))]
    pub qty: i32,
}

/// Stock reduction applied item by item, in order, all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReduceProducts {
    #[validate(length(min = 1), nested)]
    pub items: Vec<ReductionItem>,
}

/// How a reduction ended when no technical error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// Every item was decremented and committed.
    Reduced,
    /// `product_id` was missing or short on stock; nothing was changed.
    InsufficientQuantity { product_id: String },
}

impl ReduceOutcome {
    pub fn is_reduced(&self) -> bool {
        matches!(self, ReduceOutcome::Reduced)
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReduceOutcome::Reduced => MSG_QUANTITY_REDUCED,
            ReduceOutcome::InsufficientQuantity { .. } => MSG_QUANTITY_NOT_SUFFICIENT,
        }
    }
}

/// Listing request after defaults have been applied.
///
/// When `product_ids` holds at least one id, paging is skipped and every
/// matching product is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProducts {
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
    pub product_ids: Option<Vec<String>>,
}

impl ListProducts {
    pub fn page(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self {
            page,
            limit,
            product_ids: None,
        }
    }

    pub fn by_ids(ids: Vec<String>) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            product_ids: Some(ids),
        }
    }

    /// Rows to skip in offset mode
    pub fn offset(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.limit.get())
    }
}

impl Default for ListProducts {
    fn default() -> Self {
        Self::page(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListingMeta {
    /// Rows matching the filter, ignoring limit and offset
    pub total_data: u64,
    pub total_page: u64,
    pub current_page: u32,
    pub limit: u32,
}

impl ListingMeta {
    pub fn new(total_data: u64, page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self {
            total_data,
            total_page: page_count(total_data, limit),
            current_page: page.get(),
            limit: limit.get(),
        }
    }
}

/// Pages needed for `total` rows; an empty listing still has one page.
pub fn page_count(total: u64, limit: NonZeroU32) -> u64 {
    if total == 0 {
        1
    } else {
        total.div_ceil(u64::from(limit.get()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub meta: ListingMeta,
}

/// Body returned by the insert endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InsertProductResponse {
    pub id: String,
    pub msg: String,
}

impl From<InsertedProduct> for InsertProductResponse {
    fn from(inserted: InsertedProduct) -> Self {
        Self {
            msg: inserted.message(),
            id: inserted.id,
        }
    }
}

/// Body returned by the reduce endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReduceResponse {
    pub success: bool,
    pub msg: String,
    /// First product that could not be reduced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl From<ReduceOutcome> for ReduceResponse {
    fn from(outcome: ReduceOutcome) -> Self {
        let msg = outcome.message().to_string();
        match outcome {
            ReduceOutcome::Reduced => Self {
                success: true,
                msg,
                product_id: None,
            },
            ReduceOutcome::InsufficientQuantity { product_id } => Self {
                success: false,
                msg,
                product_id: Some(product_id),
            },
        }
    }
}
