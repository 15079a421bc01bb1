use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{effective_price, DiscountType};
use crate::reference::Mentor;

/// A training course in the catalog. Owner entity for mentor association
/// links; benefits are owned child rows, kept in payload order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub id: Uuid,
    pub photo_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Training {
    /// Display price after the discount, computed on read. Same policy as
    /// services: AMOUNT floors at zero, PERCENTAGE is unclamped.
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.base_price, self.discount_type, self.discount_value)
    }

    pub fn apply(&mut self, patch: &TrainingPatch) {
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(base_price) = patch.base_price {
            self.base_price = base_price;
        }
        if let Some(discount_type) = patch.discount_type {
            self.discount_type = Some(discount_type);
        }
        if let Some(discount_value) = patch.discount_value {
            self.discount_value = Some(discount_value);
        }
    }
}

/// Partial training update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingPatch {
    pub photo_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
}

/// A training together with its benefits and resolved mentors.
#[derive(Debug, Clone)]
pub struct TrainingDetail {
    pub training: Training,
    pub benefits: Vec<String>,
    pub mentors: Vec<Mentor>,
}
