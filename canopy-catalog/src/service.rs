use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{effective_price, DiscountType};
use crate::reference::{ServiceOffering, ServiceTech};

/// A purchasable service in the catalog. Owner entity for tech and
/// offering association links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
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

impl Service {
    /// Display price after the discount, computed on read.
    pub fn effective_price(&self) -> Decimal {
        effective_price(self.base_price, self.discount_type, self.discount_value)
    }

    pub fn apply(&mut self, patch: &ServicePatch) {
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

/// Partial service update. Each field is applied only when present;
/// `None` (field absent or JSON null) leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicePatch {
    pub photo_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
}

/// A service together with its resolved reference lists.
#[derive(Debug, Clone)]
pub struct ServiceDetail {
    pub service: Service,
    pub techs: Vec<ServiceTech>,
    pub offerings: Vec<ServiceOffering>,
}
