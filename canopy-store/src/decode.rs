//! Conversions from stored TEXT columns back into domain types.

use canopy_catalog::member::{MemberRole, SocialMedia};
use canopy_catalog::opportunity::OpportunityType;
use canopy_catalog::pricing::DiscountType;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;

pub(crate) fn uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value)
        .map_err(|e| StoreError::Conversion(format!("invalid uuid {:?}: {}", value, e)))
}

pub(crate) fn decimal(value: &str) -> Result<Decimal, StoreError> {
    value
        .parse::<Decimal>()
        .map_err(|e| StoreError::Conversion(format!("invalid decimal {:?}: {}", value, e)))
}

pub(crate) fn opt_decimal(value: Option<String>) -> Result<Option<Decimal>, StoreError> {
    value.as_deref().map(decimal).transpose()
}

pub(crate) fn opt_discount_type(value: Option<String>) -> Result<Option<DiscountType>, StoreError> {
    value
        .as_deref()
        .map(|s| {
            s.parse::<DiscountType>()
                .map_err(|e| StoreError::Conversion(e.to_string()))
        })
        .transpose()
}

pub(crate) fn member_role(value: &str) -> Result<MemberRole, StoreError> {
    value
        .parse::<MemberRole>()
        .map_err(|e| StoreError::Conversion(e.to_string()))
}

pub(crate) fn opportunity_type(value: &str) -> Result<OpportunityType, StoreError> {
    value
        .parse::<OpportunityType>()
        .map_err(|e| StoreError::Conversion(e.to_string()))
}

pub(crate) fn social_media(value: Option<String>) -> Result<Option<SocialMedia>, StoreError> {
    value
        .as_deref()
        .map(|raw| {
            serde_json::from_str::<SocialMedia>(raw)
                .map_err(|e| StoreError::Conversion(format!("invalid social media json: {}", e)))
        })
        .transpose()
}

pub(crate) fn social_media_to_json(value: Option<&SocialMedia>) -> Result<Option<String>, StoreError> {
    value
        .map(|sm| {
            serde_json::to_string(sm)
                .map_err(|e| StoreError::Conversion(format!("could not serialize social media: {}", e)))
        })
        .transpose()
}
