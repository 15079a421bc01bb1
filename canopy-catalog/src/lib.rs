use thiserror::Error;

pub mod associations;
pub mod member;
pub mod opportunity;
pub mod pricing;
pub mod project;
pub mod reference;
pub mod service;
pub mod training;

pub use pricing::{effective_price, DiscountType};

/// A stored enum tag that does not match any known variant.
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
