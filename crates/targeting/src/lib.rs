//! Visitor-to-ad targeting: business-type inference and the eligibility
//! matcher. Pure reads over the campaign catalog, no side effects.

pub mod inference;
pub mod matcher;

pub use inference::{infer, CategorySet};
pub use matcher::{is_eligible, select_ads, DEFAULT_MATCH_LIMIT};
