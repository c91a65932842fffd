//! Plans, quotas and the user's subscription

pub mod accessor;
pub mod handlers;

pub use accessor::SubscriptionAccessor;
