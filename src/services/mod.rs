//! Business logic services.

pub mod identity;
pub mod storage;
pub mod webhook;

pub use identity::IdentityVerifier;
pub use storage::Storage;
pub use webhook::WebhookVerifier;
