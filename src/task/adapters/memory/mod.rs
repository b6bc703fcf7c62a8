//! In-memory adapters for task lifecycle tests.

mod identity;
mod store;

pub use identity::StaticIdentityProvider;
pub use store::InMemoryTaskStore;
