pub mod contact_store;
pub mod error;
pub mod in_memory_contact_store;
pub mod sqlite_contact_store;

pub use contact_store::ContactStore;
pub use error::{DbError, Result};
pub use in_memory_contact_store::InMemoryContactStore;
pub use sqlite_contact_store::SqliteContactStore;

#[cfg(test)]
mod tests;
