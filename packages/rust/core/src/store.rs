//! Persistence contract used by the loader.

use kbload_shared::Result;
use kbload_storage::Storage;

/// The four KB operations the loader needs from a persistence backend.
///
/// Each call is an independent unit of work; implementations decide their
/// own transactional behavior.
#[allow(async_fn_in_trait)]
pub trait KbStore {
    /// Whether a KB with this name exists.
    async fn kb_exists(&self, name: &str) -> Result<bool>;
    /// Create a KB.
    async fn create_kb(&self, name: &str, description: &str) -> Result<()>;
    /// Rename a KB and set its description.
    async fn update_kb(&self, old_name: &str, new_name: &str, description: &str) -> Result<()>;
    /// Add one mapping to a KB.
    async fn insert_mapping(&self, kb_name: &str, key: &str, value: &str) -> Result<()>;
}

impl KbStore for Storage {
    async fn kb_exists(&self, name: &str) -> Result<bool> {
        Storage::kb_exists(self, name).await
    }

    async fn create_kb(&self, name: &str, description: &str) -> Result<()> {
        Storage::create_kb(self, name, description).await.map(|_| ())
    }

    async fn update_kb(&self, old_name: &str, new_name: &str, description: &str) -> Result<()> {
        Storage::update_kb(self, old_name, new_name, description).await
    }

    async fn insert_mapping(&self, kb_name: &str, key: &str, value: &str) -> Result<()> {
        Storage::insert_mapping(self, kb_name, key, value).await
    }
}
