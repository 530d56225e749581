use super::Scope;
use crate::error::Result;

/// Abstract interface for raw key-value storage.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::TodoStore`] and [`crate::identity::LocalIdentity`] handle the
/// "what". Values are opaque strings; callers own the encoding.
///
/// All methods take `&self`: implementations handle their own interior
/// mutability (or are stateless I/O), so one backend can be shared through an
/// `Rc` by every component that persists state.
pub trait StorageBackend {
    /// Read the value stored under `key`, or `Ok(None)` if it was never written.
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    /// MUST be atomic, a reader never observes a partial value.
    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, scope: Scope, key: &str) -> Result<()>;

    /// Drop every key of the scope.
    fn clear(&self, scope: Scope) -> Result<()>;
}
