use crate::api::TickApi;
use crate::config::TickConfig;
use crate::error::Result;
use crate::identity::LocalIdentity;
use crate::store::fs_backend::FsBackend;
use crate::store::TodoStore;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

pub type FsApi = TickApi<FsBackend, LocalIdentity<FsBackend>>;

pub struct TickContext {
    pub api: FsApi,
    pub config: TickConfig,
}

/// Load configuration from its default location and open the filesystem store
/// it points at.
pub fn initialize() -> Result<TickContext> {
    let config = TickConfig::load()?;
    let data_dir = config.data_dir()?;
    open(&data_dir, config)
}

/// Open the store rooted at `data_dir` with an explicit configuration.
pub fn open(data_dir: &Path, config: TickConfig) -> Result<TickContext> {
    let backend = Rc::new(FsBackend::under(data_dir));
    let identity = LocalIdentity::new(Rc::clone(&backend));
    let store = TodoStore::load(backend)?;
    info!(
        data_dir = %data_dir.display(),
        active = store.active().len(),
        archived = store.archived().len(),
        "opened ticktrack store"
    );

    let api = TickApi::new(store, identity, config.clone());
    Ok(TickContext { api, config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};
    use tempfile::TempDir;

    #[test]
    fn test_open_persists_between_contexts() {
        crate::test_utils::init_tracing();
        let temp = TempDir::new().unwrap();

        let mut ctx = open(temp.path(), TickConfig::default()).unwrap();
        ctx.api
            .create_todo("Survives restart", Category::Work, Priority::High, None)
            .unwrap();
        drop(ctx);

        let ctx = open(temp.path(), TickConfig::default()).unwrap();
        let titles: Vec<_> = ctx
            .api
            .store()
            .active()
            .iter()
            .map(|t| t.title.clone())
            .collect();
        assert_eq!(titles, vec!["Survives restart"]);
        assert!(temp.path().join("durable").join("todos.json").exists());
    }

    #[test]
    fn test_open_empty_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = open(temp.path(), TickConfig::default()).unwrap();
        assert!(ctx.api.store().active().is_empty());
        assert!(ctx.api.store().archived().is_empty());
    }
}
