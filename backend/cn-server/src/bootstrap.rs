use crate::Result as ServerErrorResult;

use cn_config::Config;
use cn_db::SqliteContactStore;
use cn_notify::ContactNotifier;

use std::sync::Arc;

use log::info;

/// Open the contact store named by `config` and build a notifier on top of it
pub async fn build_notifier(config: &Config) -> ServerErrorResult<ContactNotifier> {
    let database_path = config.database_path()?;
    info!("Connecting to contact store: {}", database_path.display());

    let store = SqliteContactStore::connect(&database_path).await?;
    let notifier = ContactNotifier::new(Arc::new(store), config.notifier.clone());

    info!(
        "Contact notifier ready (max {} concurrent lookups per dispatch)",
        config.notifier.max_concurrent_lookups
    );

    Ok(notifier)
}
