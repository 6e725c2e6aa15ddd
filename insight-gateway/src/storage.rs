use crate::config::{StorageConfig, StorageType};
use anyhow::{Result, bail};
use insight_store::Datastore;
use insight_store::memory::memory_datastore;
use insight_store::rest::{RestDatastoreConfig, rest_datastore};

pub async fn create_datastore(config: &StorageConfig) -> Result<Datastore> {
    match config.storage_type {
        StorageType::Memory => Ok(memory_datastore()),
        StorageType::Rest => {
            let Some(url) = config.datastore_url.clone() else {
                bail!("DATASTORE_URL is required when STORAGE_TYPE=rest")
            };
            Ok(rest_datastore(RestDatastoreConfig {
                url,
                api_key: config.datastore_api_key.clone(),
                timeout: config.timeout,
            })?)
        }
    }
}
