//! Selects the drug store backend from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use super::memory::InMemoryDrugStore;
use super::remote::RemoteDrugStore;
use super::store::DrugStore;
use crate::core::Result;
use crate::core::config::DataConfig;

/// Open the configured drug store.
///
/// The remote API wins over a local file; with neither configured an empty
/// in-memory catalog is returned.
pub fn open_store(config: &DataConfig) -> Result<Arc<dyn DrugStore>> {
    if let Some(url) = &config.api_url {
        if config.json_path.is_some() {
            warn!("Both MCP_DRUG_API_URL and MCP_DRUG_DATA_PATH are set; using the API");
        }
        info!("Using remote drug store at {}", url);
        return Ok(Arc::new(RemoteDrugStore::new(url, config.api_timeout())?));
    }

    if let Some(path) = &config.json_path {
        return Ok(Arc::new(InMemoryDrugStore::from_file(path)?));
    }

    warn!("No drug data source configured, starting with an empty catalog");
    Ok(Arc::new(InMemoryDrugStore::default()))
}
