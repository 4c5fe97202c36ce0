//! High-level client wiring configuration, transport and services together

use crate::config::Config;
use crate::core::bulk::BulkService;
use crate::core::cells::RestCellService;
use crate::core::process::{PollOptions, ProcessService};
use crate::core::transport::RestTransport;
use crate::utils::error::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Transport shared by every service of a client
pub type SharedTransport = Arc<RestTransport>;

/// Connected TM1 client
///
/// All services share one HTTP connection pool and session cookie jar.
pub struct Tm1Client {
    config: Config,
    transport: SharedTransport,
    bulk: BulkService<RestCellService<SharedTransport>>,
    processes: ProcessService<SharedTransport>,
}

impl Tm1Client {
    /// Build a client from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(RestTransport::new(&config.connection)?);

        let cells = RestCellService::new(Arc::clone(&transport));
        let bulk = BulkService::with_defaults(cells, config.bulk.clone());
        let processes = ProcessService::with_poll_options(
            Arc::clone(&transport),
            PollOptions::from(&config.polling),
        );

        info!(base_url = %transport.base_url(), "TM1 client created");
        Ok(Self {
            config,
            transport,
            bulk,
            processes,
        })
    }

    /// Build a client from a YAML configuration file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(Config::from_file(path).await?)
    }

    /// Build a client from `TM1_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Cell reads and writes
    pub fn cells(&self) -> &RestCellService<SharedTransport> {
        self.bulk.cells()
    }

    /// Bulk operations, batches and batch transactions
    pub fn bulk(&self) -> &BulkService<RestCellService<SharedTransport>> {
        &self.bulk
    }

    /// Process execution
    pub fn processes(&self) -> &ProcessService<SharedTransport> {
        &self.processes
    }
}
