//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{HttpFetcher, PaginatedCollection};
use crate::query::SearchQuery;
use crate::resource::RawHydrator;
use crate::types::ResourceKind;
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = ApiClient::new(&self.client_config()?)?;

        match &self.cli.command {
            Commands::Get { index } => {
                let item = self.collection(&client)?.get(*index).await?;
                self.output(&item)
            }
            Commands::Slice { start, stop, step } => {
                let items = self
                    .collection(&client)?
                    .slice_step(*start..*stop, *step)
                    .await?;
                for item in &items {
                    self.output(item)?;
                }
                Ok(())
            }
            Commands::Count => {
                let count = self.collection(&client)?.count().await?;
                self.output(&json!({ "count": count }))
            }
            Commands::Iterate { limit } => self.iterate(&client, *limit).await,
            Commands::Resource { kind, id } => {
                let resource = client.get(ResourceKind::from_tag(kind), id).await?;
                let raw = resource
                    .raw()
                    .ok_or_else(|| Error::Other(format!("{kind} '{id}' did not load")))?;
                self.output(raw)
            }
        }
    }

    /// Config file (if any) with command-line overrides applied
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match self.cli.config {
            Some(ref path) => {
                debug!("Loading config from {}", path.display());
                ClientConfig::from_file(path)?
            }
            None => ClientConfig::default(),
        };

        if let Some(ref base_url) = self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }
        if self.cli.token.is_some() {
            config.token.clone_from(&self.cli.token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Collection for `--path` with `--param` and `--filter` applied
    fn collection(
        &self,
        client: &ApiClient,
    ) -> Result<PaginatedCollection<HttpFetcher, RawHydrator>> {
        let mut query = SearchQuery::new();
        for (key, value) in &self.cli.params {
            query = query.param(key, value);
        }
        for (field, value) in &self.cli.filters {
            query = query.filter(field, value);
        }

        client.collection(&self.cli.path, query.into_params(), RawHydrator)
    }

    async fn iterate(&self, client: &ApiClient, limit: Option<usize>) -> Result<()> {
        let collection = self.collection(client)?;
        let limit = match limit {
            Some(limit) => limit,
            None => collection.count().await?,
        };
        info!("Iterating {limit} items of {}", self.cli.path);

        let mut items = Box::pin(collection.iter().into_stream().take(limit));
        while let Some(item) = items.next().await {
            match item {
                Ok(item) => self.output(&item)?,
                Err(Error::IndexOutOfRange { index, .. }) => {
                    debug!("Collection ended at {index}");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{line}");
        Ok(())
    }
}
