//! Index setup shared by the index, resolve, and find commands

use crate::cli::args::IndexOptions;
use crate::config::Config;
use crate::error::{ArcIndexError, ArcIndexResult};
use crate::index::{
    ArchiveLocation, Fingerprint, IndexBuilder, IndexCache, IndexSource, ObtainedIndex,
};
use crate::resolver::Resolver;
use tracing::debug;

/// Archives, cache, and builder settings for one invocation
#[derive(Debug, Clone)]
pub struct IndexContext {
    locations: Vec<ArchiveLocation>,
    cache: IndexCache,
    cache_enabled: bool,
    builder: IndexBuilder,
}

impl IndexContext {
    /// Combine command-line options with config
    ///
    /// Archives given on the command line replace the configured list.
    pub fn new(options: &IndexOptions, config: &Config) -> ArcIndexResult<Self> {
        let locations: Vec<ArchiveLocation> = if options.archives.is_empty() {
            config.archives.locations()
        } else {
            options
                .archives
                .iter()
                .map(|a| ArchiveLocation::new(a.as_str()))
                .collect()
        };

        if locations.is_empty() {
            return Err(ArcIndexError::User(
                "No archives given. Pass --archive or set archives.locations in config".to_string(),
            ));
        }

        let cache_path = options
            .cache_file
            .clone()
            .unwrap_or_else(|| config.cache.file_path());
        let builder = config.scan.builder();

        Ok(Self {
            locations,
            cache: IndexCache::at(cache_path).with_builder(builder),
            cache_enabled: config.cache.enabled && !options.no_cache,
            builder,
        })
    }

    pub fn locations(&self) -> &[ArchiveLocation] {
        &self.locations
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Load or build the index off the async runtime
    pub async fn obtain(&self, rebuild: bool) -> ArcIndexResult<ObtainedIndex> {
        let ctx = self.clone();
        tokio::task::spawn_blocking(move || ctx.obtain_blocking(rebuild))
            .await
            .map_err(|e| ArcIndexError::Internal(format!("index task failed: {}", e)))?
    }

    /// Obtain the index and bind a resolver to the same archives
    pub async fn resolver(&self) -> ArcIndexResult<Resolver> {
        let obtained = self.obtain(false).await?;
        Resolver::bind(obtained.index, &self.locations)
    }

    fn obtain_blocking(&self, rebuild: bool) -> ArcIndexResult<ObtainedIndex> {
        if !self.cache_enabled {
            debug!("Index cache disabled, scanning archives");
            return Ok(ObtainedIndex {
                index: self.builder.build(&self.locations)?,
                source: IndexSource::Built { persisted: false },
            });
        }

        let fingerprint = Fingerprint::of_archives(&self.locations)?;
        debug!("Archive fingerprint {}", fingerprint);

        if rebuild {
            self.cache.rebuild(&fingerprint, &self.locations)
        } else {
            self.cache.obtain(&fingerprint, &self.locations)
        }
    }
}
