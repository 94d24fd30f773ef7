//! Resolve command - fetch a component's bytes

use crate::cli::args::{IndexOptions, ResolveArgs};
use crate::cli::context::IndexContext;
use crate::config::Config;
use crate::error::{ArcIndexError, ArcIndexResult};
use crate::index::EntryPath;
use crate::resolver::ComponentSink;
use console::style;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, options: &IndexOptions, config: &Config) -> ArcIndexResult<()> {
    let resolver = IndexContext::new(options, config)?.resolver().await?;

    tokio::task::spawn_blocking(move || -> ArcIndexResult<()> {
        match args.output {
            Some(dir) => {
                let written = resolver.load_component(&args.name, &DirectorySink::new(dir))?;
                println!("{} {}", style("Wrote").green(), written.display());
                Ok(())
            }
            None => {
                let bytes = resolver.resolve_component_bytes(&args.name)?;
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(&bytes)
                    .and_then(|()| stdout.flush())
                    .map_err(|e| ArcIndexError::io("writing component to stdout", e))
            }
        }
    })
    .await
    .map_err(|e| ArcIndexError::Internal(format!("resolve task failed: {}", e)))?
}

/// Writes each component to its entry path under a directory
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ComponentSink for DirectorySink {
    type Unit = PathBuf;

    fn define(&self, name: &str, bytes: Vec<u8>) -> ArcIndexResult<PathBuf> {
        let target = self.root.join(EntryPath::for_component(name).as_str());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ArcIndexError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(&target, bytes)
            .map_err(|e| ArcIndexError::io(format!("writing {}", target.display()), e))?;
        Ok(target)
    }
}
