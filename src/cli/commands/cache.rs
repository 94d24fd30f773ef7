//! Cache command - inspect or remove the index cache file

use crate::cli::args::{CacheAction, CacheArgs, IndexOptions};
use crate::config::Config;
use crate::error::ArcIndexResult;
use crate::index::IndexCache;
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, options: &IndexOptions, config: &Config) -> ArcIndexResult<()> {
    let path = options
        .cache_file
        .clone()
        .unwrap_or_else(|| config.cache.file_path());
    let cache = IndexCache::at(path);

    match args.action {
        CacheAction::Status => show_status(&cache, config),
        CacheAction::Path => {
            println!("{}", cache.path().display());
            Ok(())
        }
        CacheAction::Clear => clear(&cache),
    }
}

fn show_status(cache: &IndexCache, config: &Config) -> ArcIndexResult<()> {
    let status = cache.status();

    println!("{:<10} {}", "Path:", status.path.display());
    if status.exists {
        println!(
            "{:<10} {} ({} bytes)",
            "State:",
            style("present").green(),
            status.size_bytes
        );
    } else {
        println!("{:<10} {}", "State:", style("absent").dim());
    }
    if !config.cache.enabled {
        println!("{:<10} {}", "Note:", style("caching disabled in config").yellow());
    }

    Ok(())
}

fn clear(cache: &IndexCache) -> ArcIndexResult<()> {
    if cache.clear()? {
        println!("{} removed {}", style("✓").green(), cache.path().display());
    } else {
        println!("No index cache to clear.");
    }
    Ok(())
}
