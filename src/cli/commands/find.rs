//! Find command - locate resource entries

use crate::cli::args::{FindArgs, IndexOptions};
use crate::cli::context::IndexContext;
use crate::config::Config;
use crate::error::{ArcIndexError, ArcIndexResult};
use console::style;
use std::io::{self, Write};

/// Execute the find command
pub async fn execute(args: FindArgs, options: &IndexOptions, config: &Config) -> ArcIndexResult<()> {
    let resolver = IndexContext::new(options, config)?.resolver().await?;

    if args.all {
        let mut found = 0;
        for address in resolver.resolve_all_resource_handles(&args.path) {
            println!("{}", address);
            found += 1;
        }
        if found == 0 {
            not_found(&args.path);
        }
        return Ok(());
    }

    let Some(address) = resolver.resolve_single_resource_handle(&args.path) else {
        not_found(&args.path);
        return Ok(());
    };

    if !args.read {
        println!("{}", address);
        return Ok(());
    }

    let bytes = tokio::task::spawn_blocking(move || resolver.open_address(&address))
        .await
        .map_err(|e| ArcIndexError::Internal(format!("read task failed: {}", e)))??;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| ArcIndexError::io("writing entry to stdout", e))
}

fn not_found(path: &str) {
    eprintln!("{} No archive provides {}", style("Note:").yellow(), path);
}
