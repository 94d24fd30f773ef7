//! Index command - build or load the index and summarize it

use crate::cli::args::{IndexArgs, IndexOptions, OutputFormat};
use crate::cli::context::IndexContext;
use crate::config::Config;
use crate::error::ArcIndexResult;
use crate::index::{IndexSource, ObtainedIndex};
use console::style;

/// Execute the index command
pub async fn execute(args: IndexArgs, options: &IndexOptions, config: &Config) -> ArcIndexResult<()> {
    let ctx = IndexContext::new(options, config)?;
    let obtained = ctx.obtain(args.rebuild).await?;

    match args.format {
        OutputFormat::Table => print_table(&ctx, &obtained),
        OutputFormat::Json => print_json(&ctx, &obtained)?,
        OutputFormat::Plain => {
            let stats = obtained.index.stats();
            println!("{} {} {}", stats.components, stats.resources, stats.shadowed);
        }
    }

    Ok(())
}

fn print_table(ctx: &IndexContext, obtained: &ObtainedIndex) {
    let source = match obtained.source {
        IndexSource::Loaded => style("loaded from cache").green(),
        IndexSource::Built { persisted: true } => style("built").cyan(),
        IndexSource::Built { persisted: false } => style("built (not cached)").yellow(),
    };
    let stats = obtained.index.stats();

    println!("{:<12} {}", "Index:", source);
    println!("{:<12} {}", "Cache file:", ctx.cache().path().display());
    println!("{:<12} {}", "Archives:", ctx.locations().len());
    println!("{:<12} {}", "Components:", stats.components);
    println!("{:<12} {}", "Resources:", stats.resources);
    println!("{:<12} {}", "Shadowed:", stats.shadowed);
}

fn print_json(ctx: &IndexContext, obtained: &ObtainedIndex) -> ArcIndexResult<()> {
    let archives: Vec<&str> = ctx.locations().iter().map(|l| l.as_str()).collect();
    let json = serde_json::json!({
        "source": obtained.source.to_string(),
        "cache_file": ctx.cache().path(),
        "archives": archives,
        "stats": obtained.index.stats(),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
