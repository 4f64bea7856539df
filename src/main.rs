//! blog-pages - generate numbered listing pages for a blog.

use anyhow::{Context, Result};
use blog_pages::{
    cli::{Cli, Commands},
    config::PagesConfig,
    log,
    logger::log_error,
    paginate::{Outcome, page_key, paginate, paginate_with, plan},
    site::{load_collection, write_entries},
};
use clap::Parser;
use std::{fmt, path::Path, process::ExitCode};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error(err.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Build { dry_run, .. } => build(&config, cli.verbose, *dry_run),
        Commands::Check { .. } => check(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<PagesConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        PagesConfig::from_path(&config_path)?
    } else {
        PagesConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Paginate the content directory and write the touched documents.
fn build(config: &PagesConfig, verbose: bool, dry_run: bool) -> Result<()> {
    let content = &config.build.content;
    let mut files = load_collection(content)
        .with_context(|| format!("failed to load `{}`", content.display()))?;
    log!("build"; "loaded {} documents from {}", files.len(), content.display());

    let options = &config.pagination;
    let outcome = if verbose {
        let sink = |args: fmt::Arguments<'_>| log!("paginate"; "{args}");
        paginate_with(&mut files, options, &sink)?
    } else {
        paginate(&mut files, options)?
    };

    let generated = match outcome {
        Outcome::NoItems => {
            log!("build"; "no items under {}, nothing to do", options.item_directory);
            return Ok(());
        }
        Outcome::SinglePage { items } => {
            log!("build"; "{items} items fit on one page, nothing to do");
            return Ok(());
        }
        Outcome::Paginated { items, pages, generated } => {
            log!("build"; "{items} items on {pages} pages");
            generated
        }
    };

    let keys = std::iter::once(options.template.as_str()).chain(generated.iter().map(String::as_str));
    if dry_run {
        for key in keys {
            log!("build"; "would write {key}");
        }
        return Ok(());
    }

    let output = &config.build.output;
    let written = write_entries(output, &files, keys)
        .with_context(|| format!("failed to write to `{}`", output.display()))?;
    log!("build"; "wrote {written} documents to {}", output.display());
    Ok(())
}

/// Report the page plan without touching anything.
fn check(config: &PagesConfig) -> Result<()> {
    let content = &config.build.content;
    let files = load_collection(content)
        .with_context(|| format!("failed to load `{}`", content.display()))?;

    let options = &config.pagination;
    let set = plan(&files, options)?;
    log!(
        "check";
        "{}: {} items, {} per page, {} pages",
        options.template, set.total, set.page_size, set.pages
    );
    for page in 2..=set.pages {
        log!("check"; "would create {}", page_key(options, page));
    }
    Ok(())
}
