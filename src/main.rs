use clap::{Args, Parser, Subcommand};
use flip_hover::catalog::{JsonCatalog, StoreReader, role_options};
use flip_hover::config::{self, FlipConfig, Location};
use flip_hover::flip::{FlipResolver, preload_roles};
use flip_hover::inject::decorate_result;
use flip_hover::media::PresetResizer;
use flip_hover::output;
use flip_hover::types::{Product, ResolutionResult};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flip-hover")]
#[command(about = "Secondary hover images for product listings")]
#[command(long_about = "\
Secondary hover images for product listings

For each product, the configured role chain picks an alternate image:

  primary_role   → attribute value, gallery tag, or \"second_image\"
  fallback_role  → tried only when the primary finds nothing

The image is resized through the named preset (raw media URL if that fails)
and injected into the product's listing markup.

Configuration:

  config/
  ├── config.toml            # Default scope
  └── stores/
      └── es_ar.toml         # Store scope (overrides config.toml)

Run 'flip-hover gen-config' to generate a documented config.toml.
Set RUST_LOG=debug to trace role resolution on stderr.")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config", global = true)]
    config: PathBuf,

    /// Store scope; layers stores/<code>.toml over config.toml
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that resolve images.
#[derive(Args, Clone)]
struct ResolveArgs {
    /// Catalog export (JSON)
    #[arg(long)]
    catalog: PathBuf,

    /// Resize preset (defaults to media.default_preset)
    #[arg(long)]
    preset: Option<String>,

    /// Listing location; a disabled location yields no images
    #[arg(long)]
    location: Option<Location>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve secondary images and print them as JSON
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,

        /// Product SKU (repeatable; all products when omitted)
        #[arg(long = "sku")]
        skus: Vec<String>,
    },
    /// Inject one product's secondary image into listing markup
    Decorate {
        #[command(flatten)]
        args: ResolveArgs,

        /// Product SKU
        #[arg(long)]
        sku: String,

        /// Markup file, or '-' for stdin
        #[arg(long)]
        markup: PathBuf,
    },
    /// Print the browser-side configuration as JSON
    FrontendConfig,
    /// List the roles selectable as primary or fallback
    Roles {
        /// Catalog export (JSON)
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Validate configuration and print the effective settings
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// One line of `resolve` output.
#[derive(Serialize)]
struct SkuResult<'a> {
    sku: &'a str,
    #[serde(flatten)]
    result: ResolutionResult,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    let store = cli.store.as_deref();

    match cli.command {
        Command::Resolve { args, skus } => {
            let config = config::load_store_config(&cli.config, store)?;
            init_thread_pool(&config.processing);
            let catalog = JsonCatalog::load(&args.catalog)?;
            let products = select_products(&catalog, &skus)?;
            let snapshots = listing_snapshots(&catalog, &products, &config);
            info!(products = snapshots.len(), store, "resolving");

            let reader = StoreReader::new(&catalog);
            let resizer = PresetResizer::from_config(&config);
            let resolver = FlipResolver::new(&reader, &resizer);
            let results = match args.location {
                Some(location) if !config.is_enabled_for(location) => {
                    info!(%location, "location disabled");
                    snapshots
                        .iter()
                        .map(|_| ResolutionResult::none(&config))
                        .collect()
                }
                _ => resolver.resolve_batch(&snapshots, &config, args.preset.as_deref())?,
            };

            output::print_resolution_summary(&results);
            let rows: Vec<SkuResult> = snapshots
                .iter()
                .zip(results)
                .map(|(product, result)| SkuResult {
                    sku: &product.sku,
                    result,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::Decorate { args, sku, markup } => {
            let config = config::load_store_config(&cli.config, store)?;
            let catalog = JsonCatalog::load(&args.catalog)?;
            let products = select_products(&catalog, std::slice::from_ref(&sku))?;
            let snapshots = listing_snapshots(&catalog, &products, &config);
            let markup = read_markup(&markup)?;

            let reader = StoreReader::new(&catalog);
            let resizer = PresetResizer::from_config(&config);
            let resolver = FlipResolver::new(&reader, &resizer);
            let mut result = match args.location {
                Some(location) => resolver.resolve_for_location(
                    &snapshots[0],
                    &config,
                    location,
                    args.preset.as_deref(),
                )?,
                None => resolver.resolve_for(&snapshots[0], &config, args.preset.as_deref())?,
            };
            print!("{}", decorate_result(&markup, &mut result));
        }
        Command::FrontendConfig => {
            let config = config::load_store_config(&cli.config, store)?;
            println!("{}", serde_json::to_string_pretty(&config.frontend())?);
        }
        Command::Roles { catalog } => {
            let catalog = JsonCatalog::load(&catalog)?;
            output::print_role_options(&role_options(&catalog));
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let config = config::load_store_config(&cli.config, store)?;
            output::print_config_summary(&config, &cli.config, store);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Products named by `skus`, in that order; every product when empty.
fn select_products<'c>(
    catalog: &'c JsonCatalog,
    skus: &[String],
) -> Result<Vec<&'c Product>, Box<dyn std::error::Error>> {
    if skus.is_empty() {
        return Ok(catalog.products().iter().collect());
    }
    skus.iter()
        .map(|sku| {
            catalog
                .find_sku(sku)
                .ok_or_else(|| format!("unknown sku {sku:?}").into())
        })
        .collect()
}

/// Products as a listing would load them: only the preloaded role attributes,
/// everything else read through the store.
fn listing_snapshots(catalog: &JsonCatalog, products: &[&Product], config: &FlipConfig) -> Vec<Product> {
    let preload = preload_roles(config);
    products
        .iter()
        .map(|product| catalog.listing_snapshot(product, &preload))
        .collect()
}

fn read_markup(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut markup = String::new();
        std::io::stdin().read_to_string(&mut markup)?;
        Ok(markup)
    } else {
        std::fs::read_to_string(path)
    }
}
