//! Sermondex CLI - build, tag and query a sermon recording catalog
//!
//! # Main Commands
//!
//! ```bash
//! sermondex ingest ./audio               # Build the catalog from a directory or listing
//! sermondex query --theme Faith          # Filter, sort and limit recordings
//! sermondex keywords --top 20            # Title keyword and theme coverage report
//! sermondex serve                        # Start HTTP server (port 3000)
//! ```
//!
//! # Maintenance Commands
//!
//! ```bash
//! sermondex retag                        # Re-tag the catalog with the active taxonomy
//! sermondex relocate https://cdn/bucket  # Point recordings at a new storage location
//! sermondex taxonomy export              # Print the active taxonomy as JSON
//! sermondex parse 2023-01-01_Grace.mp3   # Debug the filename parser
//! ```

use clap::{Parser, Subcommand};
use sermondex::catalog::stats::{coverage_percent, top_years};
use sermondex::config::{CatalogArgs, DEFAULT_LOCATION_PREFIX, DEFAULT_LOG_FILTER, DEFAULT_PORT};
use sermondex::{
    evaluate_params, ingest_source, keyword_frequencies, parse_identifier_verbose, theme_listing,
    AppConfig, CatalogStore, IngestOptions, QueryParams, Taxonomy, ThemeClassifier,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sermondex")]
#[command(about = "Catalog, tag and query sermon recordings", long_about = None)]
struct Cli {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog from a directory of .mp3 files or a listing file
    Ingest {
        /// Directory or newline-separated listing
        source: PathBuf,

        /// Prefix for generated location references
        #[arg(long, env = "SERMONDEX_LOCATION_PREFIX", default_value = DEFAULT_LOCATION_PREFIX)]
        location_prefix: String,
    },

    /// Show how identifiers parse
    Parse {
        /// Filenames such as 2023-01-01_Grace_and_Faith.mp3
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Show the themes for a title
    Classify {
        title: String,
    },

    /// Re-tag the stored catalog with the active taxonomy
    Retag,

    /// Query the catalog and print matching recordings as JSON
    Query {
        /// Case-insensitive title substring
        #[arg(short, long)]
        search: Option<String>,

        /// Required theme (repeatable, all must match)
        #[arg(short, long = "theme")]
        themes: Vec<String>,

        /// newest, oldest, title or title-desc
        #[arg(long)]
        sort: Option<String>,

        /// Maximum number of results
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Show catalog statistics
    Stats,

    /// List themes with their recording counts
    Themes,

    /// Most frequent title keywords and theme coverage
    Keywords {
        /// Number of keywords to show
        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// Export or check taxonomies
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Rewrite every location reference to {BASE_URL}/{identifier}
    Relocate {
        base_url: String,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Public base URL joined onto relative location references
        #[arg(long, env = "SERMONDEX_PUBLIC_BASE_URL")]
        public_base_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum TaxonomyAction {
    /// Print the active taxonomy as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a taxonomy JSON file
    Validate {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let args = cli.catalog;

    let result = match cli.command {
        Commands::Ingest { source, location_prefix } => cmd_ingest(&args, &source, location_prefix),
        Commands::Parse { identifiers } => cmd_parse(&identifiers),
        Commands::Classify { title } => cmd_classify(&args, &title),
        Commands::Retag => cmd_retag(&args),
        Commands::Query { search, themes, sort, limit } => {
            cmd_query(&args, QueryParams { search, themes, sort, limit })
        }
        Commands::Stats => cmd_stats(&args),
        Commands::Themes => cmd_themes(&args),
        Commands::Keywords { top } => cmd_keywords(&args, top),
        Commands::Taxonomy { action } => cmd_taxonomy(&args, action),
        Commands::Relocate { base_url } => cmd_relocate(&args, &base_url),
        Commands::Serve { port, public_base_url } => {
            sermondex::server::start_server(AppConfig::new(&args, port, public_base_url)).await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_ingest(args: &CatalogArgs, source: &Path, location_prefix: String) -> CmdResult {
    eprintln!("📄 Ingesting: {}", source.display());

    let classifier = args.taxonomy_source().classifier()?;
    let options = IngestOptions { location_prefix };
    let report = ingest_source(source, &classifier, &options)?;

    for skipped in report.skipped.iter().take(5) {
        eprintln!("   ⏭️  {} ({})", skipped.identifier, skipped.reason);
    }
    if report.skipped.len() > 5 {
        eprintln!("   ... +{} more skipped", report.skipped.len() - 5);
    }

    let mut store = CatalogStore::open(&args.catalog)?;
    let count = report.recordings.len();
    store.replace_all(report.recordings, &classifier.taxonomy().name)?;
    store.save()?;

    eprintln!("✅ {} recordings catalogued", count);
    eprintln!("💾 Saved to: {}", store.path().display());
    Ok(())
}

fn cmd_parse(identifiers: &[String]) -> CmdResult {
    for identifier in identifiers {
        match parse_identifier_verbose(identifier) {
            Ok(parsed) => {
                println!("✅ {} → {} | {}", identifier, parsed.recorded_date, parsed.title)
            }
            Err(reason) => println!("⏭️  {} → skipped: {}", identifier, reason),
        }
    }
    Ok(())
}

fn cmd_classify(args: &CatalogArgs, title: &str) -> CmdResult {
    let classifier = args.taxonomy_source().classifier()?;
    println!("{}", classifier.classify(title).join(", "));
    Ok(())
}

fn cmd_retag(args: &CatalogArgs) -> CmdResult {
    let classifier = args.taxonomy_source().classifier()?;
    let mut store = CatalogStore::open(&args.catalog)?;

    if let Some(previous) = store.taxonomy_name() {
        eprintln!("🏷️  Re-tagging: {} → {}", previous, classifier.taxonomy().name);
    }

    let report = store.retag(&classifier);
    store.save()?;

    eprintln!("✅ {} of {} recordings changed", report.changed, report.total);
    Ok(())
}

/// Open the catalog with themes recomputed for the active taxonomy.
fn open_tagged(
    args: &CatalogArgs,
) -> Result<(CatalogStore, ThemeClassifier), Box<dyn std::error::Error>> {
    let classifier = args.taxonomy_source().classifier()?;
    let (store, _) = CatalogStore::open_tagged(&args.catalog, &classifier)?;
    Ok((store, classifier))
}

fn cmd_query(args: &CatalogArgs, params: QueryParams) -> CmdResult {
    let (store, _) = open_tagged(args)?;
    let results = evaluate_params(store.recordings(), &params)?;

    eprintln!("🔎 {} of {} recordings match", results.len(), store.len());
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn cmd_stats(args: &CatalogArgs) -> CmdResult {
    let (store, classifier) = open_tagged(args)?;
    let stats = store.stats();

    println!("📊 Catalog: {}", store.path().display());
    println!("   Recordings: {}", stats.total_count);
    if let Some(range) = stats.date_range {
        println!("   Date range: {} → {}", range.earliest, range.latest);
    }
    if let Some(name) = store.taxonomy_name() {
        println!("   Tagged with: {}", name);
    }

    println!("\n🏷️  Top themes:");
    for theme in theme_listing(&stats, classifier.taxonomy())
        .iter()
        .filter(|t| t.count > 0)
        .take(10)
    {
        println!("   {:<24} {}", theme.name, theme.count);
    }

    println!("\n📅 Busiest years:");
    for (year, count) in top_years(&stats, 10) {
        println!("   {}  {}", year, count);
    }

    Ok(())
}

fn cmd_themes(args: &CatalogArgs) -> CmdResult {
    let (store, classifier) = open_tagged(args)?;

    for theme in theme_listing(&store.stats(), classifier.taxonomy()) {
        println!("{:>5}  {}", theme.count, theme.name);
    }
    Ok(())
}

fn cmd_keywords(args: &CatalogArgs, top: usize) -> CmdResult {
    let (store, classifier) = open_tagged(args)?;
    let stats = store.stats();

    println!("🔥 Most frequent keywords:");
    for (keyword, count) in keyword_frequencies(store.recordings(), top) {
        println!("   • {}: {} times", keyword, count);
    }

    println!("\n📈 Theme coverage:");
    for theme in theme_listing(&stats, classifier.taxonomy())
        .iter()
        .filter(|t| t.count > 0)
    {
        let percentage = coverage_percent(theme.count, stats.total_count);
        println!("   • {}: {} sermons ({:.1}%)", theme.name, theme.count, percentage);
    }

    Ok(())
}

fn cmd_taxonomy(args: &CatalogArgs, action: TaxonomyAction) -> CmdResult {
    match action {
        TaxonomyAction::Export { output } => {
            let taxonomy = args.taxonomy_source().load()?;
            write_output(&taxonomy.to_json()?, output.as_deref())?;
        }

        TaxonomyAction::Validate { file } => {
            eprintln!("✔️  Validating: {}", file.display());
            let taxonomy = Taxonomy::from_file(&file)?;
            eprintln!(
                "✅ '{}' v{} is valid ({} themes)",
                taxonomy.name,
                taxonomy.version,
                taxonomy.themes.len()
            );
        }
    }
    Ok(())
}

fn cmd_relocate(args: &CatalogArgs, base_url: &str) -> CmdResult {
    let mut store = CatalogStore::open(&args.catalog)?;
    let changed = store.relocate(base_url);
    store.save()?;

    eprintln!("✅ Updated {} of {} location references", changed, store.len());
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> CmdResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
