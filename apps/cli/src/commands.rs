//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use bestium_docs_core::pipeline::{BuildConfig, BuildResult, ProgressReporter, prepare};
use bestium_docs_markdown::render_page;
use bestium_docs_shared::{DocsConfig, config_file_path, init_config, load_config};
use bestium_docs_versions::ResolverOptions;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Build the Bestium documentation site.
#[derive(Parser)]
#[command(
    name = "bestium-docs",
    version,
    about = "Build the Bestium documentation site with live version constants and javadoc links.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the site config file.
    #[arg(long, global = true, env = "BESTIUM_DOCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Output format for `versions`.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the whole site.
    Build {
        /// Content directory (overrides `build.content_dir`).
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output directory (overrides `build.out_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Use placeholder versions instead of querying GitHub.
        #[arg(long)]
        offline: bool,
    },

    /// Render a single Markdown page body to stdout.
    Render {
        /// Markdown file to render.
        file: PathBuf,

        /// Use placeholder versions instead of querying GitHub.
        #[arg(long)]
        offline: bool,
    },

    /// Print the resolved version constants.
    Versions {
        /// Use placeholder versions instead of querying GitHub.
        #[arg(long)]
        offline: bool,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bestium_docs=info",
        1 => "bestium_docs=debug",
        _ => "bestium_docs=trace",
    };

    // Prefix match: also covers the bestium_docs_* library crates.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = config_file_path(cli.config.as_deref());

    match cli.command {
        Command::Build {
            content,
            out,
            offline,
        } => cmd_build(&config_path, content, out, offline).await,
        Command::Render { file, offline } => cmd_render(&config_path, &file, offline).await,
        Command::Versions { offline, format } => cmd_versions(&config_path, offline, format).await,
        Command::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(&config_path, force),
            ConfigAction::Show => cmd_config_show(&config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Directory config-relative paths resolve against.
fn site_root(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolver_for(docs: &DocsConfig, offline: bool) -> ResolverOptions {
    let mut resolver = ResolverOptions::from(&docs.versions);
    resolver.offline |= offline;
    resolver
}

async fn cmd_build(
    config_path: &Path,
    content: Option<PathBuf>,
    out: Option<PathBuf>,
    offline: bool,
) -> Result<()> {
    let docs = load_config(config_path)?;
    let mut build = BuildConfig::from_docs(docs, &site_root(config_path));

    // CLI flags override config values
    if let Some(content) = content {
        build.content_dir = content;
    }
    if let Some(out) = out {
        build.out_dir = out;
    }
    build.resolver.offline |= offline;

    info!(
        content = %build.content_dir.display(),
        out = %build.out_dir.display(),
        offline = build.resolver.offline,
        "building site"
    );

    let reporter = CliProgress::new();
    let result = bestium_docs_core::pipeline::build_site(&build, &reporter).await?;

    println!();
    println!("  Site built successfully!");
    println!("  Pages:    {}", result.page_count);
    println!("  Bestium:  {}", result.versions.latest_bestium);
    println!("  Userdev:  {}", result.versions.latest_userdev);
    println!("  Paper:    {}", result.versions.bestium_paper);
    println!("  Output:   {}", result.out_dir.display());
    if !result.missing_slugs.is_empty() {
        println!("  Missing:  {}", result.missing_slugs.join(", "));
    }
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_render(config_path: &Path, file: &Path, offline: bool) -> Result<()> {
    let docs = load_config(config_path)?;
    let source = std::fs::read_to_string(file)
        .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?;

    let prepared = prepare(&docs, &resolver_for(&docs, offline)).await?;
    let page = render_page(&source, &prepared.pipeline);

    print!("{}", page.html);
    Ok(())
}

async fn cmd_versions(config_path: &Path, offline: bool, format: OutputFormat) -> Result<()> {
    let docs = load_config(config_path)?;
    let prepared = prepare(&docs, &resolver_for(&docs, offline)).await?;

    match format {
        OutputFormat::Text => {
            for (name, value) in prepared.constants.iter() {
                println!("{name} = {value}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&prepared.constants)?);
        }
    }

    Ok(())
}

fn cmd_config_init(config_path: &Path, force: bool) -> Result<()> {
    let path = init_config(config_path, force)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_rendered(&self, slug: &str, current: usize, total: usize) {
        let slug = if slug.is_empty() { "/" } else { slug };
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {slug}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
