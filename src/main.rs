use clap::{Parser, Subcommand};
use kiosk_cards::config::{self, KioskConfig};
use kiosk_cards::feed::{FeedFormat, FeedLoader, SourceRef};
use kiosk_cards::html::{self, HostLayout, HtmlDocument, PageSettings};
use kiosk_cards::model::FeedModel;
use kiosk_cards::output::{self, TextTarget};
use kiosk_cards::view::{RenderTarget, ViewError, ViewRenderer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Feed selection shared by commands that load.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Feed URL or path (overrides feed.source)
    #[arg(long)]
    source: Option<String>,

    /// Feed format (overrides feed.format)
    #[arg(long, value_enum)]
    format: Option<FeedFormat>,
}

/// Overlay state to render, for previews.
#[derive(clap::Args, Clone)]
struct OpenArgs {
    /// Render with the card at this position (1-based) open
    #[arg(long, value_name = "N")]
    open: Option<usize>,

    /// Also start the open card's video
    #[arg(long, requires = "open")]
    video: bool,
}

fn version_string() -> &'static str {
    if env!("KIOSK_RELEASE_BUILD") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("KIOSK_GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "kiosk-cards")]
#[command(about = "Build a kiosk page of video cards from a spreadsheet or JSON feed")]
#[command(long_about = "\
Build a kiosk page of video cards from a spreadsheet or JSON feed

The feed is a list of rows. The first column (CSV) or the Title field (JSON)
says what a row is:

  LogoLink / LogoURL               logo image URL
  BackgroundLink / BackgroundURL   background image URL
  Card1, Card2, ...                one card each, shown in row order

CSV card rows:   CardN, title, thumbnail URL, embed code, description
JSON card rows:  Title, CardTitle, LinkURL (thumbnail), ShortDescription,
                 Description, EmbedCode

Other rows are ignored. Missing cells are empty.

Run 'kiosk-cards gen-config' to generate a documented kiosk.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "kiosk.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the feed and write the kiosk page
    Build {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        open: OpenArgs,
    },
    /// Load the feed and list what the page would show
    Check {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        open: OpenArgs,
    },
    /// Print a stock kiosk.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Build { source, open } => {
            let config = config::load_config(&cli.config)?;
            let source = resolve_source(&config, &source)?;
            // Nothing is written unless the load succeeds; a previous page stays as it was.
            let model = load(&config, &source)?;
            let card_count = model.cards.len();

            let document = HtmlDocument::new(PageSettings::from_config(&config), HostLayout::default());
            let mut view = ViewRenderer::new(document, config.display.view_options());
            render(&mut view, model, &open)?;

            let page = html::write_page(view.target(), &cli.output)?;
            output::print_build_output(&page, card_count);
        }
        Command::Check { source, open } => {
            let config = config::load_config(&cli.config)?;
            let source = resolve_source(&config, &source)?;
            let model = load(&config, &source)?;

            let mut view = ViewRenderer::new(TextTarget::new(), config.display.view_options());
            render(&mut view, model, &open)?;
            output::print_check_output(&source, view.target());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Command-line source wins over the config file.
fn resolve_source(config: &KioskConfig, args: &SourceArgs) -> CliResult<SourceRef> {
    let location = args.source.as_deref().unwrap_or(&config.feed.source);
    if location.trim().is_empty() {
        return Err("no feed source: pass --source or set feed.source in kiosk.toml".into());
    }
    let format = args.format.unwrap_or(config.feed.format);
    Ok(SourceRef::new(location, format)?)
}

fn load(config: &KioskConfig, source: &SourceRef) -> CliResult<FeedModel> {
    let loader = FeedLoader::new(&config.feed.fetch_options())?;
    Ok(loader.fetch_and_parse(source)?)
}

fn render<T: RenderTarget>(view: &mut ViewRenderer<T>, model: FeedModel, open: &OpenArgs) -> CliResult<()> {
    let (site, cards) = model.into_parts();
    view.apply_model(site, cards);

    let Some(position) = open.open else {
        return Ok(());
    };
    let card_count = view.cards().len();
    position
        .checked_sub(1)
        .and_then(|index| view.open_card_at(index).ok())
        .ok_or_else(|| format!("--open {position}: the feed has {card_count} cards"))?;

    if open.video {
        if let Some(card) = view.overlay().card().cloned() {
            match view.open_video(card) {
                // Already logged by the renderer; the page still builds.
                Ok(()) | Err(ViewError::MissingEmbed { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(())
}
