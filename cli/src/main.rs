//! deck-export - render a slide deck JSON file to PDF

use anyhow::{Context, Result};
use clap::Parser;
use deck_export::{
    DeckExporter, ExportSettings, FsAssetResolver, NullRasterizer, PlainHighlighter,
    SettingsManager,
};
use deck_model::Deck;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "deck-export", version, about = "Export a slide deck to PDF")]
struct Cli {
    /// Deck JSON file
    deck: PathBuf,

    /// Output file; defaults to the deck path with a .pdf extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory asset paths are resolved against; defaults to the deck's directory
    #[arg(long, env = "DECK_EXPORT_ASSETS")]
    assets: Option<PathBuf>,

    /// Export settings JSON file
    #[arg(long, env = "DECK_EXPORT_SETTINGS")]
    settings: Option<PathBuf>,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    /// Document title, overriding the deck title
    #[arg(long)]
    title: Option<String>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,
}

impl Cli {
    fn load_settings(&self) -> Result<ExportSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let mut manager = SettingsManager::new(path);
                manager
                    .load_sync()
                    .with_context(|| format!("reading settings {}", path.display()))?
                    .clone()
            }
            None => ExportSettings::default(),
        };
        if self.no_compress {
            settings.pdf.compress = false;
        }
        if let Some(title) = &self.title {
            settings.pdf.title = Some(title.clone());
        }
        Ok(settings)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.deck.with_extension("pdf"))
    }

    fn asset_root(&self) -> PathBuf {
        self.assets.clone().unwrap_or_else(|| {
            self.deck
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = cli.load_settings()?;

    if cli.print_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let json = tokio::fs::read_to_string(&cli.deck)
        .await
        .with_context(|| format!("reading deck {}", cli.deck.display()))?;
    let deck = Deck::from_json(&json).with_context(|| format!("parsing {}", cli.deck.display()))?;

    let output = cli.output_path();
    let asset_root = cli.asset_root();
    tracing::info!(
        "Exporting {} slides from {} (assets in {})",
        deck.slides.len(),
        cli.deck.display(),
        asset_root.display()
    );

    let exporter = DeckExporter::new(FsAssetResolver::new(asset_root), PlainHighlighter, NullRasterizer)
        .with_settings(settings);
    exporter
        .export_to_path(&deck, &output)
        .await
        .with_context(|| format!("exporting to {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}
