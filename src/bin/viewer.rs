//! Interactive heatmap viewer (requires `--features egui`).
//!
//! Usage:
//!   cargo run --features egui --bin phyloscope-view -- <payload.json>
//!   cargo run --features egui --bin phyloscope-view -- --service <url> --taxids 9606,10090

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;

use phyloscope::client::ExplorerClient;
use phyloscope::egui_app::ExplorerApp;
use phyloscope::model::{ComparisonPayload, PayloadDoc};
use phyloscope::parser::{self, CatalogEntry, ServiceResponse};

use eframe::egui;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore a phylome co-occurrence heatmap interactively", long_about = None)]
struct Args {
    /// Payload JSON file or .phb binary cache. If omitted, the payload is
    /// fetched from --service
    #[arg(value_name = "PAYLOAD_FILE", required_unless_present = "service")]
    payload_file: Option<String>,

    /// Base URL of the phylo-explorer data service. Enables the refinement
    /// filter bar and the suggestion catalog
    #[arg(long)]
    service: Option<String>,

    /// Taxon ids for the initial service query (with --service and no file)
    #[arg(long, value_delimiter = ',')]
    taxids: Vec<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let client = args
        .service
        .as_deref()
        .map(ExplorerClient::new)
        .transpose()?;

    let payload: ComparisonPayload = if let Some(file) = &args.payload_file {
        let path = Utf8PathBuf::from(file);
        if path.extension() == Some("phb") {
            PayloadDoc::load_from_binary(path.as_std_path())
                .with_context(|| format!("Failed to load {}", path))?
                .payload
        } else {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("Open {}", path))?;
            match parser::parse_response(&text)
                .with_context(|| format!("Failed to parse {}", path))?
            {
                ServiceResponse::Payload(payload) => payload,
                ServiceResponse::Error(msg) => bail!("Service error: {}", msg),
            }
        }
    } else {
        // required_unless_present guarantees a service URL here
        let client = client
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No payload file and no service URL"))?;
        match client.query(&args.taxids, false)? {
            ServiceResponse::Payload(payload) => payload,
            ServiceResponse::Error(msg) => bail!("Service error: {}", msg),
        }
    };

    let catalog: Vec<CatalogEntry> = match client.as_ref() {
        Some(client) => client
            .fetch_catalog()
            .context("Failed to fetch the species catalog")?,
        None => Vec::new(),
    };

    let app = ExplorerApp::new(payload, catalog, client);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "phyloscope heatmap viewer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
