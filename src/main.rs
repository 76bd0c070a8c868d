use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;

use phyloscope::client::ExplorerClient;
use phyloscope::layout::{
    CharWidthMeasurer, LayoutConfig, elbow_paths, layout_dendrogram, layout_matrix,
    measure_row_labels,
};
use phyloscope::model::{ComparisonPayload, PanelSet, PayloadDoc};
use phyloscope::parser::{self, ServiceResponse};

#[derive(Parser, Debug)]
#[command(author, version, about = "Parse phylo-explorer comparison payloads and print a layout summary as JSON", long_about = None)]
struct Cli {
    /// Payload JSON file or .phb binary cache
    #[arg(value_name = "PAYLOAD_FILE", required_unless_present = "url")]
    payload_file: Option<String>,

    /// Fetch the payload from a phylo-explorer service URL instead of a file
    #[arg(long, conflicts_with = "payload_file")]
    url: Option<String>,

    /// Taxon ids for the service query (used with --url)
    #[arg(long, value_delimiter = ',')]
    taxids: Vec<u32>,

    /// Write the loaded payload to a .phb binary cache file
    #[arg(long, value_name = "FILE")]
    binary_out: Option<Utf8PathBuf>,
}

fn load_payload(cli: &Cli) -> Result<ComparisonPayload> {
    if let Some(url) = &cli.url {
        let client = ExplorerClient::new(url.as_str())?;
        return match client.query(&cli.taxids, false)? {
            ServiceResponse::Payload(payload) => Ok(payload),
            ServiceResponse::Error(msg) => bail!("Service error: {}", msg),
        };
    }
    // required_unless_present guarantees the file argument here
    let path = Utf8PathBuf::from(cli.payload_file.as_deref().unwrap_or_default());
    if path.extension() == Some("phb") {
        let doc = PayloadDoc::load_from_binary(path.as_std_path())
            .with_context(|| format!("Failed to load {}", path))?;
        Ok(doc.payload)
    } else {
        let text =
            std::fs::read_to_string(&path).with_context(|| format!("Open {}", path))?;
        match parser::parse_response(&text).with_context(|| format!("Failed to parse {}", path))? {
            ServiceResponse::Payload(payload) => Ok(payload),
            ServiceResponse::Error(msg) => bail!("Service error: {}", msg),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let payload = load_payload(&cli)?;

    if let Some(out) = &cli.binary_out {
        PayloadDoc {
            payload: payload.clone(),
        }
        .save_to_binary(out.as_std_path())?;
    }

    let panels = PanelSet::for_payload(&payload);
    let cfg = LayoutConfig::default();
    let tree = layout_dendrogram(&payload.tree, payload.row_ids.len(), &cfg);
    let labels = measure_row_labels(
        &payload.row_ids,
        &payload.row_labels,
        &CharWidthMeasurer::default(),
    );
    let elbows = elbow_paths(&tree, &labels)?;

    let summary = serde_json::json!({
        "panels": payload.panels.len(),
        "visible_panel": panels.visible(),
        "rows": payload.row_ids.len(),
        "leaf_order": tree.leaf_order,
        "columns_per_panel": payload.panels.iter().map(|p| p.col_count()).collect::<Vec<_>>(),
        "cells_per_panel": payload.panels.iter()
            .map(|p| layout_matrix(&p.matrix, &cfg).len())
            .collect::<Vec<_>>(),
        "elbow_paths": elbows.iter().map(|e| e.to_svg()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
