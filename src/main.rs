//! # Labelkit CLI
//!
//! Command-line interface for the label layout engine.
//!
//! ## Usage
//!
//! ```bash
//! # Run the template service
//! labelkit serve --listen 0.0.0.0:3000 --store components.json
//!
//! # Check a template for overlapping components
//! labelkit check label.json
//!
//! # Render a template to PNG
//! labelkit preview label.json --png label.png
//!
//! # Emit the data-driven shipping label
//! labelkit sample --out label.json
//!
//! # Save a template to, or list templates from, a running service
//! labelkit push label.json --url http://localhost:3000
//! labelkit library --url http://localhost:3000
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

use labelkit::{
    LabelError, TemplateClient, TemplatePayload,
    layout::{LayoutSettings, canvas::new_template_id},
    preview::render_png,
    server::{ServerConfig, serve},
    template::{
        from_payload, group_rows,
        sample::{Shipment, shipping_label},
    },
};

/// Labelkit - label layout engine and template service
#[derive(Parser, Debug)]
#[command(name = "labelkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the template storage service
    Serve {
        /// Address to listen on
        #[arg(long, env = "LABELKIT_LISTEN", default_value = "0.0.0.0:3000")]
        listen: String,

        /// Origin allowed by CORS ("*" for any)
        #[arg(long, env = "LABELKIT_ALLOWED_ORIGIN", default_value = "*")]
        allowed_origin: String,

        /// JSON datastore file (in-memory when omitted)
        #[arg(long, env = "LABELKIT_STORE", value_name = "FILE")]
        store: Option<PathBuf>,
    },

    /// Load a template payload and report overlapping components
    Check {
        /// Template payload JSON
        payload: PathBuf,
    },

    /// Render a template payload to PNG
    Preview {
        /// Template payload JSON
        payload: PathBuf,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,
    },

    /// Emit the data-driven shipping label payload
    Sample {
        /// Output file (stdout when omitted)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Template id (a new UUID when omitted)
        #[arg(long)]
        template_id: Option<String>,
    },

    /// Save a template payload to a running service
    Push {
        /// Template payload JSON
        payload: PathBuf,

        /// Service base URL
        #[arg(long, env = "LABELKIT_URL", default_value = "http://localhost:3000")]
        url: String,
    },

    /// List the templates stored by a running service
    Library {
        /// Service base URL
        #[arg(long, env = "LABELKIT_URL", default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("labelkit=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            allowed_origin,
            store,
        } => {
            serve(ServerConfig {
                listen_addr: listen,
                allowed_origin,
                store_path: store,
            })
            .await
        }

        Commands::Check { payload } => {
            let payload = read_payload(&payload)?;
            let loaded = from_payload(&payload, LayoutSettings::default())?;
            println!(
                "{} ({}): {} component(s) on a {}x{} canvas",
                loaded.name,
                loaded.canvas.template_id(),
                loaded.canvas.len(),
                loaded.viewport.width,
                loaded.viewport.height
            );
            let overlaps = loaded.canvas.overlapping_pairs();
            if overlaps.is_empty() {
                println!("No overlapping components");
                return Ok(());
            }
            println!("{} overlapping pair(s):", overlaps.len());
            for (a, b) in &overlaps {
                println!("  {} overlaps {}", a, b);
            }
            std::process::exit(2);
        }

        Commands::Preview { payload, png } => {
            let payload = read_payload(&payload)?;
            let bytes = render_png(&payload)?;
            std::fs::write(&png, bytes)?;
            println!("Saved preview to {}", png.display());
            Ok(())
        }

        Commands::Sample { out, template_id } => {
            let template_id = template_id.unwrap_or_else(new_template_id);
            let payload = shipping_label(&Shipment::example(), &template_id);
            let json = serde_json::to_string_pretty(&payload)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Saved {} to {}", payload.template.name, path.display());
                }
                None => println!("{}", json),
            }
            Ok(())
        }

        Commands::Push { payload, url } => {
            let payload = read_payload(&payload)?;
            let client = TemplateClient::new(url)?;
            let saved = client.save(&payload).await?;
            println!("{}: {} component(s)", saved.message, saved.count);
            Ok(())
        }

        Commands::Library { url } => {
            let client = TemplateClient::new(url)?;
            let groups = group_rows(client.list().await?);
            if groups.is_empty() {
                println!("No saved templates");
            }
            for group in &groups {
                println!("{} ({} component(s))", group.display_name(), group.components.len());
                for c in &group.components {
                    println!("  {} {}", c.component_id, c.name);
                }
            }
            Ok(())
        }
    }
}

fn read_payload(path: &Path) -> Result<TemplatePayload, LabelError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
