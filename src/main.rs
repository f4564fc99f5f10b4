use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use studplan::{
    report::{financial_table, KeyFigures, ProposalDocument},
    scenario::ScenarioLoader,
    store::ProposalStore,
    try_project,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Cattle stud farm proposal projections")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the 10-year projection for a proposal file
    Project {
        /// Path to the proposal YAML or JSON file
        #[arg(long, default_value = "scenarios/alldays_bonsmara.yaml")]
        proposal: PathBuf,

        /// Emit the full summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the printable proposal document
    Export {
        #[arg(long, default_value = "scenarios/alldays_bonsmara.yaml")]
        proposal: PathBuf,

        /// Output file for the document
        #[arg(long)]
        out: PathBuf,

        /// Optional plain-text narrative to include
        #[arg(long)]
        narrative: Option<PathBuf>,
    },

    /// Serve the proposal store over HTTP
    Serve {
        /// Proposal store file
        #[arg(long, default_value = "proposals.json")]
        store: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");

    match cli.cmd {
        Command::Project { proposal, json } => {
            let proposal = loader.load(&proposal)?;
            let summary = try_project(&proposal.input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", KeyFigures::new(&proposal, &summary).render());
                println!();
                print!("{}", financial_table(&summary.financials));
            }
        }
        Command::Export {
            proposal,
            out,
            narrative,
        } => {
            let proposal = loader.load(&proposal)?;
            let summary = try_project(&proposal.input)?;
            let narrative = match narrative {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read narrative {}", path.display()))?,
                None => String::new(),
            };
            let figures = KeyFigures::new(&proposal, &summary);
            let document = ProposalDocument {
                farm_name: &proposal.farm_name,
                narrative: &narrative,
                financials: &summary.financials,
                key_figures: Some(&figures),
                generated_on: Local::now().date_naive(),
            };
            fs::write(&out, document.render())
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote proposal for '{}' to {}", proposal.farm_name, out.display());
        }
        Command::Serve { store, host, port } => {
            let store = ProposalStore::open(&store)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::run(WebServerConfig { store, host, port }))?;
        }
    }
    Ok(())
}
