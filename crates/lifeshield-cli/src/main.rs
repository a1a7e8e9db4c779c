mod display;

use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use lifeshield_ai::{ArtifactPaths, ArtifactStore, Predictor};
use lifeshield_api::AppState;
use lifeshield_core::RawRecord;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(name = "lifeshield", version, about = "Health-risk inference service")]
struct Cli {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Directory holding model, scaler and feature-column artifacts
    #[arg(long, env = "LIFESHIELD_ARTIFACTS", default_value = ".", global = true)]
    artifacts: PathBuf,

    /// Model artifact, overriding the one found in --artifacts
    #[arg(long, value_name = "FILE", global = true)]
    model: Option<PathBuf>,

    /// Scaler artifact, overriding the one found in --artifacts
    #[arg(long, value_name = "FILE", global = true)]
    scaler: Option<PathBuf>,

    /// Fallback feature-column list, overriding the one found in --artifacts
    #[arg(long, value_name = "FILE", global = true)]
    features: Option<PathBuf>,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths::in_dir(&self.artifacts);
        if let Some(model) = &self.model {
            paths.model = model.clone();
        }
        if let Some(scaler) = &self.scaler {
            paths.scaler = scaler.clone();
        }
        if let Some(features) = &self.features {
            paths.feature_columns = features.clone();
        }
        paths
    }

    /// Load artifacts and warm up; any failure here is a startup failure.
    fn predictor(&self) -> anyhow::Result<Predictor> {
        let paths = self.paths();
        let store = ArtifactStore::load(&paths).with_context(|| {
            format!(
                "loading artifacts (model {}, scaler {}, features {})",
                paths.model.display(),
                paths.scaler.display(),
                paths.feature_columns.display()
            )
        })?;
        Predictor::new(store).context("validating artifacts")
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Load and validate artifacts, then print the resolved schemas
    Check,
    /// Predict risk for one record read from a JSON file
    Predict {
        /// JSON file, or `-` for stdin
        #[arg(long, short, value_name = "FILE")]
        input: PathBuf,

        /// Also print the final row passed to the classifier
        #[arg(long)]
        show_row: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            let predictor = cli.artifacts.predictor()?;
            info!("lifeshield v{}", env!("CARGO_PKG_VERSION"));
            lifeshield_api::serve(AppState::ready(predictor), SocketAddr::new(host, port))
                .await
                .context("http server")?;
        }
        Command::Check => {
            let predictor = cli.artifacts.predictor()?;
            display::print_schema_card(predictor.artifacts());
        }
        Command::Predict { input, show_row } => {
            let predictor = cli.artifacts.predictor()?;
            let record = read_record(&input)?;

            if show_row {
                let row = predictor.final_row(&record)?;
                let artifacts = predictor.artifacts();
                let batch = row.to_record_batch(artifacts.model_schema())?;
                display::print_row(&batch, artifacts.scaler_schema())?;
            }

            let result = predictor.predict(&record)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn read_record(input: &Path) -> anyhow::Result<RawRecord> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };
    parse_record(&text)
}

/// Accept a bare feature object or a `{"features": {...}}` request body.
fn parse_record(text: &str) -> anyhow::Result<RawRecord> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    let features = match value {
        Value::Object(mut map)
            if map.len() == 1 && map.get("features").is_some_and(Value::is_object) =>
        {
            map.remove("features").unwrap_or_default()
        }
        obj @ Value::Object(_) => obj,
        _ => bail!("input must be a JSON object"),
    };
    serde_json::from_value(features)
        .context("feature values must be numbers, strings, booleans or null")
}
