//! schemacol command-line entry point.

use clap::{Parser, Subcommand};
use schemacol_client::api_client::RestClient;
use schemacol_client::config::ClientConfig;
use schemacol_client::error::CliError;
use schemacol_client::filter::ColumnFilter;
use schemacol_client::telemetry::init_tracing;
use schemacol_core::{ColumnId, CreateSchemaColumn};
use std::path::{Path, PathBuf};

/// Manage schema column records on the ERP panel backend.
#[derive(Debug, Parser)]
#[command(name = "schemacol", author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (overrides SCHEMACOL_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// List columns, optionally filtered
    List {
        /// Only columns of this base category
        #[arg(long = "base")]
        base_category: Option<i64>,
        /// Only columns of this series
        #[arg(long)]
        series: Option<i64>,
    },
    /// Create a column from a JSON record file
    Create { record: PathBuf },
    /// Replace a column with the contents of a JSON record file
    Update { id: ColumnId, record: PathBuf },
    /// Delete a column
    Delete { id: ColumnId },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;
    init_tracing(&config)?;

    let client = RestClient::new(&config)?;
    tracing::debug!(base_url = client.base_url(), command = ?cli.command, "Running command");

    if let Err(err) = run(&client, cli.command).await {
        tracing::error!(error = %err, "Command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(client: &RestClient, command: Command) -> Result<(), CliError> {
    match command {
        Command::List {
            base_category,
            series,
        } => {
            let filter = ColumnFilter {
                base_category,
                series,
            };
            let columns = client.list(&filter).await?;
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }
        Command::Create { record } => {
            let data = read_record(&record)?;
            let column = client.create(&data).await?;
            println!("{}", serde_json::to_string_pretty(&column)?);
        }
        Command::Update { id, record } => {
            let data = read_record(&record)?;
            let column = client.update(id, &data).await?;
            println!("{}", serde_json::to_string_pretty(&column)?);
        }
        Command::Delete { id } => {
            client.remove(id).await?;
            tracing::info!(column_id = id, "Column deleted");
        }
    }
    Ok(())
}

/// Read a record file and push it through the same checks as the form.
fn read_record(path: &Path) -> Result<CreateSchemaColumn, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let data: CreateSchemaColumn = serde_json::from_str(&contents)?;
    let form = schemacol_core::ColumnForm {
        base_category: data.base_category,
        series: data.series,
        priority: data.priority,
        field: data.field,
        title: data.title,
        col_type: data.col_type,
        editable: data.editable.is_set(),
        required: data.required.is_set(),
        values: data.values.clone().unwrap_or_default(),
    };
    let mut validated = form.validate()?;
    // An absent `values` stays absent on the wire.
    validated.values = data.values;
    Ok(validated)
}
