//! ora-schema-extract CLI - Oracle DDL extraction for migration analysis.

use clap::{Args, Parser, Subcommand};
use ora_schema_extract::{
    scripts, Config, ConnectionConfig, ExtractError, ExtractionConfig, Extractor,
    OracleMetadataSource,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "ora-schema-extract")]
#[command(about = "Extract Oracle schema DDL and metadata for migration analysis")]
#[command(version)]
struct Cli {
    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConnectionArgs {
    /// Path to YAML configuration file (complete config; flags override)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Oracle host
    #[arg(long)]
    host: Option<String>,

    /// Oracle listener port
    #[arg(long, default_value = "1521")]
    port: u16,

    /// Oracle service name
    #[arg(long)]
    service: Option<String>,

    /// Oracle SID (use instead of --service)
    #[arg(long)]
    sid: Option<String>,

    /// Oracle username
    #[arg(long)]
    user: Option<String>,

    /// Oracle password
    #[arg(long)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract DDL and metadata from the configured schemas
    Run {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Comma-separated list of schemas to extract
        #[arg(long, value_delimiter = ',')]
        schemas: Vec<String>,

        /// Output directory for extracted files
        #[arg(long)]
        output: Option<PathBuf>,

        /// Comma-separated subset of object types to extract
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,
    },

    /// Generate a SQL*Plus extraction script instead of extracting
    SqlplusScript {
        /// Comma-separated list of schemas
        #[arg(long, required = true, value_delimiter = ',')]
        schemas: Vec<String>,

        /// Directory the script (and later the spooled files) live in
        #[arg(long, required = true)]
        output: PathBuf,
    },

    /// Generate a PL/SQL UTL_FILE export script instead of extracting
    PlsqlScript {
        /// Comma-separated list of schemas
        #[arg(long, required = true, value_delimiter = ',')]
        schemas: Vec<String>,

        /// Server-side directory path for the Oracle directory object
        #[arg(long, required = true)]
        output: PathBuf,
    },

    /// Test the database connection
    HealthCheck {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ExtractError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| ExtractError::Config(e.to_string()))?;

    match cli.command {
        Commands::Run {
            connection,
            schemas,
            output,
            types,
        } => {
            let config = resolve_run_config(&connection, schemas, output, types)?;
            info!(
                "Extracting {} schema(s) to {:?}",
                config.extraction.schemas.len(),
                config.extraction.output_dir
            );

            let source = OracleMetadataSource::connect(&config.connection).await?;
            let extractor = Extractor::new(config, Arc::new(source));
            let result = extractor.run().await?;

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                println!("{}", result.report);
                println!("\nExtraction completed!");
                println!("  Run ID: {}", result.run_id);
                println!("  Duration: {:.2}s", result.duration_seconds);
                println!(
                    "  Objects: {} extracted, {} failed",
                    result.objects_extracted, result.objects_failed
                );
                println!("  Manifest: {}", result.manifest_path.display());
            }
        }

        Commands::SqlplusScript { schemas, output } => {
            let script =
                scripts::generate_sqlplus_script(&schemas, &output.to_string_lossy());
            let path = output.join("extract_ddl.sql");
            std::fs::create_dir_all(&output)?;
            std::fs::write(&path, script)?;
            println!("SQL*Plus script generated: {}", path.display());
        }

        Commands::PlsqlScript { schemas, output } => {
            let script = scripts::generate_plsql_script(&schemas, &output.to_string_lossy());
            let path = output.join("extract_ddl_plsql.sql");
            std::fs::create_dir_all(&output)?;
            std::fs::write(&path, script)?;
            println!("PL/SQL script generated: {}", path.display());
        }

        Commands::HealthCheck { connection } => {
            let connection = resolve_connection(&connection)?;
            let start = std::time::Instant::now();
            let source = OracleMetadataSource::connect(&connection).await?;
            ora_schema_extract::MetadataSource::ping(&source).await?;
            println!(
                "Connection OK: {} ({}ms)",
                connection.connect_descriptor(),
                start.elapsed().as_millis()
            );
        }
    }

    Ok(())
}

/// Build the connection configuration from flags or a config file.
fn resolve_connection(args: &ConnectionArgs) -> Result<ConnectionConfig, ExtractError> {
    if let Some(ref path) = args.config {
        return Ok(Config::load(path)?.connection);
    }

    let host = args
        .host
        .clone()
        .ok_or_else(|| ExtractError::Config("--host is required (or use --config)".into()))?;
    let user = args
        .user
        .clone()
        .ok_or_else(|| ExtractError::Config("--user is required (or use --config)".into()))?;
    let password = args.password.clone().ok_or_else(|| {
        ExtractError::Config("--password is required (or use --config)".into())
    })?;
    if args.service.is_none() && args.sid.is_none() {
        return Err(ExtractError::Config(
            "--service or --sid is required".into(),
        ));
    }

    Ok(ConnectionConfig {
        host,
        port: args.port,
        service: args.service.clone(),
        sid: args.sid.clone(),
        user,
        password,
    })
}

/// Build the full run configuration, applying flag overrides on top of an
/// optional config file.
fn resolve_run_config(
    connection: &ConnectionArgs,
    schemas: Vec<String>,
    output: Option<PathBuf>,
    types: Option<Vec<String>>,
) -> Result<Config, ExtractError> {
    let mut config = match connection.config {
        Some(ref path) => Config::load(path)?,
        None => Config {
            connection: resolve_connection(connection)?,
            extraction: ExtractionConfig::default(),
        },
    };

    if !schemas.is_empty() {
        config.extraction.schemas = schemas;
    }
    if let Some(output) = output {
        config.extraction.output_dir = output;
    }
    if let Some(types) = types {
        config.extraction.object_types = Some(types);
    }

    config.validate()?;
    Ok(config)
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
