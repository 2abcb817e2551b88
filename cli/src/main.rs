//! GI Notebook CLI: fetch resolved resource graphs from the notebook service
//! and read climate base stations from worldfile headers.
//!
//! Connection flags fall back to `GI_NOTEBOOK_*` environment variables, which
//! `config::load_and_apply` seeds from `.env` / XDG `config.toml` at startup.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ginotebook::{
    NotebookClient, NotebookConfig, NotebookError, ResourceRef, DEFAULT_API_ROOT, DEFAULT_HOSTNAME,
};

#[derive(Parser, Debug)]
#[command(name = "ginotebook")]
#[command(about = "GI Notebook client — fetch green infrastructure scenario graphs")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// GI Notebook hostname
    #[arg(long, env = "GI_NOTEBOOK_HOST", default_value = DEFAULT_HOSTNAME)]
    host: String,

    /// Service port (omit for the scheme default)
    #[arg(long, env = "GI_NOTEBOOK_PORT")]
    port: Option<i64>,

    /// API root path segment
    #[arg(long, env = "GI_NOTEBOOK_API_ROOT", default_value = DEFAULT_API_ROOT)]
    api_root: String,

    /// API token, sent as `Authorization: Token …`
    #[arg(long, env = "GI_NOTEBOOK_TOKEN")]
    token: Option<String>,

    /// Use plain HTTP instead of HTTPS
    #[arg(long)]
    http: bool,

    /// Skip TLS certificate verification
    #[arg(long)]
    no_verify: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a scenario and print the fully resolved graph as JSON
    Scenario {
        #[arg(value_name = "ID_OR_URL")]
        resource: String,
    },
    /// Fetch an instance with its template subtree
    Instance {
        #[arg(value_name = "ID_OR_URL")]
        resource: String,
    },
    /// Fetch a template with its elements
    Template {
        #[arg(value_name = "ID_OR_URL")]
        resource: String,
    },
    /// Fetch a single element
    Element {
        #[arg(value_name = "ID_OR_URL")]
        resource: String,
    },
    /// List climate base station files declared in a worldfile header
    BaseStations {
        worldfile: PathBuf,
        /// Ignore a missing or mismatched num_base_stations declaration
        #[arg(long)]
        lenient: bool,
    },
}

/// Numeric arguments are collection ids; anything else is taken as a full URL.
fn parse_resource(arg: &str) -> ResourceRef {
    match arg.parse::<u64>() {
        Ok(id) => ResourceRef::Id(id),
        Err(_) => ResourceRef::Url(arg.to_string()),
    }
}

fn client_from(args: &Args) -> Result<NotebookClient, NotebookError> {
    let mut config = NotebookConfig::new()
        .with_hostname(args.host.clone())
        .with_api_root(args.api_root.clone())
        .with_https(!args.http)
        .with_verify(!args.no_verify);
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(ref token) = args.token {
        config = config.with_auth_token(token.clone());
    }
    NotebookClient::new(config)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{s}");
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match &args.cmd {
        Command::Scenario { resource } => {
            let scenario = client_from(&args)?
                .get_scenario(parse_resource(resource))
                .await?;
            print_json(&scenario, args.pretty)?;
        }
        Command::Instance { resource } => {
            let instance = client_from(&args)?
                .get_instance(parse_resource(resource))
                .await?;
            print_json(&instance, args.pretty)?;
        }
        Command::Template { resource } => {
            let template = client_from(&args)?
                .get_template(parse_resource(resource))
                .await?;
            print_json(&template, args.pretty)?;
        }
        Command::Element { resource } => {
            let element = client_from(&args)?
                .get_element(parse_resource(resource))
                .await?;
            print_json(&element, args.pretty)?;
        }
        Command::BaseStations { worldfile, lenient } => {
            let stations = worldfile::climate_base_station_filenames(worldfile, !lenient)?;
            for station in &stations {
                println!("{station}");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Seed GI_NOTEBOOK_* from .env / XDG before clap reads the environment.
    if let Err(e) = config::load_and_apply("ginotebook", None) {
        eprintln!("warning: config load failed: {e}");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_argument_is_an_id() {
        assert!(matches!(parse_resource("42"), ResourceRef::Id(42)));
    }

    #[test]
    fn non_numeric_argument_is_a_url() {
        let rref = parse_resource("https://gi/api/gi_scenarios/42/");
        assert!(matches!(rref, ResourceRef::Url(u) if u.ends_with("/42/")));
    }

    #[test]
    fn args_parse_with_connection_flags() {
        let args = Args::try_parse_from([
            "ginotebook",
            "--host",
            "localhost",
            "--port",
            "8000",
            "--http",
            "scenario",
            "7",
        ])
        .unwrap();
        assert_eq!(args.host, "localhost");
        assert_eq!(args.port, Some(8000));
        assert!(args.http);
        assert!(matches!(args.cmd, Command::Scenario { ref resource } if resource == "7"));
    }
}
