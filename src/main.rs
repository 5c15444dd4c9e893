//! Entry point for the dbdie labeling console.

use std::io;
use std::path::PathBuf;

use dbdie_labeler::api::{self, ApiClient};
use dbdie_labeler::console::{self, Console};
use dbdie_labeler::labeling::LabelerSelector;
use dbdie_labeler::{config, logging};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let config = match &options.config_path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if options.write_config {
        let path = match options.config_path {
            Some(path) => path,
            None => config::config_path().map_err(|err| err.to_string())?,
        };
        config::save_to_path(&config, &path).map_err(|err| err.to_string())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }
    let start = config.start_fmt().map_err(|err| err.to_string())?;

    let launch = logging::Launch {
        host: config.api.host.clone(),
        start,
        verbose: options.verbose,
    };
    if let Err(err) = logging::init(&launch) {
        eprintln!("Logging disabled: {err}");
    }
    let crops = config.crop_resolver().map_err(|err| err.to_string())?;

    let client = ApiClient::new(&config.api.host, config.api_limits())
        .map_err(|err| err.to_string())?;
    tracing::info!(host = %client.base_url(), "Loading labels");
    let data = api::load_dataset(&client).map_err(|err| format!("Loading tables failed: {err}"))?;
    let catalogs =
        api::load_catalogs(&client).map_err(|err| format!("Loading catalogs failed: {err}"))?;
    let selector = LabelerSelector::new(data, catalogs, start).map_err(|err| err.to_string())?;

    let mut console = Console::new(selector, &client, crops);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console
        .run(stdin.lock(), &mut stdout)
        .map_err(|err| format!("Console I/O failed: {err}"))
}

#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    verbose: bool,
    write_config: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "-v" | "--verbose" => {
                options.verbose = true;
            }
            "--write-config" => {
                options.write_config = true;
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "dbdie-labeler",
        "",
        "Review and correct predicted match labels page by page.",
        "",
        "Usage:",
        "  dbdie-labeler [--config <path>] [--verbose]",
        "  dbdie-labeler [--config <path>] --write-config",
        "",
        "Options:",
        "  --config <path>   Config file (defaults to config.toml in the app folder).",
        "  -v, --verbose     Debug logging unless RUST_LOG is set.",
        "  --write-config    Save the effective settings (defaults filled in) and exit.",
        "",
        "Environment:",
        "  FASTAPI_HOST        Labels API host, overrides [api].host.",
        "  DBDIE_CONFIG_HOME   Replaces the OS config folder holding .dbdie.",
        "",
        console::help_text().as_str(),
    ]
    .join("\n")
}
