use eventdesk::client::{EventService, HttpEventService};
use eventdesk::config::Config;
use eventdesk::logging;
use eventdesk::model::EventQuery;

use anyhow::Result;
use std::env;
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    println!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn print_help() {
    println!("eventdesk - Event delivery admin console");
    println!("----------------------------------------");
    println!("Usage: eventdesk [OPTIONS]");
    println!();

    if let Ok(path) = Config::get_path_string() {
        println!("Configuration File: {}", path);
    }

    println!();
    println!("Config Options:");
    println!("  api_url = \"https://.../api/\"");
    println!("  api_token = \"...\" (Optional)");
    println!("  allow_insecure_certs = false");
    println!("  default_sort = \"-created_at\" (created_at, event_name, -event_name, start_date, -start_date)");
    println!("  sidebar_collapsed = false");
    println!("  log_level = \"info\"");
    println!();
}

// First run: ask for the connection, check it against the server, save it.
async fn first_run_setup() -> Result<Config> {
    println!("Welcome to eventdesk. Config not found.");
    println!("Please set up your API connection.");

    let api_url = prompt("API base URL (e.g. https://admin.example.com/api/):")?;
    let token = prompt("API token (leave empty for none):")?;
    let api_token = (!token.is_empty()).then_some(token);

    println!("Testing connection...");
    let check = async {
        let client = HttpEventService::new(&api_url, api_token.as_deref(), false)?;
        client.get_events(&EventQuery::default()).await.map(|_| ())
    }
    .await;

    if let Err(e) = check {
        eprintln!("\nERROR: Connection Failed!");
        eprintln!("Reason: {}", e);
        std::process::exit(1);
    }

    println!("Success! Saving configuration...");
    let config = Config {
        api_url,
        api_token,
        ..Config::default()
    };
    config.save()?;
    if let Ok(path) = Config::get_path_string() {
        println!("Config saved to: {}", path);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_help();
        return Ok(());
    }

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(_) => first_run_setup().await?,
    };

    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    eventdesk::tui::run(config).await
}
