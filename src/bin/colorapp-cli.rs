use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "colorapp-cli")]
#[command(about = "Query and reset the color gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a color through the gateway
    Color,
    /// Show current color ratios
    Stats,
    /// Reset the color history
    Clear,
    /// Check gateway liveness
    Ping,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Color => "/color",
            Commands::Stats => "/stats",
            Commands::Clear => "/color/clear",
            Commands::Ping => "/ping",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());
    let res = client.get(url).send().await?;

    if let Commands::Ping = cli.command {
        println!("{}", res.status());
        return Ok(());
    }
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
