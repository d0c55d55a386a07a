use clap::Parser;
use human_mcp::app::App;
use human_mcp::config::Config;
use human_mcp::mcp::server::McpServer;
use human_mcp::services::logger::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "human-mcp", version, about = "HUMAN Security MCP server (stdio)")]
struct Cli {
    /// error, warn, info or debug. Overrides LOG_LEVEL.
    #[arg(long)]
    log_level: Option<String>,

    /// Per-request upstream timeout. Overrides HTTP_TIMEOUT_MS.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the tools the current credentials enable, then exit.
    #[arg(long)]
    list_tools: bool,
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(level) = cli.log_level.as_deref() {
        config = config.with_log_level(LogLevel::parse(level));
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    let app = App::initialize(config)?;
    if cli.list_tools {
        for tool in app.list_tools() {
            println!("{}\t{}", tool.name, tool.title);
        }
        return Ok(());
    }

    McpServer::new(app).run_stdio().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("human-mcp: {}", err);
        std::process::exit(1);
    }
}
