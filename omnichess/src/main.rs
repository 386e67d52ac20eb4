mod config;
mod session;

use std::sync::Arc;

use clap::Parser;
use oracle_client::{HttpOracle, OracleService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::OracleConfig;
use session::{GamePhase, SessionHandle, SessionSnapshot};

#[derive(Parser)]
#[command(
    name = "omnichess",
    about = "Extensible chess against an LLM oracle: standard moves are checked locally, everything else is narrated."
)]
struct Args {
    /// Starting position notation (placement and side to move; further
    /// FEN fields are accepted on standard boards)
    #[arg(long)]
    fen: Option<String>,
    /// Oracle model override (also OMNICHESS_MODEL)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing with file output in logs directory
    let log_dir = "logs";
    std::fs::create_dir_all(log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(log_dir, "omnichess");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut oracle_config = OracleConfig::from_env()?;
    if let Some(model) = args.model {
        oracle_config.model = model;
    }
    tracing::info!(model = %oracle_config.model, "Omnichess starting up");

    let oracle: Arc<dyn OracleService> = Arc::new(HttpOracle::new(
        oracle_config.api_key,
        oracle_config.model,
        oracle_config.endpoint,
    )?);
    let (handle, initial) = session::spawn_session(args.fen, oracle)?;

    println!("Omnichess");
    println!("Type a move (e4, Nf3, e2e4) or any directive (\"my rook digs a moat\").");
    println!("Commands: new [fen], board, quit");
    println!("Debug logs: logs/omnichess.YYYY-MM-DD");
    println!();
    render(&initial);

    run_repl(&handle).await?;

    handle.shutdown().await;
    tracing::info!("Omnichess shutting down");
    Ok(())
}

async fn run_repl(handle: &SessionHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seen_messages = 0usize;

    loop {
        print_prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        let snapshot = match input {
            "" => continue,
            "quit" | "exit" => break,
            "board" => {
                seen_messages = usize::MAX;
                handle.get_snapshot().await?
            }
            _ => {
                let result = if input == "new" || input.starts_with("new ") {
                    let fen = input["new".len()..].trim();
                    seen_messages = 0;
                    handle
                        .reset((!fen.is_empty()).then(|| fen.to_string()))
                        .await
                } else {
                    handle.submit_directive(input.to_string()).await
                };
                match result {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                }
            }
        };

        for message in snapshot.messages.iter().skip(seen_messages.min(snapshot.messages.len())) {
            println!("  {message}");
        }
        seen_messages = snapshot.messages.len();
        println!();
        render(&snapshot);

        if let GamePhase::Ended { ref reason, .. } = snapshot.phase {
            println!("Game over: {reason}");
            println!("Type 'new' for another game or 'quit' to exit.");
        }
    }
    Ok(())
}

fn render(snapshot: &SessionSnapshot) {
    print!("{}", board::render_board(&snapshot.board, &snapshot.terrain));
    println!("{} to move.", snapshot.side_to_move);
}

fn print_prompt() -> anyhow::Result<()> {
    use std::io::Write;
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
