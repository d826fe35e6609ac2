use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use async_lsp::lsp_types::{
    DidOpenTextDocumentParams, Position, TextDocumentIdentifier, TextDocumentItem, Url,
};
use clap::{Parser, Subcommand};
use ra_companion::{
    client::{AnalyzerClient, AnalyzerTransport, ServerEvent},
    error::{Error, LspError, Result},
    lsp_ext::{
        AnalyzerStatus, AnalyzerStatusParams, MemoryUsage, Runnables, RunnablesParams,
        ViewSyntaxTree, ViewSyntaxTreeParams,
    },
    runnables::invocation,
};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Parser)]
#[command(name = "ra-companion")]
#[command(about = "Standalone companion client for rust-analyzer's LSP extensions")]
struct Cli {
    /// Analyzer server binary to spawn
    #[arg(long, global = true, default_value = "rust-analyzer")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the analyzer's status report, optionally scoped to one file
    Status { file: Option<PathBuf> },
    /// Print the analyzer's memory usage breakdown
    Memory,
    /// Print the syntax tree of a file
    SyntaxTree { file: PathBuf },
    /// List the runnables of a file as resolved command lines
    Runnables {
        file: PathBuf,
        /// Zero-based cursor line to scope the query to
        #[arg(long)]
        line: Option<u32>,
        /// Zero-based cursor column, used together with --line
        #[arg(long, default_value_t = 0)]
        column: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ra_companion=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (client, mut events) = AnalyzerClient::spawn(&cli.server, &[])?;
    client.initialize().await?;

    match cli.command {
        Commands::Status { file } => {
            let text_document = match file {
                Some(path) => Some(TextDocumentIdentifier {
                    uri: open_file(&client, &path).await?,
                }),
                None => None,
            };
            wait_for_quiescence(&mut events, Duration::from_secs(30)).await;

            let status = client
                .request::<AnalyzerStatus>(AnalyzerStatusParams { text_document })
                .await?;
            println!("{status}");
        }
        Commands::Memory => {
            wait_for_quiescence(&mut events, Duration::from_secs(30)).await;

            let report = client.request::<MemoryUsage>(()).await?;
            println!("{report}");
        }
        Commands::SyntaxTree { file } => {
            let uri = open_file(&client, &file).await?;
            wait_for_quiescence(&mut events, Duration::from_secs(30)).await;

            let tree = client
                .request::<ViewSyntaxTree>(ViewSyntaxTreeParams {
                    text_document: TextDocumentIdentifier { uri },
                })
                .await?;
            println!("{tree}");
        }
        Commands::Runnables { file, line, column } => {
            let uri = open_file(&client, &file).await?;
            wait_for_quiescence(&mut events, Duration::from_secs(30)).await;

            let runnables = client
                .request::<Runnables>(RunnablesParams {
                    text_document: TextDocumentIdentifier { uri },
                    position: line.map(|line| Position::new(line, column)),
                })
                .await?;

            if runnables.is_empty() {
                println!("No runnables found");
            }
            for runnable in &runnables {
                let inv = invocation(runnable);
                println!("{}: {}", runnable.label, inv.display_line());
            }
        }
    }

    Ok(())
}

/// Read a file from disk and open it in the server. Returns its URI.
async fn open_file(client: &AnalyzerClient, path: &Path) -> Result<Url> {
    let canonical = fs::canonicalize(path)?;
    let text = fs::read_to_string(&canonical)?;

    let uri = Url::from_file_path(&canonical).map_err(|()| {
        Error::Lsp(LspError::InvalidRequest(format!(
            "Not an absolute file path: {}",
            canonical.display()
        )))
    })?;

    client
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "rust".to_string(),
                version: 0,
                text,
            },
        })
        .await?;

    Ok(uri)
}

/// Block until the server reports a quiescent status, or the timeout runs
/// out. Queries sent before quiescence see a half-loaded workspace.
async fn wait_for_quiescence(events: &mut UnboundedReceiver<ServerEvent>, timeout: Duration) {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ServerEvent::Status(status)) if status.quiescent => {
                    tracing::debug!("Server is quiescent");
                    return;
                }
                Some(_) => {}
                None => return,
            },
            () = &mut deadline => {
                tracing::warn!("Timed out waiting for the server to settle");
                return;
            }
        }
    }
}
