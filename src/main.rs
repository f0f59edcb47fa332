use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use codeintel_nav::host::{DocumentProvider, FileTree};
use codeintel_nav::session::{BufferEditor, SessionHost};
use codeintel_nav::workspace::{DocumentStore, FsFileTree};
use codeintel_nav::{Backend, Config, Navigator, TextPosition};

#[derive(Debug, Parser)]
#[command(name = "codeintel-nav", version, about)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. `debug`, `codeintel_nav=trace`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the language server on stdin/stdout (default).
    Serve,
    /// Resolve the definition at a position and print where it is.
    Goto {
        /// The file containing the reference.
        file: PathBuf,
        /// One-based line number.
        line: u32,
        /// One-based column number.
        column: u32,
        /// Project root to search (defaults to the current directory).
        #[arg(long)]
        root: Option<PathBuf>,
        /// Print the result as JSON instead of `path:line`.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout carries the LSP protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let (service, socket) = LspService::new(Backend::new);
            Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
                .serve(service)
                .await;
            ExitCode::SUCCESS
        }
        Command::Goto {
            file,
            line,
            column,
            root,
            json,
        } => match goto(file, line, column, root, json).await {
            Ok(location) => {
                println!("{}", location);
                ExitCode::SUCCESS
            }
            Err(message) => {
                eprintln!("{}", message);
                ExitCode::FAILURE
            }
        },
    }
}

async fn goto(
    file: PathBuf,
    line: u32,
    column: u32,
    root: Option<PathBuf>,
    json: bool,
) -> Result<String, String> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().map_err(|e| e.to_string())?,
    };
    let config = Config::load(Some(root.as_path())).map_err(|e| e.to_string())?;

    let text = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
    let store = Arc::new(DocumentStore::new());
    let document = store.open(&file, text);

    let files: Arc<dyn FileTree> = Arc::new(FsFileTree::new(root, config.search.skip_dirs.clone()));
    let documents: Arc<dyn DocumentProvider> = store;
    let navigator = Navigator::new(&config, files, documents.clone()).map_err(|e| e.to_string())?;

    let caret = TextPosition::new(line.saturating_sub(1), column.saturating_sub(1));
    let host = SessionHost::new(documents, BufferEditor::with_caret(document, caret));

    let navigation = navigator
        .handle_navigate(&host)
        .await
        .map_err(|e| e.to_string())?;
    if json {
        return serde_json::to_string(&navigation).map_err(|e| e.to_string());
    }
    Ok(format!(
        "{}:{}",
        navigation.path().display(),
        navigation.line() + 1
    ))
}
