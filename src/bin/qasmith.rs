//! qasmith CLI: reads a JSON request, emits JSON results on stdout.
//!
//! On any failure a `{"error": "<message>"}` object goes to stderr and the
//! process exits non-zero. Request fields: `text` (or `pdf_path`), plus
//! optional `context`, `chunk_size`, and `chunking_mode`. With `--index` the
//! chunk-indexing path runs instead of question synthesis.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::FmtSubscriber;

use qasmith::config::{ChunkingConfig, ChunkingMode, SynthesisConfig};
use qasmith::embeddings::{EmbeddingProvider, HttpEmbeddingProvider, MockEmbeddingProvider};
use qasmith::extract::{PdfExtractor, TextExtractor};
use qasmith::indexer::ChunkIndexer;
use qasmith::segmentation;
use qasmith::stores::{Backend, SqliteChunkStore};
use qasmith::synthesis::QaSynthesizer;
use qasmith::types::PipelineError;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pdf_path: Option<PathBuf>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    chunk_size: Option<usize>,
    #[serde(default)]
    chunking_mode: Option<ChunkingMode>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let _ = dotenvy::dotenv();

    if let Err(err) = run().await {
        eprintln!("{}", json!({ "error": err.to_string() }));
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PipelineError> {
    let mut index_mode = false;
    let mut request_path: Option<PathBuf> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--index" => index_mode = true,
            other => request_path = Some(PathBuf::from(other)),
        }
    }

    let payload = match &request_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let request: Request = serde_json::from_str(&payload)
        .map_err(|err| PipelineError::Input(format!("invalid request payload: {err}")))?;

    let text = resolve_text(&request)?;
    if text.trim().is_empty() {
        return Err(PipelineError::Input("document text is empty".to_string()));
    }

    if index_mode {
        run_indexing(&request, &text).await
    } else {
        run_synthesis(&request, &text)
    }
}

fn resolve_text(request: &Request) -> Result<String, PipelineError> {
    if let Some(text) = &request.text {
        return Ok(text.clone());
    }
    if let Some(path) = &request.pdf_path {
        let bytes = std::fs::read(path)?;
        return PdfExtractor.extract(&bytes);
    }
    Err(PipelineError::Input(
        "request must provide 'text' or 'pdf_path'".to_string(),
    ))
}

fn run_synthesis(request: &Request, text: &str) -> Result<(), PipelineError> {
    let mut config = SynthesisConfig::new();
    if let Some(context) = &request.context {
        config = config.context(context.clone());
    }
    let pairs = QaSynthesizer::new(config)?.synthesize(text)?;
    emit_json(&pairs)
}

async fn run_indexing(request: &Request, text: &str) -> Result<(), PipelineError> {
    let mut chunking = ChunkingConfig::new();
    if let Some(budget) = request.chunk_size {
        chunking = chunking.budget(budget);
    }
    if let Some(mode) = request.chunking_mode {
        chunking = chunking.mode(mode);
    }
    let chunks = segmentation::chunk(text, &chunking);

    let provider: Arc<dyn EmbeddingProvider> = match HttpEmbeddingProvider::from_env() {
        Ok(provider) => Arc::new(provider),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to mock embeddings");
            Arc::new(MockEmbeddingProvider::new())
        }
    };

    let db_path = env::var("QASMITH_DB").unwrap_or_else(|_| "./qasmith_chunks.sqlite".to_string());
    let store = SqliteChunkStore::open(&db_path).await?;
    let indexer = ChunkIndexer::new(provider, store);

    let source = request
        .pdf_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    let ids = indexer.index(&source, &chunks).await?;

    // Resolve by id rather than zipping against the input: chunks whose
    // embedding failed were skipped and have no assigned id.
    let mut rows = Vec::with_capacity(ids.len());
    for id in &ids {
        if let Some(record) = indexer.store().get_chunk_by_id(id).await? {
            rows.push(json!({ "id": id, "content": record.content }));
        }
    }
    emit_json(&rows)
}

fn emit_json<T: serde::Serialize>(value: &T) -> Result<(), PipelineError> {
    use std::io::Write;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, value)
        .map_err(|err| PipelineError::Io(std::io::Error::other(err)))?;
    writeln!(handle)?;
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
