mod error;
mod fetcher;
pub mod namer;
mod orchestrator;
pub mod parser;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use fetcher::{DownloadRequest, FetchOutcome, Fetcher, Mode};
pub use orchestrator::{builder::DownloadOrchestratorBuilder, DownloadOrchestrator, ItemReport};
