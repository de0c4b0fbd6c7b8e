pub mod chunk;
pub mod document;
pub mod loaders;
pub mod mode;
pub mod summary;

pub use chunk::{Batch, Chunk, ChunkDiagnostic, ChunkOutcome, ChunkSummary};
pub use document::{Document, Page};
pub use loaders::{load_all_documents, load_document};
pub use mode::{FailedChunkPolicy, SummaryMode, SummaryStyle};
pub use summary::{DocumentState, MergedSummary, SummaryReport, TruncationWarning};
