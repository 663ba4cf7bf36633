//! Corpus serialization and generative trend synthesis.

pub mod backend;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod repair;
pub mod serializer;

pub use backend::{GeminiClient, GenerationRequest, GenerativeBackend};
pub use engine::Synthesizer;
pub use error::AnalyzerError;
pub use prompt::MAX_TRENDS;
pub use repair::{parse_with_repair, Recovery};
pub use serializer::{serialize, SerializedPayload, TRUNCATION_MARKER};
