// CV pipeline: upload handling, PDF text extraction and model-backed profile
// extraction. All model calls go through llm_client.

pub mod extractor;
pub mod handlers;
pub mod pdf;
pub mod prompts;
