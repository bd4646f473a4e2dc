//! Concrete `BackendClient` implementations and the lazy client pool that
//! resolves model keys to them. `router-core` never depends on this crate —
//! only `router` (the binary) wires the two together.

mod anthropic;
mod common;
mod google;
mod huggingface;
mod openai;
mod pool;

pub use anthropic::AnthropicClient;
pub use common::NullClient;
pub use google::GoogleClient;
pub use huggingface::HuggingFaceClient;
pub use openai::OpenAiClient;
pub use pool::ClientPool;
