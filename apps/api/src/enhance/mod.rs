// Enhancement Client: JD-targeted rewrites of individual entries.
// All LLM calls go through llm_client::TextGenerator.

pub mod dedup;
pub mod enhancer;
pub mod handlers;
pub mod prompts;
