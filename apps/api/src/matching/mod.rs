// Matcher: one selected variation per entry for a given job, plus a fit report.
// The LLM backend goes through llm_client::TextGenerator; the keyword backend
// makes no calls.

pub mod fit_scoring;
pub mod handlers;
pub mod matcher;
pub mod prompts;
pub mod selector;
