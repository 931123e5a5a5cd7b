// Job and company analysis. Deterministic heuristics only: no LLM calls, so the
// same job description always yields the same keywords, tone and advice.

pub mod company;
pub mod handlers;
pub mod job;
pub mod tone;
