// Prompt constants for the Matcher.

/// System prompt for best-variation selection. The answer is a bare number.
pub const SELECT_SYSTEM: &str = "You are an expert recruiter choosing which phrasing of a \
    resume entry best fits a specific job. \
    Respond with the option number only. \
    Do NOT include any other text.";

/// Selection prompt template.
/// Replace: {jd_excerpt}, {keywords}, {context}, {options}, {option_count}
pub const SELECT_PROMPT_TEMPLATE: &str = r#"JOB DESCRIPTION (excerpt):
{jd_excerpt}

KEY REQUIREMENTS: {keywords}

RESUME ENTRY BELONGS TO:
{context}

Which option presents this entry best for the job above? Prefer the option that
covers the key requirements with concrete, quantified outcomes.

OPTIONS:
{options}

Return only the number of the best option (1-{option_count})."#;
