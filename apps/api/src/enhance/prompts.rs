// Prompt constants for the Enhancement Client.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for entry rewrites.
pub const ENHANCE_SYSTEM: &str = "You are an expert resume writer tailoring existing \
    resume content to a specific job. \
    Do NOT invent facts that the original entry does not support.";

/// Entry rewrite prompt template.
/// Replace: {truthfulness_instruction}, {count}, {kind}, {entry_text}, {context},
///          {company}, {jd_excerpt}, {keywords}, {strong_verbs}, {avoid_verbs},
///          {used_verbs}, {positioning}
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"{truthfulness_instruction}

Rewrite the following resume {kind} so it fits the target job better.
Produce {count} distinct alternative phrasings.

ORIGINAL:
{entry_text}

BELONGS TO:
{context}

TARGET COMPANY: {company}

JOB DESCRIPTION (excerpt):
{jd_excerpt}

JD KEYWORDS to incorporate naturally where the original supports them (do NOT keyword-stuff):
{keywords}

TONE: prefer verbs like {strong_verbs}. Avoid: {avoid_verbs}.

VERBS ALREADY USED elsewhere in this resume (do NOT open with these):
{used_verbs}

POSITIONING:
{positioning}

Return a JSON object with this EXACT schema:
{
  "variations": ["first rewrite", "second rewrite"]
}

HARD RULES:
1. Each rewrite is a single line of plain text with no bullet glyph
2. Keep every number, technology and outcome from the original accurate
3. Each rewrite must differ meaningfully from the original and from the others"#;
