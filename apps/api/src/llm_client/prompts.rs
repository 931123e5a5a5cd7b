// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Appended to the system prompt of every JSON call by `generate_json`.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every rewrite prompt.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Keep every rewrite truthful to the original. Do NOT invent employers, \
    technologies, metrics or outcomes that the original does not state or clearly imply. \
    You may reorder, tighten, and surface keywords the original already supports.";

/// Fills `{name}` placeholders in a single pass. Inserted values are not
/// scanned again, so user text containing `{keywords}` stays literal. Braces
/// that do not name a variable (JSON schema examples) are kept as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('}').and_then(|end| {
            vars.iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders a numbered option list ("1. ...") for selection prompts.
pub fn numbered_options<S: AsRef<str>>(options: &[S]) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}. {}", i + 1, o.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
