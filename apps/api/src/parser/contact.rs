//! Contact field extraction from raw resume text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::ContactInfo;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.\-]?)?\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}\b").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/([A-Za-z0-9_\-]+)").unwrap()
});

static GITHUB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9\-]{1,39})").unwrap()
});

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>'"\)|]+"#).unwrap());

const CONTACT_TOKENS: &[&str] = &["@", "phone", "email", "linkedin", "github", "http", "www."];

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|user| format!("https://www.linkedin.com/in/{}", user.as_str()))
}

pub fn extract_github(text: &str) -> Option<String> {
    GITHUB_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|user| format!("https://github.com/{}", user.as_str()))
}

/// First URL that is neither LinkedIn nor GitHub.
pub fn extract_website(text: &str) -> Option<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
        .find(|url| {
            let lower = url.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com")
        })
}

/// Looks for a name in the first five non-empty lines: 2–4 alphabetic words,
/// shorter than 60 characters, with no contact tokens.
pub fn guess_name(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .take(5)
        .find(|line| {
            let lower = line.to_lowercase();
            if CONTACT_TOKENS.iter().any(|t| lower.contains(t)) || line.len() >= 60 {
                return false;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            (2..=4).contains(&words.len())
                && words.iter().all(|w| {
                    let cleaned: String = w.chars().filter(|c| *c != ',' && *c != '.').collect();
                    !cleaned.is_empty() && cleaned.chars().all(|c| c.is_alphabetic() || c == '-')
                })
        })
        .map(|s| s.to_string())
}

pub fn extract_contact(text: &str) -> ContactInfo {
    let lines: Vec<&str> = text.lines().collect();
    ContactInfo {
        name: guess_name(&lines).unwrap_or_default(),
        email: extract_email(text).unwrap_or_default(),
        phone: extract_phone(text).unwrap_or_default(),
        linkedin: extract_linkedin(text).unwrap_or_default(),
        github: extract_github(text).unwrap_or_default(),
        website: extract_website(text).unwrap_or_default(),
        ..Default::default()
    }
}

/// True if the line carries contact details and should not become resume content.
pub fn is_contact_line(line: &str) -> bool {
    EMAIL_RE.is_match(line)
        || LINKEDIN_RE.is_match(line)
        || GITHUB_RE.is_match(line)
        || (PHONE_RE.is_match(line) && line.split_whitespace().count() <= 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Jane Q Doe\n\
        jane.doe@Example.com | (555) 123-4567 | Austin, TX\n\
        linkedin.com/in/jane-doe | https://github.com/janedoe | https://janedoe.dev\n\
        EXPERIENCE\n";

    #[test]
    fn test_extract_contact_fields() {
        let contact = extract_contact(HEADER);
        assert_eq!(contact.name, "Jane Q Doe");
        assert_eq!(contact.email, "jane.doe@example.com");
        assert_eq!(contact.phone, "(555) 123-4567");
        assert_eq!(contact.linkedin, "https://www.linkedin.com/in/jane-doe");
        assert_eq!(contact.github, "https://github.com/janedoe");
        assert_eq!(contact.website, "https://janedoe.dev");
    }

    #[test]
    fn test_guess_name_skips_contact_lines() {
        let lines = ["jane@example.com", "Jane Doe"];
        assert_eq!(guess_name(&lines).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_guess_name_rejects_sentences() {
        let lines = ["Experienced engineer building distributed systems at scale"];
        assert!(guess_name(&lines).is_none());
    }

    #[test]
    fn test_is_contact_line() {
        assert!(is_contact_line("jane@example.com | Austin"));
        assert!(!is_contact_line("Reduced latency by 40% across 3 services"));
    }
}
