// Prompt templates for AI-assisted resume parsing.
// Variables are substituted with `.replace("{var}", value)`.

pub const PARSE_SYSTEM: &str = "You are an expert resume parser. \
    You convert raw resume text into structured JSON without adding, removing or rewording content.";

/// Structured parse prompt. Variables: {resume_text}
pub const PARSE_PROMPT_TEMPLATE: &str = r#"Parse this resume text into structured sections.

RESUME TEXT:
{resume_text}

Return JSON with EXACTLY this structure:
{
  "contact": {
    "name": "Full Name",
    "title": "Professional title, e.g. Senior Software Engineer",
    "email": "", "phone": "", "location": "City, State",
    "linkedin": "", "github": "", "website": ""
  },
  "summary": ["Individual sentence 1", "Individual sentence 2"],
  "experience": [
    {
      "position": "Job Title",
      "company": "Company Name",
      "duration": "Start - End",
      "location": "City, State",
      "overview": "One-line role description, or empty",
      "accomplishments": ["Achievement 1", "Achievement 2"]
    }
  ],
  "education": [
    {
      "degree": "Degree and field of study",
      "institution": "School Name",
      "graduation": "Year",
      "location": "",
      "details": ["GPA: X.X", "Honors"]
    }
  ],
  "skills": [
    { "category": "Languages", "items": ["Rust", "Go"] }
  ],
  "projects": [
    {
      "name": "Project Name",
      "description": "One-line description, or empty",
      "technologies": ["tech1"],
      "achievements": ["Result 1"]
    }
  ],
  "certifications": [
    { "name": "Certification", "issuer": "Issuer", "date": "Date" }
  ],
  "achievements": ["Award 1"]
}

RULES:
1. Split the summary into individual sentences.
2. Each role and each project is a separate object.
3. Copy text verbatim; do not invent or embellish anything.
4. Use an empty string or empty array when information is missing."#;
