// src/gemini/prompt.rs

/// User-visible part accompanying the uploaded document
pub const PARSE_REQUEST_TEXT: &str = "Parse the resume";

/// System instruction describing the target JSON shape.
///
/// The sequence-valued fields (`other`, `work`, `education`, `projects`,
/// `achievements`) are requested as JSON-encoded strings; the repair pass
/// decodes them after the response arrives.
pub const RESUME_PARSER_INSTRUCTION: &str = r#"You are a resume parser. You will be given a resume document. Your job is to extract the relevant information from the resume and return it in JSON format.
Follow this JSON schema:
{
  "other": "{\"Hobbies\":\"\",\"Languages\":\"\"}",
  "first_name": "first_name",
  "last_name": "last_name",
  "email": "email",
  "phone": "phone",
  "social": {
    "social_name": "url"
  },
  "summary": "summary in the resume",
  "skills": "comma separated list of skills",
  "work": "[{\"id\":1,\"company\":\"company\",\"title\":\"title\",\"startDate\":\"startDate\",\"endDate\":\"endDate\",\"description\":\"description\"}]",
  "education": "[{\"id\":1,\"degree\":\"degree\",\"institution\":\"institution\",\"startDate\":\"startDate\",\"endDate\":\"endDate\"}]",
  "projects": "[{\"id\":1,\"name\":\"name\",\"description\":\"description\"}]",
  "achievements": "[{\"id\":1,\"name\":\"name\",\"description\":\"description\"}]"
}
"#;
