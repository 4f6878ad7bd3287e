//! Instruction payload sent with every résumé analysis request.

/// System prompt that enforces JSON-only output.
pub const FEEDBACK_SYSTEM: &str = "You are an expert in ATS (Applicant Tracking System) \
    and resume analysis. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Shape of the JSON the model must return. Mirrors `models::feedback::Feedback`.
pub const FEEDBACK_RESPONSE_FORMAT: &str = r#"{
  "overallScore": number, // max 100
  "ATS": {
    "score": number, // rate based on ATS suitability
    "tips": [{ "type": "good" | "improve", "tip": string }] // give 3-4 tips
  },
  "toneAndStyle": {
    "score": number, // max 100
    "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }] // give 3-4 tips
  },
  "content": {
    "score": number, // max 100
    "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }]
  },
  "structure": {
    "score": number, // max 100
    "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }]
  },
  "skills": {
    "score": number, // max 100
    "tips": [{ "type": "good" | "improve", "tip": string, "explanation": string }]
  }
}"#;

/// Analysis prompt template. Replace `{job_title}`, `{job_description}` and
/// `{response_format}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Analyze and rate the attached resume and suggest how to improve it.
The rating can be low if the resume is bad. Be thorough and detailed.
Point out every mistake and area for improvement; if there is a lot to improve, give low scores.
This feedback exists to help the candidate improve their resume.

Use the job the candidate is applying for to make the feedback specific.
JOB TITLE:
{job_title}

JOB DESCRIPTION:
{job_description}

Provide the feedback using the following format:
{response_format}

Return the analysis as a JSON object, without any other text and without backticks."#;

/// Builds the instruction payload for one analysis.
pub fn prepare_instructions(job_title: &str, job_description: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{response_format}", FEEDBACK_RESPONSE_FORMAT)
        .replace("{job_title}", or_not_provided(job_title))
        .replace("{job_description}", or_not_provided(job_description))
}

fn or_not_provided(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "(not provided)"
    } else {
        value
    }
}
