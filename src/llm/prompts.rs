//! Tailoring prompt template

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The only line the model may emit when the CV does not fit the job.
pub const RELEVANCE_ALERT_LINE: &str = "⚠️ RELEVANCE ALERT: This JD is a significant mismatch.";

/// Writing register requested from the model. Affects phrasing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Professional,
    Modern,
    Technical,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Professional, Tone::Modern, Tone::Technical];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional/Corporate",
            Tone::Modern => "Modern/Startup",
            Tone::Technical => "Technical/Academic",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" | "corporate" | "professional/corporate" => Ok(Tone::Professional),
            "modern" | "startup" | "modern/startup" => Ok(Tone::Modern),
            "technical" | "academic" | "technical/academic" => Ok(Tone::Technical),
            _ => Err(format!(
                "Invalid tone: {}. Supported: professional, modern, technical",
                s
            )),
        }
    }
}

/// Everything the prompt depends on. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoringRequest {
    cv_text: String,
    job_description: String,
    tone: Tone,
}

impl TailoringRequest {
    pub fn new(cv_text: impl Into<String>, job_description: impl Into<String>, tone: Tone) -> Self {
        Self {
            cv_text: cv_text.into(),
            job_description: job_description.into(),
            tone,
        }
    }

    pub fn cv_text(&self) -> &str {
        &self.cv_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub tailoring: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            tailoring: TAILORING_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_tailoring(&self, request: &TailoringRequest) -> String {
        render(
            &self.tailoring,
            &[
                ("{cv}", request.cv_text()),
                ("{jd}", request.job_description()),
                ("{tone}", request.tone().label()),
                ("{alert}", RELEVANCE_ALERT_LINE),
            ],
        )
    }
}

/// Renders the default tailoring template.
pub fn build_prompt(request: &TailoringRequest) -> String {
    PromptTemplates::default().render_tailoring(request)
}

/// Single-pass substitution: inserted values are never scanned for placeholders.
fn render(template: &str, fields: &[(&str, &str)]) -> String {
    let extra: usize = fields.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match fields.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

const TAILORING_TEMPLATE: &str = r#"ROLE: You are an expert ATS/resume optimizer.

TASK: Compare the CV and the job description (JD) below, then tailor the CV to the JD.

<CV>
{cv}
</CV>

<JD>
{jd}
</JD>

TONE: {tone}

RULES:
1. RELEVANCE AUDIT: If the CV is less than a 40% relevance match for the JD, output ONLY the following line and nothing else:
{alert}
2. Otherwise, rewrite the CV to align with the JD while keeping at least 75% of the original phrasing.
3. Never invent experience, credentials, or facts that are not present in the CV.
4. Preserve the original structural flow (section order) of the CV.
5. Do not use bold or any other emphasis markup."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_all_fields() {
        let request = TailoringRequest::new(
            "Software Engineer with Python experience at Tech Corp.",
            "Senior Software Engineer role requiring React and Python.",
            Tone::Modern,
        );

        let prompt = build_prompt(&request);

        assert!(prompt.contains("expert ATS/resume optimizer"));
        assert!(prompt.contains("<CV>\nSoftware Engineer with Python experience at Tech Corp.\n</CV>"));
        assert!(prompt.contains("<JD>\nSenior Software Engineer role requiring React and Python.\n</JD>"));
        assert!(prompt.contains("TONE: Modern/Startup"));
        assert!(prompt.contains(RELEVANCE_ALERT_LINE));
        assert!(prompt.contains("40%"));
        assert!(prompt.contains("75%"));
        assert!(!prompt.contains("{cv}"));
        assert!(!prompt.contains("{alert}"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = TailoringRequest::new("cv", "jd", Tone::Technical);
        let again = TailoringRequest::new("cv", "jd", Tone::Technical);
        assert_eq!(build_prompt(&request), build_prompt(&again));
    }

    #[test]
    fn test_empty_cv_renders_empty_segment() {
        let prompt = build_prompt(&TailoringRequest::new("", "Senior Go Engineer", Tone::Professional));
        assert!(prompt.contains("<CV>\n\n</CV>"));
        assert!(prompt.contains("Senior Go Engineer"));
    }

    #[test]
    fn test_placeholders_in_inputs_are_not_expanded() {
        let request = TailoringRequest::new("I wrote {jd} and {tone}", "Rust {cv} role", Tone::Professional);
        let prompt = build_prompt(&request);

        assert!(prompt.contains("I wrote {jd} and {tone}"));
        assert!(prompt.contains("Rust {cv} role"));
    }

    #[test]
    fn test_unknown_braces_pass_through() {
        assert_eq!(render("a {b} {c", &[("{c}", "x")]), "a {b} {c");
        assert_eq!(render("{c}{c}", &[("{c}", "x")]), "xx");
    }

    #[test]
    fn test_tone_parsing() {
        assert_eq!("Professional".parse::<Tone>().unwrap(), Tone::Professional);
        assert_eq!("startup".parse::<Tone>().unwrap(), Tone::Modern);
        assert_eq!("Technical/Academic".parse::<Tone>().unwrap(), Tone::Technical);
        assert!("casual".parse::<Tone>().is_err());
    }
}
