//! Prompt builder: loads the offer analysis template and renders it for one request.
//!
//! The template is a markdown file with three segments:
//! system instruction, user task (with `{{token}}` placeholders), output format.
//! Two template shapes are understood; the shape is picked by probing for its
//! section markers.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisRequest;

const LEGACY_INPUT_MARKER: &str = "## User Input Variables:";
const LEGACY_TASK_MARKER: &str = "## Task:";
const CURRENT_INPUT_MARKER: &str = "## Offer Input:";
const OUTPUT_FORMAT_MARKER: &str = "## Output Format:";

/// Substituted for any `{{token}}` not listed in `TOKENS`.
const UNKNOWN_TOKEN_FALLBACK: &str = "Not provided";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("token regex pattern is hardcoded and must be valid")
});

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read prompt template {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt template is malformed: {0}")]
    Format(String),
}

/// Which request field feeds a token.
#[derive(Debug, Clone, Copy)]
enum TokenSource {
    OfferInput,
    InputType,
    FileName,
    /// Legacy form fields that the single-input flow no longer collects.
    NotCollected,
}

/// `(token, source, fallback when the source is absent or blank)`
const TOKENS: &[(&str, TokenSource, &str)] = &[
    ("offer_input", TokenSource::OfferInput, "No offer details provided"),
    ("input_type", TokenSource::InputType, "text"),
    ("file_name", TokenSource::FileName, "Not provided"),
    ("offer_document_text", TokenSource::OfferInput, "No document provided"),
    ("job_title", TokenSource::NotCollected, "Not provided"),
    ("company_name", TokenSource::NotCollected, "Not provided"),
    ("offer_amount", TokenSource::NotCollected, "Not provided"),
    ("benefits_package", TokenSource::NotCollected, "Not provided"),
    ("additional_context", TokenSource::NotCollected, "None"),
];

/// The two template layouts in circulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateShape {
    /// Multi-field form era: `## User Input Variables:` / `## Task:` / `## Output Format:`.
    Legacy,
    /// Single offer input: `## Offer Input:` / `## Output Format:`.
    Current,
}

struct ShapeMarkers {
    input: &'static str,
    /// Ends the user task before the output marker. The text between this
    /// marker and the output marker is not sent.
    task_end: Option<&'static str>,
    output: &'static str,
}

impl TemplateShape {
    /// Legacy when its marker is present, otherwise Current.
    pub fn detect(template: &str) -> Self {
        if template.contains(LEGACY_INPUT_MARKER) {
            TemplateShape::Legacy
        } else {
            TemplateShape::Current
        }
    }

    fn markers(self) -> ShapeMarkers {
        match self {
            TemplateShape::Legacy => ShapeMarkers {
                input: LEGACY_INPUT_MARKER,
                task_end: Some(LEGACY_TASK_MARKER),
                output: OUTPUT_FORMAT_MARKER,
            },
            TemplateShape::Current => ShapeMarkers {
                input: CURRENT_INPUT_MARKER,
                task_end: None,
                output: OUTPUT_FORMAT_MARKER,
            },
        }
    }
}

/// A template split into its three segments. Tokens are still unexpanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub shape: TemplateShape,
    pub system_instruction: String,
    pub user_task: String,
    pub output_format: String,
}

/// A fully rendered prompt, ready for the chat completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system_instruction: String,
    pub user_task: String,
    pub output_format: String,
}

impl RenderedPrompt {
    /// The single user-role message: task followed by the output format.
    pub fn user_message(&self) -> String {
        format!("{}\n\n{}", self.user_task, self.output_format)
    }
}

impl PromptTemplate {
    /// Splits raw template text. Fails when the detected shape's markers are missing.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let shape = TemplateShape::detect(raw);
        let markers = shape.markers();

        let (system, remainder) = raw
            .split_once(markers.input)
            .ok_or_else(|| missing_marker(markers.input))?;
        let (task_and_more, output) = remainder
            .split_once(markers.output)
            .ok_or_else(|| missing_marker(markers.output))?;
        let task = match markers.task_end {
            Some(end) => task_and_more.split_once(end).map_or(task_and_more, |(t, _)| t),
            None => task_and_more,
        };

        Ok(Self {
            shape,
            system_instruction: system.trim().to_string(),
            user_task: task.trim().to_string(),
            output_format: output.trim().to_string(),
        })
    }

    /// Substitutes every `{{token}}` in the user task.
    pub fn render(&self, request: &AnalysisRequest) -> RenderedPrompt {
        RenderedPrompt {
            system_instruction: self.system_instruction.clone(),
            user_task: substitute_tokens(&self.user_task, request),
            output_format: self.output_format.clone(),
        }
    }
}

fn missing_marker(marker: &str) -> TemplateError {
    TemplateError::Format(format!("missing section marker '{marker}'"))
}

/// Reads and splits the template at `path`. Called once per analysis.
pub async fn load_template(path: &Path) -> Result<PromptTemplate, TemplateError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Load {
            path: path.to_path_buf(),
            source,
        })?;
    let template = PromptTemplate::parse(&raw)?;
    debug!("Loaded {:?} prompt template from {}", template.shape, path.display());
    Ok(template)
}

fn substitute_tokens(text: &str, request: &AnalysisRequest) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures| token_value(&caps[1], request).to_string())
        .into_owned()
}

fn token_value<'a>(token: &str, request: &'a AnalysisRequest) -> &'a str {
    let Some((_, source, fallback)) = TOKENS.iter().find(|(name, _, _)| *name == token) else {
        warn!("Prompt template contains unknown token '{{{{{token}}}}}'");
        return UNKNOWN_TOKEN_FALLBACK;
    };
    let value = match source {
        TokenSource::OfferInput => Some(request.offer_input.as_str()),
        TokenSource::InputType => Some(request.input_type.as_str()),
        TokenSource::FileName => request.file_name.as_deref(),
        TokenSource::NotCollected => None,
    };
    value.filter(|v| !v.trim().is_empty()).unwrap_or(*fallback)
}
