//! Response parser: turns the model's markdown reply into an `OfferAnalysis`.
//!
//! Best effort by construction: every section and field is tried against an
//! ordered list of layouts the model is known to produce, and anything that
//! does not match is replaced by a sentinel string. Parsing never fails the request.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::analysis::models::{Confidence, ExtractedOfferInfo, OfferAnalysis};

pub const OFFER_SUMMARY: &str = "Offer Summary";
pub const BENCHMARK_ASSESSMENT: &str = "Benchmark Assessment";
pub const STRENGTHS: &str = "Strengths";
pub const NEGOTIATION_OPPORTUNITIES: &str = "Negotiation Opportunities";
pub const SUGGESTED_STRATEGY: &str = "Suggested Strategy";
pub const RISKS_CONSIDERATIONS: &str = "Risks / Things to Consider";

pub const COMPANY_NAME: &str = "Company Name";
pub const JOB_TITLE: &str = "Job Title";
pub const BASE_SALARY: &str = "Base Salary";
pub const CONFIDENCE: &str = "Confidence";

/// Narrative sections in response order.
pub const SECTION_NAMES: [&str; 6] = [
    OFFER_SUMMARY,
    BENCHMARK_ASSESSMENT,
    STRENGTHS,
    NEGOTIATION_OPPORTUNITIES,
    SUGGESTED_STRATEGY,
    RISKS_CONSIDERATIONS,
];

pub const FIELD_NAMES: [&str; 4] = [COMPANY_NAME, JOB_TITLE, BASE_SALARY, CONFIDENCE];

/// Returned by `extract_info_field` when no layout matches.
pub const FIELD_NOT_FOUND: &str = "Not found";

/// Layouts a multi-line section can take, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionLayout {
    /// `- **Name**: ...` up to the next bold bullet.
    BoldBullet,
    /// `### Name: ...` up to the next `### ` header.
    H3,
    /// `## Name: ...` up to the next `## ` header.
    H2,
    /// `Name: ...` up to the first blank line.
    Plain,
}

const SECTION_LAYOUTS: [SectionLayout; 4] = [
    SectionLayout::BoldBullet,
    SectionLayout::H3,
    SectionLayout::H2,
    SectionLayout::Plain,
];

impl SectionLayout {
    fn opener(self, escaped_name: &str) -> String {
        match self {
            SectionLayout::BoldBullet => format!(r"-[ \t]*\*\*{escaped_name}\*\*:"),
            SectionLayout::H3 => format!(r"### {escaped_name}:"),
            SectionLayout::H2 => format!(r"## {escaped_name}:"),
            SectionLayout::Plain => format!(r"{escaped_name}:"),
        }
    }

    fn terminator(self) -> &'static str {
        match self {
            SectionLayout::BoldBullet => "- **",
            SectionLayout::H3 => "### ",
            SectionLayout::H2 => "## ",
            SectionLayout::Plain => "\n\n",
        }
    }
}

/// Layouts a single-line metadata field can take, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLayout {
    /// `- **Name**: value`
    BoldBullet,
    /// `Name: value`
    Plain,
}

const FIELD_LAYOUTS: [FieldLayout; 2] = [FieldLayout::BoldBullet, FieldLayout::Plain];

impl FieldLayout {
    fn pattern(self, escaped_name: &str) -> String {
        match self {
            FieldLayout::BoldBullet => format!(r"-[ \t]*\*\*{escaped_name}\*\*:[ \t]*([^\n]*)"),
            FieldLayout::Plain => format!(r"{escaped_name}:[ \t]*([^\n]*)"),
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Sentinel used when a section cannot be found.
pub fn missing_section_sentinel(section_name: &str) -> String {
    format!("No {} information provided.", section_name.to_lowercase())
}

fn try_extract_section(reply: &str, section_name: &str) -> Result<Option<String>, regex::Error> {
    let escaped = regex::escape(section_name);
    for layout in SECTION_LAYOUTS {
        let opener = case_insensitive(&layout.opener(&escaped))?;
        let Some(found) = opener.find(reply) else {
            continue;
        };
        let rest = &reply[found.end()..];
        let body = rest
            .find(layout.terminator())
            .map_or(rest, |end| &rest[..end])
            .trim();
        if !body.is_empty() {
            return Ok(Some(body.to_string()));
        }
    }
    Ok(None)
}

fn try_extract_info_field(reply: &str, field_name: &str) -> Result<Option<String>, regex::Error> {
    let escaped = regex::escape(field_name);
    for layout in FIELD_LAYOUTS {
        let pattern = case_insensitive(&layout.pattern(&escaped))?;
        let value = pattern
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

/// Extracts a narrative section. Returns the trimmed body of the first layout
/// that matches, or `"No <section> information provided."`.
pub fn extract_section(reply: &str, section_name: &str) -> String {
    match try_extract_section(reply, section_name) {
        Ok(Some(body)) => body,
        Ok(None) => missing_section_sentinel(section_name),
        Err(e) => {
            warn!("Section pattern for '{section_name}' failed to compile: {e}");
            missing_section_sentinel(section_name)
        }
    }
}

/// Extracts a single-line metadata value, or `"Not found"`.
pub fn extract_info_field(reply: &str, field_name: &str) -> String {
    match try_extract_info_field(reply, field_name) {
        Ok(Some(value)) => value,
        Ok(None) => FIELD_NOT_FOUND.to_string(),
        Err(e) => {
            warn!("Field pattern for '{field_name}' failed to compile: {e}");
            FIELD_NOT_FOUND.to_string()
        }
    }
}

/// Reads the model's self-reported confidence. Only the first word counts;
/// anything other than high/medium/low is `Low`.
fn parse_confidence(value: &str) -> Confidence {
    let word = value
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .unwrap_or_default();
    match word.as_str() {
        "high" => Confidence::High,
        "medium" => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Metadata value with the "Not found" sentinel mapped to `None`.
fn found(value: String) -> Option<String> {
    (value != FIELD_NOT_FOUND).then_some(value)
}

/// Compiles every layout of the fixed section and field tables once.
static KNOWN_LAYOUTS: LazyLock<Result<(), regex::Error>> = LazyLock::new(|| -> Result<(), regex::Error> {
    for name in SECTION_NAMES {
        let escaped = regex::escape(name);
        for layout in SECTION_LAYOUTS {
            case_insensitive(&layout.opener(&escaped))?;
        }
    }
    for name in FIELD_NAMES {
        let escaped = regex::escape(name);
        for layout in FIELD_LAYOUTS {
            case_insensitive(&layout.pattern(&escaped))?;
        }
    }
    Ok(())
});

fn try_parse_analysis(reply: &str) -> Result<OfferAnalysis, regex::Error> {
    (*KNOWN_LAYOUTS).clone()?;

    let confidence = found(extract_info_field(reply, CONFIDENCE))
        .map(|v| parse_confidence(&v))
        .unwrap_or_default();

    Ok(OfferAnalysis {
        extracted_info: ExtractedOfferInfo {
            company_name: found(extract_info_field(reply, COMPANY_NAME)),
            job_title: found(extract_info_field(reply, JOB_TITLE)),
            base_salary: found(extract_info_field(reply, BASE_SALARY)),
            confidence,
        },
        offer_summary: extract_section(reply, OFFER_SUMMARY),
        benchmark_assessment: extract_section(reply, BENCHMARK_ASSESSMENT),
        strengths: extract_section(reply, STRENGTHS),
        negotiation_opportunities: extract_section(reply, NEGOTIATION_OPPORTUNITIES),
        suggested_strategy: extract_section(reply, SUGGESTED_STRATEGY),
        risks_considerations: extract_section(reply, RISKS_CONSIDERATIONS),
    })
}

/// Returned when parsing itself breaks down.
pub fn parsing_failed_analysis() -> OfferAnalysis {
    OfferAnalysis {
        extracted_info: ExtractedOfferInfo::default(),
        offer_summary: "Analysis parsing failed. Please try again.".to_string(),
        benchmark_assessment: "Unable to parse benchmark assessment.".to_string(),
        strengths: "Unable to parse strengths.".to_string(),
        negotiation_opportunities: "Unable to parse negotiation opportunities.".to_string(),
        suggested_strategy: "Unable to parse suggested strategy.".to_string(),
        risks_considerations: "Unable to parse risks and considerations.".to_string(),
    }
}

/// Parses a full model reply. Never fails: unmatched parts become sentinels and
/// an internal error yields `parsing_failed_analysis()`.
pub fn parse_analysis(reply: &str) -> OfferAnalysis {
    try_parse_analysis(reply).unwrap_or_else(|e| {
        warn!("Falling back after analysis parsing error: {e}");
        parsing_failed_analysis()
    })
}
