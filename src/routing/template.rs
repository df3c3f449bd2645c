//! Path template parsing and prefix matching.
//!
//! # Responsibilities
//! - Parse `/items/{id}` style templates into literal and parameter segments
//! - Match a template against the leading segments of a request path
//! - Report the unconsumed suffix and captured parameter values
//!
//! # Design Decisions
//! - Matching is case-sensitive and segment-aligned (`/items` never matches `/itemsx`)
//! - No regex: each segment is a literal compare or a capture
//! - A fully consumed path leaves `/` as its remaining suffix

use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("template `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("template `{template}` has a malformed parameter segment `{segment}`")]
    MalformedParam { template: String, segment: String },

    #[error("template `{template}` declares parameter `{name}` twice")]
    DuplicateParam { template: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Result of matching one template against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Number of path segments the template consumed.
    pub consumed: usize,
    /// Unconsumed suffix, always starting with `/`.
    pub remaining: String,
    /// Captured `(name, value)` pairs in template order.
    pub params: Vec<(String, String)>,
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let Some(body) = template.strip_prefix('/') else {
            return Err(TemplateError::MissingLeadingSlash(template.to_string()));
        };
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut segments = Vec::new();
        if !body.is_empty() {
            for raw in body.split('/') {
                if raw.is_empty() {
                    return Err(TemplateError::EmptySegment(template.to_string()));
                }
                segments.push(Self::parse_segment(template, raw)?);
            }
        }

        let mut names: Vec<&str> = Vec::new();
        for seg in &segments {
            if let Segment::Param(name) = seg {
                if names.contains(&name.as_str()) {
                    return Err(TemplateError::DuplicateParam {
                        template: template.to_string(),
                        name: name.clone(),
                    });
                }
                names.push(name);
            }
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    fn parse_segment(template: &str, raw: &str) -> Result<Segment, TemplateError> {
        let opens = raw.contains('{');
        let closes = raw.contains('}');
        if !opens && !closes {
            return Ok(Segment::Literal(raw.to_string()));
        }
        let name = raw
            .strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .map(str::trim)
            .filter(|n| !n.is_empty() && !n.contains(['{', '}']));
        match name {
            Some(n) => Ok(Segment::Param(n.to_string())),
            None => Err(TemplateError::MalformedParam {
                template: template.to_string(),
                segment: raw.to_string(),
            }),
        }
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of segments in the template.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of literal segments; used for specificity tie-breaks.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match this template against the leading segments of `path`.
    pub fn match_prefix(&self, path: &str) -> Option<TemplateMatch> {
        let mut rest = path;
        let mut params = Vec::new();

        for seg in &self.segments {
            let after_slash = rest.strip_prefix('/')?;
            let end = after_slash.find('/').unwrap_or(after_slash.len());
            let value = &after_slash[..end];
            match seg {
                Segment::Literal(lit) if lit == value => {}
                Segment::Param(name) if !value.is_empty() => {
                    params.push((name.clone(), value.to_string()));
                }
                _ => return None,
            }
            rest = &after_slash[end..];
        }

        let remaining = if rest.is_empty() || rest == "/" {
            "/".to_string()
        } else if rest.starts_with('/') {
            rest.to_string()
        } else {
            return None;
        };

        Some(TemplateMatch {
            consumed: self.segments.len(),
            remaining,
            params,
        })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
