//! Two-slot URL templates combining an asset path with its version token.

use std::fmt;
use std::sync::OnceLock;

use crate::error::{AssetError, Result};
use crate::models::VersionToken;

/// Pattern used when none is configured.
pub const DEFAULT_FORMAT: &str = "{path}?{version}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Path,
    Version,
}

/// Pre-parsed URL template holding exactly one path and one version placeholder.
///
/// Two placeholder syntaxes are understood:
///
/// * named: `{path}` and `{version}`, e.g. `{path}?v={version}` or `v/{version}/{path}`;
/// * printf style: `%s` (the first is the path, the second the version), the explicit
///   positional forms `%1$s` (path) and `%2$s` (version), and `%%` for a literal percent sign.
///
/// Validation happens once in [`FormatPattern::parse`], so [`FormatPattern::apply`] cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    segments: Vec<Segment>,
}

impl FormatPattern {
    /// Parse and validate `pattern`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let segments = tokenize(pattern)?;

        let paths = segments.iter().filter(|s| **s == Segment::Path).count();
        let versions = segments.iter().filter(|s| **s == Segment::Version).count();

        match (paths, versions) {
            (1, 1) => Ok(Self {
                source: pattern.to_string(),
                segments,
            }),
            (0, 0) => Err(AssetError::invalid_pattern(pattern, "no placeholders found")),
            _ if paths + versions != 2 => Err(AssetError::invalid_pattern(
                pattern,
                format!("expected exactly two placeholders, found {}", paths + versions),
            )),
            _ => Err(AssetError::invalid_pattern(
                pattern,
                "expected one path placeholder and one version placeholder",
            )),
        }
    }

    /// Substitute `path` and `version` into the template.
    pub fn apply(&self, path: &str, version: &VersionToken) -> String {
        let mut url =
            String::with_capacity(self.source.len() + path.len() + version.as_str().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Path => url.push_str(path),
                Segment::Version => url.push_str(version.as_str()),
            }
        }
        url
    }

    /// The pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for FormatPattern {
    fn default() -> Self {
        default_pattern().clone()
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Shared instance of [`DEFAULT_FORMAT`].
pub(crate) fn default_pattern() -> &'static FormatPattern {
    static DEFAULT: OnceLock<FormatPattern> = OnceLock::new();
    DEFAULT.get_or_init(|| FormatPattern {
        source: DEFAULT_FORMAT.to_string(),
        segments: vec![
            Segment::Path,
            Segment::Literal("?".to_string()),
            Segment::Version,
        ],
    })
}

fn tokenize(pattern: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut bare_slots = 0usize;
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        let placeholder = if ch == '%' {
            let (segment, consumed) = percent_directive(pattern, rest, &mut bare_slots)?;
            rest = &rest[consumed..];
            segment
        } else if let Some(after) = rest.strip_prefix("{path}") {
            rest = after;
            Some(Segment::Path)
        } else if let Some(after) = rest.strip_prefix("{version}") {
            rest = after;
            Some(Segment::Version)
        } else {
            literal.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };

        match placeholder {
            Some(segment) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            None => literal.push('%'),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Interpret the `%` directive at the start of `rest`.
///
/// Returns the placeholder (or `None` for an escaped percent sign) and the number of bytes
/// consumed.
fn percent_directive(
    pattern: &str,
    rest: &str,
    bare_slots: &mut usize,
) -> Result<(Option<Segment>, usize)> {
    if rest.starts_with("%%") {
        return Ok((None, 2));
    }
    if rest.starts_with("%s") {
        *bare_slots += 1;
        let segment = match *bare_slots {
            1 => Segment::Path,
            2 => Segment::Version,
            _ => {
                return Err(AssetError::invalid_pattern(
                    pattern,
                    "more than two %s placeholders",
                ));
            }
        };
        return Ok((Some(segment), 2));
    }
    if rest.starts_with("%1$s") {
        return Ok((Some(Segment::Path), 4));
    }
    if rest.starts_with("%2$s") {
        return Ok((Some(Segment::Version), 4));
    }

    let directive: String = rest.chars().take(4).collect();
    Err(AssetError::invalid_pattern(
        pattern,
        format!("unsupported directive starting at {directive:?}"),
    ))
}
