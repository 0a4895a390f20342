use std::borrow::Cow;

use regex::Regex;

use crate::config::FetchConfig;
use crate::domain::{LEGACY_LODE_URL, LODE_URL, REAL_LODE_URL};
use crate::error::LodeError;

pub const RULE_SEPARATOR: &str = "->";
pub const OTHER_VISUALISATION_PATTERN: &str = r#"<dl><dt>Other visualisation:</dt><dd><a href="[^"]+">Ontology source</a></dd></dl>"#;

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct RewriteStep {
    pub label: &'static str,
    matcher: Matcher,
    replacement: String,
}

impl RewriteStep {
    pub fn literal(label: &'static str, needle: &str, replacement: &str) -> Self {
        Self {
            label,
            matcher: Matcher::Literal(needle.to_string()),
            replacement: replacement.to_string(),
        }
    }

    /// `replacement` is taken in the regex crate's own syntax (`$1`, `${name}`).
    pub fn pattern(
        label: &'static str,
        pattern: &str,
        replacement: &str,
    ) -> Result<Self, LodeError> {
        let regex = Regex::new(pattern).map_err(|err| LodeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            label,
            matcher: Matcher::Pattern(regex),
            replacement: replacement.to_string(),
        })
    }

    /// Parses a `pattern->replacement` rule, splitting on the first `->`.
    /// Group references in the replacement use backslash syntax (`\1`).
    pub fn from_rule(rule: &str) -> Result<Self, LodeError> {
        let (pattern, replacement) = rule
            .split_once(RULE_SEPARATOR)
            .ok_or_else(|| LodeError::InvalidReplaceRule(rule.to_string()))?;
        Self::pattern("string-replace", pattern, &translate_replacement(replacement)?)
    }

    pub fn apply<'a>(&self, document: &'a str) -> Cow<'a, str> {
        match &self.matcher {
            Matcher::Literal(needle) if needle.is_empty() => Cow::Borrowed(document),
            Matcher::Literal(needle) => {
                if document.contains(needle.as_str()) {
                    Cow::Owned(document.replace(needle.as_str(), &self.replacement))
                } else {
                    Cow::Borrowed(document)
                }
            }
            Matcher::Pattern(regex) => regex.replace_all(document, self.replacement.as_str()),
        }
    }
}

/// Ordered substitution chain applied to every fetched page.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    steps: Vec<RewriteStep>,
}

impl RewritePipeline {
    /// Import override replacements, then the user rule, then the legacy
    /// base rewrite, then the markup strip.
    pub fn from_config(config: &FetchConfig) -> Result<Self, LodeError> {
        let mut steps = Vec::new();
        if let Some(imported_url) = &config.imported_url {
            steps.push(RewriteStep::literal(
                "imported-basepath",
                &config.lode_url,
                imported_url,
            ));
            steps.push(RewriteStep::literal("lode-url", LODE_URL, imported_url));
            steps.push(RewriteStep::literal(
                "real-lode-url",
                REAL_LODE_URL,
                imported_url,
            ));
        }
        if let Some(rule) = &config.string_replace {
            steps.push(RewriteStep::from_rule(rule)?);
        }
        steps.push(RewriteStep::pattern("legacy-lode-url", LEGACY_LODE_URL, LODE_URL)?);
        steps.push(RewriteStep::pattern(
            "other-visualisation",
            OTHER_VISUALISATION_PATTERN,
            "",
        )?);
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[RewriteStep] {
        &self.steps
    }

    pub fn apply(&self, document: &str) -> String {
        let mut current = document.to_string();
        for step in &self.steps {
            let rewritten = match step.apply(&current) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = rewritten {
                tracing::debug!(step = step.label, "rewrote document");
                current = rewritten;
            }
        }
        current
    }
}

/// Converts a backslash-style replacement (`\1`, `\g<name>`, `\n`) into the
/// regex crate's syntax. Literal `$` signs are escaped. An unterminated or
/// empty `\g<...>` reference is rejected.
pub fn translate_replacement(raw: &str) -> Result<String, LodeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(digit) if digit.is_ascii_digit() => {
                    let mut group = String::new();
                    while group.len() < 2 {
                        match chars.peek() {
                            Some(next) if next.is_ascii_digit() => {
                                group.push(*next);
                                chars.next();
                            }
                            _ => break,
                        }
                    }
                    out.push_str(&format!("${{{group}}}"));
                }
                Some('g') => {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.next() == Some('<') {
                        let mut name = String::new();
                        let mut closed = false;
                        for c in lookahead.by_ref() {
                            if c == '>' {
                                closed = true;
                                break;
                            }
                            name.push(c);
                        }
                        if !closed || name.is_empty() {
                            return Err(LodeError::InvalidReplaceRule(raw.to_string()));
                        }
                        out.push_str(&format!("${{{name}}}"));
                        chars = lookahead;
                    } else {
                        out.push('\\');
                    }
                }
                Some('n') => {
                    chars.next();
                    out.push('\n');
                }
                Some('t') => {
                    chars.next();
                    out.push('\t');
                }
                Some('r') => {
                    chars.next();
                    out.push('\r');
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    Ok(out)
}
