//! Template-engine syntax recognition
//!
//! Markup produced for client-side frameworks carries sentinels that look
//! like ordinary comments or attributes but are structurally significant.
//! The engine consults these predicates before applying comment-removal or
//! attribute/whitespace rules.

/// Comment payload prefixes that must pass through byte-for-byte
///
/// Blazor component boundaries and persisted component state; React's
/// empty/text component markers.
const MARKER_COMMENT_PREFIXES: &[&str] = &[
    "Blazor:",
    "Blazor-Server-Component-State:",
    "Blazor-WebAssembly-Component-State:",
    "Blazor-Component-State:",
    "react-text:",
    "react-empty:",
    "/react-text",
    "/react-empty",
];

/// Whether a comment body is a framework marker that is never removable
pub fn is_marker_comment(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    MARKER_COMMENT_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// A Knockout containerless comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnockoutComment {
    /// `<!-- ko <binding> -->`
    Start { expression: String },
    /// `<!-- /ko -->`
    End,
}

/// Recognize a Knockout containerless comment body
pub fn parse_knockout_comment(raw: &str) -> Option<KnockoutComment> {
    let trimmed = raw.trim();
    if trimmed == "/ko" {
        return Some(KnockoutComment::End);
    }
    let rest = trimmed.strip_prefix("ko")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    Some(KnockoutComment::Start {
        expression: rest.trim().to_string(),
    })
}

/// Whether an attribute name is an Angular directive
pub fn is_angular_directive(name: &str, custom_directives: &[String]) -> bool {
    let name = name.to_ascii_lowercase();
    let normalized = name
        .strip_prefix("data-")
        .or_else(|| name.strip_prefix("x-"))
        .unwrap_or(&name);
    normalized.starts_with("ng-")
        || custom_directives
            .iter()
            .any(|d| d.eq_ignore_ascii_case(normalized))
}

/// Whether an attribute belongs to a binding syntax whose value must not be
/// rewritten
///
/// Covers Angular 2+ `[prop]`/`(event)`/`[(two-way)]`/`#ref`/`*structural`,
/// Aurelia command suffixes and `${}` interpolation, Polymer `on-*`/`name$`
/// annotations, and `{{ }}`/`[[ ]]` interpolation in the value.
pub fn is_binding_attribute(name: &str, value: &str) -> bool {
    if name.starts_with('[') && name.ends_with(']') {
        return true;
    }
    if name.starts_with('(') && name.ends_with(')') {
        return true;
    }
    if name.starts_with('*') || name.starts_with('#') {
        return true;
    }
    if name.ends_with('$') || name.starts_with("on-") {
        return true;
    }

    const AURELIA_SUFFIXES: &[&str] = &[
        ".bind",
        ".one-way",
        ".two-way",
        ".one-time",
        ".trigger",
        ".delegate",
        ".call",
        ".ref",
        ".for",
    ];
    let lower = name.to_ascii_lowercase();
    if AURELIA_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        return true;
    }

    has_interpolation(value)
}

/// Whether a text or attribute value contains `{{ }}`, `[[ ]]` or `${ }`
/// interpolation
pub fn has_interpolation(text: &str) -> bool {
    (text.contains("{{") && text.contains("}}"))
        || (text.contains("[[") && text.contains("]]"))
        || (text.contains("${") && text.contains('}'))
}
