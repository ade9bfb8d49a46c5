//! Element and attribute tables
//!
//! Classification tables driving the context-sensitive rules: which tags are
//! void, which are block-level for whitespace purposes, which carry raw text,
//! which attributes are boolean, which are URIs, and which attribute/value
//! pairs are redundant defaults.

/// Void elements (no end tag, no content)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "frame", "hr", "img", "input", "isindex",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is raw text for the tokenizer
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Elements whose whitespace must never be rewritten
const WHITESPACE_PRESERVING_ELEMENTS: &[&str] = &["pre", "textarea", "listing", "plaintext"];

/// Roots of foreign (XML-rules) subtrees
const FOREIGN_ELEMENTS: &[&str] = &["svg", "math"];

/// Block-level elements for the whitespace-trimming rules
///
/// Whitespace directly inside these (Medium) or directly around them
/// (Aggressive) is removable.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "col", "colgroup", "dd",
    "details", "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "legend", "li", "main", "menu", "menuitem", "meta", "nav", "noframes", "ol",
    "optgroup", "option", "p", "section", "summary", "table", "tbody", "td", "tfoot", "th",
    "thead", "title", "tr", "ul",
];

/// Boolean attributes that collapse to a bare name
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "compact", "controls",
    "declare", "default", "defaultchecked", "defaultmuted", "defaultselected", "defer",
    "disabled", "formnovalidate", "hidden", "inert", "ismap", "itemscope", "loop", "multiple",
    "muted", "nohref", "noresize", "noshade", "novalidate", "nowrap", "open", "readonly",
    "required", "reversed", "scoped", "seamless", "selected", "sortable", "truespeed",
    "typemustmatch",
];

/// Attributes holding URIs, eligible for protocol stripping
const URI_ATTRIBUTES: &[&str] = &[
    "action", "background", "cite", "codebase", "data", "formaction", "href", "longdesc",
    "manifest", "poster", "profile", "src", "usemap",
];

/// Event-handler attributes holding inline JS
pub fn is_event_attribute(name: &str) -> bool {
    name.len() > 2 && name[..2].eq_ignore_ascii_case("on")
}

/// Tag/attribute/value triples that restate a default and can be dropped
///
/// An empty value pattern means any value counts.
const REDUNDANT_ATTRIBUTES: &[(&str, &str, &str)] = &[
    ("a", "name", ""),
    ("area", "shape", "rect"),
    ("button", "type", "submit"),
    ("form", "autocomplete", "on"),
    ("form", "enctype", "application/x-www-form-urlencoded"),
    ("form", "method", "get"),
    ("img", "align", "bottom"),
    ("input", "type", "text"),
    ("script", "charset", ""),
    ("script", "language", "javascript"),
    ("textarea", "wrap", "soft"),
];

/// `type` attribute values (or absence) that mean JavaScript
pub fn is_js_type(type_value: Option<&str>) -> bool {
    match type_value {
        None => true,
        Some(v) => {
            let v = v.trim().to_ascii_lowercase();
            v.is_empty()
                || v == "text/javascript"
                || v == "text/ecmascript"
                || v == "application/javascript"
                || v == "application/ecmascript"
                || v == "module"
        }
    }
}

/// `type` attribute values (or absence) that mean CSS on a `<style>` tag
pub fn is_css_type(type_value: Option<&str>) -> bool {
    match type_value {
        None => true,
        Some(v) => {
            let v = v.trim().to_ascii_lowercase();
            v.is_empty() || v == "text/css"
        }
    }
}

fn contains(table: &[&str], name: &str) -> bool {
    table.contains(&name)
}

pub fn is_void_element(name: &str) -> bool {
    contains(VOID_ELEMENTS, name)
}

pub fn is_raw_text_element(name: &str) -> bool {
    contains(RAW_TEXT_ELEMENTS, name)
}

pub fn is_whitespace_preserving_element(name: &str) -> bool {
    contains(WHITESPACE_PRESERVING_ELEMENTS, name)
}

pub fn is_foreign_element(name: &str) -> bool {
    contains(FOREIGN_ELEMENTS, name)
}

pub fn is_block_element(name: &str) -> bool {
    contains(BLOCK_ELEMENTS, name)
}

pub fn is_boolean_attribute(name: &str) -> bool {
    contains(BOOLEAN_ATTRIBUTES, name)
}

pub fn is_uri_attribute(name: &str) -> bool {
    contains(URI_ATTRIBUTES, name)
}

/// Whether `name="value"` on `tag` restates a default
pub fn is_redundant_attribute(tag: &str, name: &str, value: &str) -> bool {
    REDUNDANT_ATTRIBUTES.iter().any(|&(t, n, v)| {
        t == tag && n == name && (v.is_empty() || v.eq_ignore_ascii_case(value.trim()))
    })
}
