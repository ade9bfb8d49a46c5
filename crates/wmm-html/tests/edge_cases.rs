//! Edge case tests for wmm-html
//!
//! Rare markup shapes, malformed content and settings interplay that the
//! module-level tests do not cover.

use wmm_html::{HtmlMinificationSettings, HtmlMinifier, WhitespaceMinificationMode, XhtmlMinifier};

fn minify(source: &str) -> String {
    HtmlMinifier::default().minify(source, false).minified_content
}

// ============================================================================
// EMPTY AND TEXT-ONLY INPUT
// ============================================================================

#[test]
fn test_empty_input() {
    let result = HtmlMinifier::default().minify("", false);
    assert_eq!(result.minified_content, "");
    assert!(result.is_ok());
}

#[test]
fn test_text_only_input() {
    assert_eq!(minify("just   some   text"), "just some text");
}

#[test]
fn test_whitespace_only_input() {
    assert_eq!(minify("   \n\t  "), " ");
    let mut settings = HtmlMinificationSettings::default();
    settings.whitespace_mode = WhitespaceMinificationMode::Medium;
    let result = HtmlMinifier::new(settings).minify("   \n\t  ", false);
    assert_eq!(result.minified_content, "");
}

// ============================================================================
// MALFORMED MARKUP
// ============================================================================

#[test]
fn test_unclosed_element_at_eof() {
    // No close tag is not a parse error; the output just ends open.
    let result = HtmlMinifier::default().minify("<div><p>text", false);
    assert!(result.is_ok());
    assert_eq!(result.minified_content, "<div><p>text");
}

#[test]
fn test_unterminated_tag_is_error() {
    let result = HtmlMinifier::default().minify("<div class=\"x\"", false);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_bare_ampersand_and_entities_pass_through() {
    assert_eq!(
        minify("<p>fish &amp; chips & more</p>"),
        "<p>fish &amp; chips & more</p>"
    );
}

#[test]
fn test_nbsp_entity_not_collapsed() {
    assert_eq!(minify("<p>a&nbsp;&nbsp;b</p>"), "<p>a&nbsp;&nbsp;b</p>");
}

#[test]
fn test_angle_comparison_in_text() {
    assert_eq!(minify("<p>1 < 2 and 3 > 2</p>"), "<p>1 < 2 and 3 > 2</p>");
}

// ============================================================================
// CASE HANDLING
// ============================================================================

#[test]
fn test_tag_names_lowercased() {
    assert_eq!(minify("<DIV Class=\"A\">x</DIV>"), "<div class=\"A\">x</div>");
}

#[test]
fn test_preserve_case_setting() {
    let mut settings = HtmlMinificationSettings::default();
    settings.preserve_case = true;
    let result = HtmlMinifier::new(settings).minify("<DIV Class=\"A\">x</DIV>", false);
    assert_eq!(result.minified_content, "<DIV Class=\"A\">x</DIV>");
}

#[test]
fn test_case_insensitive_raw_text_close() {
    assert_eq!(
        minify("<SCRIPT>var a = 1;</SCRIPT>"),
        "<script>var a = 1;</script>"
    );
}

// ============================================================================
// QUOTE HANDLING
// ============================================================================

#[test]
fn test_single_quoted_attribute_kept() {
    assert_eq!(minify("<p title='hi'>x</p>"), "<p title='hi'>x</p>");
}

#[test]
fn test_unquoted_value_gets_quotes() {
    assert_eq!(minify("<input value=abc>"), "<input value=\"abc\">");
}

#[test]
fn test_quote_flipped_when_value_contains_it() {
    // Double-quoted value holding a double quote is impossible as written;
    // unquoted values are where this arises.
    assert_eq!(
        minify("<p title='it\"s'>x</p>"),
        "<p title='it\"s'>x</p>"
    );
}

// ============================================================================
// DEEP NESTING AND STRESS
// ============================================================================

#[test]
fn test_deeply_nested_elements() {
    let depth = 200;
    let mut source = String::new();
    for _ in 0..depth {
        source.push_str("<div>");
    }
    source.push('x');
    for _ in 0..depth {
        source.push_str("</div>");
    }
    let result = HtmlMinifier::default().minify(&source, false);
    assert!(result.is_ok());
    assert_eq!(result.minified_content, source);
}

#[test]
fn test_many_siblings() {
    let mut source = String::from("<ul>\n");
    for i in 0..500 {
        source.push_str(&format!("  <li>item {i}</li>\n"));
    }
    source.push_str("</ul>");
    let mut settings = HtmlMinificationSettings::default();
    settings.whitespace_mode = WhitespaceMinificationMode::Aggressive;
    let result = HtmlMinifier::new(settings).minify(&source, false);
    assert!(result.is_ok());
    assert!(result.minified_content.starts_with("<ul><li>item 0</li>"));
    assert!(result.minified_content.ends_with("<li>item 499</li></ul>"));
}

// ============================================================================
// XHTML SPECIFICS
// ============================================================================

#[test]
fn test_xhtml_boolean_collapse_keeps_wellformedness() {
    let result = XhtmlMinifier::default().minify("<input checked=\"checked\">", false);
    assert_eq!(result.minified_content, "<input checked=\"\" />");
}

#[test]
fn test_xhtml_void_elements() {
    let result = XhtmlMinifier::default().minify("<meta charset=\"utf-8\"><link rel=\"icon\">", false);
    assert_eq!(
        result.minified_content,
        "<meta charset=\"utf-8\" /><link rel=\"icon\" />"
    );
}
