//! Binding-expression minification
//!
//! Knockout `data-bind`/containerless payloads and Angular directive values
//! are a restricted JS-expression grammar: object-literal shorthand,
//! strings, ternaries, nested brackets, function literals. Minification is
//! whitespace-only: string contents are copied verbatim and a single space
//! survives wherever two word-like tokens would otherwise fuse.
//!
//! A failure is scoped to the one expression it occurred in; the caller
//! leaves that fragment unminified and records a warning.

/// Failure inside one binding expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} in binding expression")]
pub struct ExpressionError {
    pub message: &'static str,
}

impl ExpressionError {
    fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// A character that can end or begin an identifier/number/keyword
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$')
}

/// Strip insignificant whitespace from a binding expression
///
/// # Errors
///
/// Fails on an unterminated string literal or unbalanced brackets; the
/// expression should then be used as written.
pub fn minify_binding_expression(expression: &str) -> Result<String, ExpressionError> {
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars().peekable();
    let mut brackets: Vec<char> = Vec::new();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                let mut closed = false;
                while let Some(s) = chars.next() {
                    out.push(s);
                    if s == '\\' {
                        match chars.next() {
                            Some(escaped) => out.push(escaped),
                            None => break,
                        }
                    } else if s == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(ExpressionError::new("unterminated string literal"));
                }
            }
            '(' | '[' | '{' => {
                brackets.push(c);
                out.push(c);
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if brackets.pop() != Some(expected) {
                    return Err(ExpressionError::new("unbalanced brackets"));
                }
                out.push(c);
            }
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
                let prev = out.chars().last();
                let next = chars.peek().copied();
                let keep = match (prev, next) {
                    (Some(p), Some(n)) => {
                        (is_word_char(p) && is_word_char(n))
                            || (p == '-' && n == '-')
                            || (p == '+' && n == '+')
                    }
                    _ => false,
                };
                if keep {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    if !brackets.is_empty() {
        return Err(ExpressionError::new("unbalanced brackets"));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_binding_list() {
        assert_eq!(
            minify_binding_expression("text: name, visible: isShown").unwrap(),
            "text:name,visible:isShown"
        );
    }

    #[test]
    fn test_object_literal_shorthand() {
        assert_eq!(
            minify_binding_expression("css: { active: isActive, 'has error': hasError }").unwrap(),
            "css:{active:isActive,'has error':hasError}"
        );
    }

    #[test]
    fn test_ternary() {
        assert_eq!(
            minify_binding_expression("text: ready ? 'go' : 'wait'").unwrap(),
            "text:ready?'go':'wait'"
        );
    }

    #[test]
    fn test_function_literal_keeps_keyword_space() {
        assert_eq!(
            minify_binding_expression("click: function (data) { return data.go }").unwrap(),
            "click:function(data){return data.go}"
        );
    }

    #[test]
    fn test_string_contents_untouched() {
        assert_eq!(
            minify_binding_expression("attr: { title: 'two  spaces' }").unwrap(),
            "attr:{title:'two  spaces'}"
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = minify_binding_expression("text: 'open").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(minify_binding_expression("css: { a: 1").is_err());
        assert!(minify_binding_expression("css: a: 1 }").is_err());
        assert!(minify_binding_expression("foreach: (items]").is_err());
    }

    #[test]
    fn test_minus_minus_not_fused() {
        assert_eq!(minify_binding_expression("value: a - -b").unwrap(), "value:a- -b");
    }
}
