//! Single-pass `{name}` substitution for prompt templates.

/// Fills every `{name}` token in `template` from `values` in one scan.
/// Substituted text is never rescanned, so user content that happens to
/// contain a placeholder is kept verbatim. Unknown tokens are left as is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail[1..].find('}').and_then(|close| {
            let name = &tail[1..=close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close + 2, *value))
        });
        match value {
            Some((consumed, value)) => {
                out.push_str(value);
                rest = &tail[consumed..];
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_every_occurrence() {
        let out = render("{a} and {b}, again {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y, again x");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let out = render("{a}|{b}", &[("a", "{b}"), ("b", "real")]);
        assert_eq!(out, "{b}|real");
    }

    #[test]
    fn test_unknown_tokens_and_json_braces_survive() {
        let out = render("{\"k\": 1} {missing} {a", &[("a", "x")]);
        assert_eq!(out, "{\"k\": 1} {missing} {a");
    }
}
