//! Prompt template rendering.
//!
//! Templates use `{variable}` placeholders. Only identifiers are treated as
//! placeholders, so JSON fragments such as `{"limit": 5}` pass through
//! untouched.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utilities::errors::ConfigError;

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("placeholder pattern is valid")
});

/// Placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in VARIABLE_PATTERN.captures_iter(template) {
        let name = &cap[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every placeholder with its value from `inputs`.
///
/// A placeholder with no matching input is an error; the first one missing
/// (in template order) is reported.
pub fn interpolate(template: &str, inputs: &HashMap<String, String>) -> Result<String, ConfigError> {
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| !inputs.contains_key(name))
    {
        return Err(ConfigError::MissingTemplateVariable(missing));
    }
    let rendered = VARIABLE_PATTERN.replace_all(template, |cap: &regex::Captures<'_>| {
        inputs.get(&cap[1]).cloned().unwrap_or_default()
    });
    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_basic() {
        let out = interpolate("Hello {name}, today is {day}.", &inputs(&[("name", "Ada"), ("day", "Monday")]))
            .unwrap();
        assert_eq!(out, "Hello Ada, today is Monday.");
    }

    #[test]
    fn test_json_braces_untouched() {
        let template = r#"Reply as {"answer": "..."} to {user}"#;
        let out = interpolate(template, &inputs(&[("user", "Ada")])).unwrap();
        assert_eq!(out, r#"Reply as {"answer": "..."} to Ada"#);
    }

    #[test]
    fn test_missing_variable() {
        let err = interpolate("Hi {name} {other}", &inputs(&[("name", "Ada")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTemplateVariable(v) if v == "other"));
    }

    #[test]
    fn test_first_missing_variable_in_template_order() {
        let err = interpolate("{b} {a} {b}", &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTemplateVariable(v) if v == "b"));
    }

    #[test]
    fn test_placeholders_deduplicated() {
        assert_eq!(placeholders("{a} {b} {a}"), vec!["a", "b"]);
        assert!(placeholders("no vars").is_empty());
    }
}
