use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

// `$$`, `$name` or `${name}`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(\$)|([_a-zA-Z][_a-zA-Z0-9]*)|\{([_a-zA-Z][_a-zA-Z0-9]*)\})").unwrap()
});

/// Page template with `$name` / `${name}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Template {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(Self::new(source))
    }

    /// Replace known placeholders, leave everything else untouched. `$$` becomes `$`.
    pub fn safe_substitute(&self, values: &HashMap<&str, &str>) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.source, |caps: &Captures| {
                if caps.get(1).is_some() {
                    return "$".to_string();
                }
                let name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                match values.get(name) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tpl: &str, values: &[(&str, &str)]) -> String {
        let map: HashMap<&str, &str> = values.iter().copied().collect();
        Template::new(tpl).safe_substitute(&map)
    }

    #[test]
    fn substitutes_both_forms() {
        let out = render("$city and ${city}s", &[("city", "Lund")]);
        assert_eq!(out, "Lund and Lunds");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let out = render("$missing ${missing} $city", &[("city", "Lund")]);
        assert_eq!(out, "$missing ${missing} Lund");
    }

    #[test]
    fn stray_dollars_pass_through() {
        assert_eq!(render("costs $5 or ${ or $", &[]), "costs $5 or ${ or $");
        assert_eq!(render("${9x}", &[]), "${9x}");
    }

    #[test]
    fn double_dollar_is_escape() {
        assert_eq!(render("99$$ and $$city", &[("city", "Lund")]), "99$ and $city");
    }

    #[test]
    fn identifier_stops_at_non_word() {
        assert_eq!(render("tel:$phone_raw\">", &[("phone_raw", "+46")]), "tel:+46\">");
        assert_eq!(render("$year-$year", &[("year", "2026")]), "2026-2026");
    }

    #[test]
    fn longest_identifier_wins() {
        // `$phone_raw` is one identifier, not `$phone` followed by `_raw`.
        let out = render("$phone_raw", &[("phone", "070")]);
        assert_eq!(out, "$phone_raw");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = render("$a", &[("a", "$b"), ("b", "nope")]);
        assert_eq!(out, "$b");
    }

    #[test]
    fn missing_template_is_error() {
        let err = Template::load(Path::new("tests/fixtures/missing.html")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.html"));
    }
}
