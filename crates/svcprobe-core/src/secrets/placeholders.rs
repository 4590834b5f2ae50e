//! `${VAR}` placeholder expansion

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // `$${NAME}` is an escaped placeholder and expands to the literal `${NAME}`.
    static ref PLACEHOLDER: Regex = Regex::new(r"(\$)?\$\{([^}]+)\}").unwrap();
}

/// Replace every `${NAME}` in `template` using `lookup`.
///
/// Names the lookup does not know expand to the empty string.
pub fn expand_placeholders<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[2];
            if caps.get(1).is_some() {
                format!("${{{}}}", name)
            } else {
                lookup(name).unwrap_or_default()
            }
        })
        .into_owned()
}

/// Expand placeholders from the process environment.
pub fn expand_env(template: &str) -> String {
    expand_placeholders(template, |name| std::env::var(name).ok())
}
