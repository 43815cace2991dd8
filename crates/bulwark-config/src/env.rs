use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are copied through untouched so that
/// commented-out settings never require their variables.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
            continue;
        }

        let mut failure = None;
        let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
            let fallback = caps.get(2).map(|m| m.as_str());
            match resolve(&caps[1], fallback) {
                Ok(value) => value,
                Err(e) => {
                    failure.get_or_insert(e);
                    String::new()
                }
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }
        lines.push(expanded.into_owned());
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[server]\nlisten_address = \"0.0.0.0:5005\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variables() {
        let vars = [("DB_HOST", Some("db.internal")), ("DB_USER", Some("app"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("host = \"{{ env.DB_HOST }}\"\nuser = \"{{env.DB_USER}}\"").unwrap();
            assert_eq!(result, "host = \"db.internal\"\nuser = \"app\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("DB_PASSWORD", || {
            let err = expand_env("password = \"{{ env.DB_PASSWORD }}\"").unwrap_err();
            assert!(err.contains("DB_PASSWORD"));
        });
    }

    #[test]
    fn only_env_scope_is_supported() {
        let err = expand_env("key = \"{{ secrets.TOKEN }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));

        let err = expand_env("key = \"{{ env.A.B }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("UNSET_SECRET", || {
            let input = "  # password = \"{{ env.UNSET_SECRET }}\"\nport = 5432";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("BULWARK_ENV", || {
            let result = expand_env("environment = \"{{ env.BULWARK_ENV | default(\"development\") }}\"").unwrap();
            assert_eq!(result, "environment = \"development\"");
        });
        temp_env::with_var("BULWARK_ENV", Some("production"), || {
            let result = expand_env("environment = \"{{ env.BULWARK_ENV | default(\"development\") }}\"").unwrap();
            assert_eq!(result, "environment = \"production\"");
        });
    }

    #[test]
    fn empty_default_is_allowed() {
        temp_env::with_var_unset("OPTIONAL", || {
            assert_eq!(expand_env("v = \"{{ env.OPTIONAL | default(\"\") }}\"").unwrap(), "v = \"\"");
        });
    }
}
