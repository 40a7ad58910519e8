use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("expected the configuration to be an object, got {0}")]
    NotAnObject(Value),
    #[error("expected type {expected} for field config.{field}, got {value}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        value: Value,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid pattern in config.{field}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("unknown field config.{0}")]
    UnknownField(String),
}

#[derive(Clone, Debug)]
pub struct Options {
    /// Prepended to every scope to form its class name.
    pub class_prefix: String,
    /// Replaces tabs at the start of lines.
    pub tab_replace: Option<String>,
    /// Output `<br>` instead of newlines.
    pub use_br: bool,
    /// The languages auto-detection considers, all registered ones if `None`.
    pub languages: Option<Vec<String>>,
    /// Swallow internal faults and illegal input into degraded results.
    pub safe_mode: bool,
    /// Class names which disable highlighting of a block.
    pub no_highlight: Regex,
    /// Finds the language in a block's class names, the first group is the name.
    pub language_detect: Regex,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            class_prefix: "hljs-".to_owned(),
            tab_replace: None,
            use_br: false,
            languages: None,
            safe_mode: true,
            no_highlight: case_insensitive(r"^(no-?highlight)$").unwrap(),
            language_detect: case_insensitive(r"\blang(?:uage)?-([\w-]+)\b").unwrap(),
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl Options {
    /// Reads a configuration object, fields which are absent keep their defaults.
    ///
    /// ```json
    /// { "classPrefix": "hl-", "tabReplace": "    ", "useBR": false,
    ///   "languages": ["c", "cpp"], "safeMode": true,
    ///   "noHighlight": "^nohl$", "languageDetect": "\\blang-(\\w+)\\b" }
    /// ```
    pub fn from_json(value: Value) -> Result<Options, OptionsError> {
        let Value::Object(mut fields) = value else {
            return Err(OptionsError::NotAnObject(value));
        };

        let mut options = Options::default();
        if let Some(v) = read_field(&mut fields, "classPrefix")? {
            options.class_prefix = v;
        }
        if let Some(v) = read_field(&mut fields, "tabReplace")? {
            options.tab_replace = v;
        }
        if let Some(v) = read_field(&mut fields, "useBR")? {
            options.use_br = v;
        }
        if let Some(v) = read_field(&mut fields, "languages")? {
            options.languages = v;
        }
        if let Some(v) = read_field(&mut fields, "safeMode")? {
            options.safe_mode = v;
        }
        if let Some(v) = read_pattern(&mut fields, "noHighlight")? {
            options.no_highlight = v;
        }
        if let Some(v) = read_pattern(&mut fields, "languageDetect")? {
            options.language_detect = v;
        }

        if let Some(field) = fields.keys().next() {
            return Err(OptionsError::UnknownField(field.clone()));
        }

        Ok(options)
    }

    pub fn is_no_highlight(&self, class: &str) -> bool {
        self.no_highlight.is_match(class)
    }
}

fn read_field<T: for<'de> Deserialize<'de>>(
    fields: &mut serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Option<T>, OptionsError> {
    let Some(field) = fields.remove(name) else {
        return Ok(None);
    };

    serde_json::from_value::<T>(field.clone())
        .map(Some)
        .map_err(|source| OptionsError::InvalidField {
            field: name,
            expected: std::any::type_name::<T>(),
            value: field,
            source,
        })
}

fn read_pattern(
    fields: &mut serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Option<Regex>, OptionsError> {
    let Some(pattern) = read_field::<String>(fields, name)? else {
        return Ok(None);
    };
    case_insensitive(&pattern)
        .map(Some)
        .map_err(|source| OptionsError::InvalidPattern { field: name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.class_prefix, "hljs-");
        assert!(options.safe_mode);
        assert!(options.is_no_highlight("nohighlight"));
        assert!(options.is_no_highlight("No-Highlight"));
        assert!(!options.is_no_highlight("highlight"));
        let caps = options.language_detect.captures("foo language-c++ bar").unwrap();
        assert_eq!(&caps[1], "c");
        let caps = options.language_detect.captures("LANG-objective-c").unwrap();
        assert_eq!(&caps[1], "objective-c");
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(json!({
            "classPrefix": "hl-",
            "tabReplace": "  ",
            "useBR": true,
            "languages": ["c", "cpp"],
            "safeMode": false,
        }))
        .unwrap();
        assert_eq!(options.class_prefix, "hl-");
        assert_eq!(options.tab_replace.as_deref(), Some("  "));
        assert!(options.use_br);
        assert_eq!(options.languages, Some(vec!["c".to_owned(), "cpp".to_owned()]));
        assert!(!options.safe_mode);
    }

    #[test]
    fn test_from_json_errors() {
        let err = Options::from_json(json!({ "useBR": "yes" })).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidField { field: "useBR", .. }));

        let err = Options::from_json(json!({ "noHighlight": "(" })).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidPattern { field: "noHighlight", .. }));

        let err = Options::from_json(json!({ "colour": "red" })).unwrap_err();
        assert!(matches!(err, OptionsError::UnknownField(f) if f == "colour"));

        assert!(matches!(
            Options::from_json(json!([])),
            Err(OptionsError::NotAnObject(_))
        ));
    }
}
