use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use log::{debug, error};

use crate::{
    compile::Grammar,
    def::{plaintext, LanguageDef},
    error::{CompileError, HighlightError},
    options::Options,
    plugin::{BeforeHighlight, Plugin},
    result::{Continuation, HighlightResult},
    scan::{highlight_grammar, ScanRequest},
};

/// A registry of compiled languages together with the options used to
/// highlight with them.
///
/// Registration takes `&mut self`, highlighting only `&self`, so a populated
/// highlighter can be shared between threads.
#[derive(Default)]
pub struct Highlighter {
    languages: HashMap<String, Arc<Grammar>>,
    /// Registration order, auto-detection prefers earlier languages on ties.
    order: Vec<String>,
    aliases: HashMap<String, String>,
    options: Options,
    plugins: Vec<Box<dyn Plugin>>,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("languages", &self.order)
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

impl Highlighter {
    pub fn new() -> Highlighter {
        Highlighter::default()
    }

    pub fn with_options(options: Options) -> Highlighter {
        Highlighter {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn configure(&mut self, options: Options) {
        self.options = options;
    }

    pub fn add_plugin(&mut self, plugin: impl Plugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    pub(crate) fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    /// Compiles `def` and stores it under `name` and its aliases, replacing
    /// whatever was registered there before.
    ///
    /// A definition which fails to compile is reported through the returned
    /// error. In safe mode the name is still registered, as plain text.
    pub fn register_language(
        &mut self,
        name: &str,
        mut def: LanguageDef,
    ) -> Result<(), CompileError> {
        let key = name.to_lowercase();
        if def.name.is_empty() {
            def.name = name.to_owned();
        }

        let grammar = match Grammar::new(&def) {
            Ok(grammar) => grammar,
            Err(e) => {
                error!("language definition for `{name}` could not be registered: {e}");
                if self.options.safe_mode {
                    let mut fallback = plaintext();
                    fallback.name = def.name.clone();
                    fallback.aliases = def.aliases.clone();
                    if let Ok(grammar) = Grammar::new(&fallback) {
                        self.insert(key, grammar);
                    }
                }
                return Err(e);
            }
        };

        self.insert(key, grammar);
        Ok(())
    }

    fn insert(&mut self, key: String, grammar: Grammar) {
        let aliases = grammar.aliases.clone();
        match self.languages.get(&key) {
            // drop the aliases the replaced definition brought along
            Some(previous) => {
                for alias in &previous.aliases {
                    let alias = alias.to_lowercase();
                    if self.aliases.get(&alias) == Some(&key) {
                        self.aliases.remove(&alias);
                    }
                }
            }
            None => self.order.push(key.clone()),
        }
        self.languages.insert(key.clone(), Arc::new(grammar));
        self.register_aliases(&aliases, &key);
    }

    pub fn register_aliases(&mut self, aliases: &[impl AsRef<str>], language: &str) {
        for alias in aliases {
            self.aliases.insert(alias.as_ref().to_lowercase(), language.to_lowercase());
        }
    }

    /// Looks a language up by name or alias, ignoring case.
    pub fn get_language(&self, name: &str) -> Option<Arc<Grammar>> {
        let key = self.canonical_name(name)?;
        self.languages.get(key).cloned()
    }

    /// The registry key `name` resolves to.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        if let Some((key, _)) = self.languages.get_key_value(&name) {
            return Some(key);
        }
        let target = self.aliases.get(&name)?;
        self.languages.get_key_value(target).map(|(key, _)| key.as_str())
    }

    pub fn list_languages(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Whether the language exists and takes part in auto-detection.
    pub fn auto_detection(&self, name: &str) -> bool {
        self.get_language(name).is_some_and(|g| !g.disable_autodetect)
    }

    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        ignore_illegals: bool,
    ) -> Result<HighlightResult, HighlightError> {
        self.highlight_with_continuation(code, language, ignore_illegals, None)
    }

    /// Highlights `code` as if it followed the input `continuation` was taken from.
    pub fn highlight_with_continuation(
        &self,
        code: &str,
        language: &str,
        ignore_illegals: bool,
        continuation: Option<&Continuation>,
    ) -> Result<HighlightResult, HighlightError> {
        let mut context = BeforeHighlight {
            code: code.to_owned(),
            language: language.to_owned(),
            result: None,
        };
        for plugin in &self.plugins {
            plugin.before_highlight(&mut context);
        }

        let mut result = match context.result.take() {
            Some(result) => result,
            None => {
                let Some(grammar) = self.get_language(&context.language) else {
                    error!("could not find the language `{}`", context.language);
                    return Err(HighlightError::UnknownLanguage(context.language));
                };
                highlight_grammar(
                    self,
                    ScanRequest {
                        language: &context.language,
                        grammar: &grammar,
                        code: &context.code,
                        ignore_illegals,
                        continuation,
                        depth: 0,
                    },
                )?
            }
        };

        for plugin in &self.plugins {
            plugin.after_highlight(&mut result);
        }
        Ok(result)
    }

    /// Highlights `code` with every candidate language and returns the most
    /// relevant result, the runner up is kept in `second_best`.
    ///
    /// Candidates are `subset`, or the configured languages, or every
    /// registered language.
    pub fn highlight_auto(&self, code: &str, subset: Option<&[String]>) -> HighlightResult {
        self.auto_detect(code, subset, 0)
    }

    pub(crate) fn auto_detect(
        &self,
        code: &str,
        subset: Option<&[String]>,
        depth: usize,
    ) -> HighlightResult {
        let candidates = match (subset, &self.options.languages) {
            (Some(subset), _) => subset,
            (None, Some(configured)) => configured.as_slice(),
            (None, None) => self.order.as_slice(),
        };

        let mut results = vec![HighlightResult::plain(code, None)];
        let mut tried = Vec::new();
        for name in candidates {
            // results carry registry keys so ranking sees one name per language
            let Some(name) = self.canonical_name(name) else {
                continue;
            };
            if tried.contains(&name) {
                continue;
            }
            tried.push(name);
            let Some(grammar) = self.languages.get(name) else {
                continue;
            };
            if grammar.disable_autodetect {
                continue;
            }

            let request = ScanRequest {
                language: name,
                grammar,
                code,
                ignore_illegals: false,
                continuation: None,
                depth,
            };
            let result = match highlight_grammar(self, request) {
                Ok(result) => result,
                Err(e) => {
                    let mut failed = HighlightResult::plain(code, Some(name.to_owned()));
                    failed.illegal = true;
                    failed.error_raised = Some(e);
                    failed
                }
            };
            debug!(
                "auto-detect candidate `{name}`: relevance {}, illegal {}",
                result.relevance, result.illegal
            );
            results.push(result);
        }

        self.rank(&mut results);
        let mut results = results.into_iter();
        let mut best = results
            .next()
            .unwrap_or_else(|| HighlightResult::plain(code, None));
        best.second_best = results.next().map(Box::new);
        best
    }

    /// Orders results by descending relevance. On ties a language which is a
    /// superset of the other goes after it, otherwise the earlier one stays first.
    fn rank(&self, results: &mut [HighlightResult]) {
        let compare = |a: &HighlightResult, b: &HighlightResult| -> Ordering {
            if a.relevance != b.relevance {
                return b.relevance.cmp(&a.relevance);
            }
            if let (Some(a), Some(b)) = (&a.language, &b.language) {
                if self.superset_of(a, b) {
                    return Ordering::Greater;
                }
                if self.superset_of(b, a) {
                    return Ordering::Less;
                }
            }
            Ordering::Equal
        };

        // the superset relation makes this comparison intransitive, which the
        // standard sorts do not allow, a stable insertion sort copes with it
        for i in 1..results.len() {
            let mut j = i;
            while j > 0 && compare(&results[j - 1], &results[j]) == Ordering::Greater {
                results.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    fn superset_of(&self, language: &str, other: &str) -> bool {
        let Some(grammar) = self.get_language(language) else {
            return false;
        };
        let base = grammar.superset_of.as_deref().and_then(|b| self.canonical_name(b));
        base.is_some() && base == self.canonical_name(other)
    }
}
