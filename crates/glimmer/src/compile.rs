use std::collections::HashMap;

use cranelift_entity::{entity_impl, PrimaryMap};
use regex::Regex;

use crate::{
    def::{
        Begin, BeginGuard, Child, End, EndGuard, Flags, Keywords, LanguageDef, ModeDef, ModeRef,
        SubLanguage,
    },
    error::CompileError,
    keywords::KeywordTable,
    matcher::{anchored_regex, lang_regex, ResumableMatcher},
};

/// Modes which close together with their parent are compiled once per parent,
/// a mode containing itself that way would expand forever.
const MAX_DEPTH: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleId(u32);

entity_impl! { RuleId }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchType {
    Begin(RuleId),
    End,
    Illegal,
}

#[derive(Debug)]
pub struct Rule {
    /// Already resolved through the language's class name aliases.
    pub scope: Option<String>,
    pub relevance: u32,
    pub flags: Flags,
    pub ends_with_parent: bool,
    pub end_same_as_begin: bool,
    pub begin_guard: Option<BeginGuard>,
    pub end_guard: Option<EndGuard>,
    pub keywords: Option<KeywordTable>,
    pub sub_language: Option<SubLanguage>,
    pub starts: Option<RuleId>,
    pub children: Vec<RuleId>,
    pub(crate) begin: String,
    /// Everything that may end this rule, including what ends its ancestors.
    pub(crate) terminator: Option<String>,
    /// The rule's own end, anchored.
    pub(crate) end_re: Option<Regex>,
    pub(crate) keyword_pattern: Option<Regex>,
    pub(crate) matcher: ResumableMatcher<MatchType>,
}

impl Rule {
    pub fn begin_source(&self) -> &str {
        &self.begin
    }
    pub fn terminator_source(&self) -> Option<&str> {
        self.terminator.as_deref()
    }
    pub fn scope_or_unnamed(&self) -> &str {
        self.scope.as_deref().unwrap_or("<unnamed>")
    }
}

/// A compiled language, immutable once built.
#[derive(Debug)]
pub struct Grammar {
    pub name: String,
    pub aliases: Vec<String>,
    pub case_insensitive: bool,
    pub disable_autodetect: bool,
    pub superset_of: Option<String>,
    rules: PrimaryMap<RuleId, Rule>,
    root: RuleId,
}

impl Grammar {
    pub fn new(def: &LanguageDef) -> Result<Grammar, CompileError> {
        if def.root().contains.contains(&Child::SelfRef) {
            return Err(CompileError::SelfAtTopLevel {
                language: def.name.clone(),
            });
        }

        let mut cx = Compiler {
            def,
            rules: PrimaryMap::new(),
            memo: HashMap::new(),
        };
        let root = cx.compile_rule(def.root(), None, None, 0)?;

        Ok(Grammar {
            name: def.name.clone(),
            aliases: def.aliases.clone(),
            case_insensitive: def.case_insensitive,
            disable_autodetect: def.disable_autodetect,
            superset_of: def.superset_of.clone(),
            rules: cx.rules,
            root,
        })
    }

    pub fn root(&self) -> RuleId {
        self.root
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey {
    mode: ModeRef,
    variant: Option<usize>,
    /// Only set for modes whose terminator depends on the parent.
    parent: Option<RuleId>,
}

struct Compiler<'a> {
    def: &'a LanguageDef,
    rules: PrimaryMap<RuleId, Rule>,
    memo: HashMap<MemoKey, RuleId>,
}

impl<'a> Compiler<'a> {
    fn invalid(&self, pattern: &str, source: regex::Error) -> CompileError {
        CompileError::InvalidPattern {
            language: self.def.name.clone(),
            pattern: pattern.to_owned(),
            source,
        }
    }

    fn regex(&self, pattern: &str) -> Result<Regex, CompileError> {
        lang_regex(pattern, self.def.case_insensitive).map_err(|e| self.invalid(pattern, e))
    }

    fn alias(&self, scope: &str) -> String {
        match self.def.class_name_aliases.get(scope) {
            Some(alias) => alias.clone(),
            None => scope.to_owned(),
        }
    }

    fn depends_on_parent(&self, mode: &ModeDef) -> bool {
        let mut mode = mode;
        // a `starts` chain may loop back on itself
        for _ in 0..=self.def.modes.len() {
            if mode.end.ends_with_parent() {
                return true;
            }
            match mode.starts {
                Some(next) => mode = self.def.mode(next),
                None => return false,
            }
        }
        false
    }

    fn compile_child(
        &mut self,
        handle: ModeRef,
        parent: RuleId,
        depth: usize,
    ) -> Result<Vec<RuleId>, CompileError> {
        let def = self.def;
        let mode = def.mode(handle);
        if mode.variants.is_empty() {
            return Ok(vec![self.compile_shared(handle, None, mode, Some(parent), depth)?]);
        }
        mode.variants
            .iter()
            .enumerate()
            .map(|(i, variant)| self.compile_shared(handle, Some(i), variant, Some(parent), depth))
            .collect()
    }

    fn compile_shared(
        &mut self,
        handle: ModeRef,
        variant: Option<usize>,
        mode: &ModeDef,
        parent: Option<RuleId>,
        depth: usize,
    ) -> Result<RuleId, CompileError> {
        let key = MemoKey {
            mode: handle,
            variant,
            parent: match self.depends_on_parent(mode) {
                true => parent,
                false => None,
            },
        };
        if let Some(&id) = self.memo.get(&key) {
            return Ok(id);
        }
        self.compile_rule(mode, Some(key), parent, depth)
    }

    /// The root rule is the only one compiled without a memo key.
    fn compile_rule(
        &mut self,
        mode: &ModeDef,
        key: Option<MemoKey>,
        parent: Option<RuleId>,
        depth: usize,
    ) -> Result<RuleId, CompileError> {
        if depth > MAX_DEPTH {
            return Err(CompileError::TooDeep {
                language: self.def.name.clone(),
                limit: MAX_DEPTH,
            });
        }

        let is_root = key.is_none();
        let case_insensitive = self.def.case_insensitive;

        let (begin, keyword_guard, begin_keywords) = match &mode.begin {
            Begin::Always => (String::new(), None, None),
            Begin::Pattern(pattern) => (pattern.clone(), None, None),
            Begin::Keywords(words) => {
                let alternatives = words.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>();
                let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
                let keywords = Keywords::from(words.as_str());
                (pattern, Some(BeginGuard::NotAroundDot), Some(keywords))
            }
        };

        let keyword_def = mode.keywords.as_ref().or(begin_keywords.as_ref());
        let (keywords, keyword_pattern) = match keyword_def {
            Some(k) => {
                let aliased = Keywords {
                    pattern: k.pattern.clone(),
                    categories: k
                        .categories
                        .iter()
                        .map(|(scope, words)| (self.alias(scope), words.clone()))
                        .collect(),
                };
                let pattern = self.regex(k.pattern.as_deref().unwrap_or(r"\w+"))?;
                (Some(KeywordTable::new(&aliased, case_insensitive)), Some(pattern))
            }
            None => (None, None),
        };

        let (terminator, end_re) = match is_root {
            true => (None, None),
            false => {
                let own = match &mode.end {
                    End::SelfClosing => Some(String::new()),
                    End::Pattern(p) | End::PatternOrParent(p) => Some(p.clone()),
                    End::WithParent => None,
                    End::SameAsBegin => Some(begin.clone()),
                };
                let end_re = match &own {
                    Some(source) => Some(
                        anchored_regex(source, case_insensitive)
                            .map_err(|e| self.invalid(source, e))?,
                    ),
                    None => None,
                };
                let inherited = match mode.end.ends_with_parent() {
                    true => parent.and_then(|p| self.rules[p].terminator.clone()),
                    false => None,
                };
                let terminator = match (own, inherited) {
                    (Some(own), Some(inherited)) => Some(format!("{own}|{inherited}")),
                    (own, None) => own,
                    (None, inherited) => inherited,
                };
                (terminator, end_re)
            }
        };

        let scope = mode
            .scope
            .as_deref()
            .map(|s| self.alias(s))
            .filter(|s| !s.is_empty());

        let id = self.rules.push(Rule {
            scope,
            relevance: mode.relevance.unwrap_or(1),
            flags: mode.flags,
            ends_with_parent: mode.end.ends_with_parent(),
            end_same_as_begin: mode.end == End::SameAsBegin,
            begin_guard: mode.begin_guard.or(keyword_guard),
            end_guard: mode.end_guard,
            keywords,
            sub_language: mode.sub_language.clone(),
            starts: None,
            children: Vec::new(),
            begin,
            terminator,
            end_re,
            keyword_pattern,
            matcher: ResumableMatcher::empty(),
        });
        if let Some(key) = key {
            self.memo.insert(key, id);
        }

        let mut children = Vec::new();
        for child in &mode.contains {
            match *child {
                Child::SelfRef => children.push(id),
                Child::Mode(handle) => children.extend(self.compile_child(handle, id, depth + 1)?),
            }
        }

        let starts = match mode.starts {
            Some(handle) => {
                let def = self.def;
                Some(self.compile_shared(handle, None, def.mode(handle), parent, depth + 1)?)
            }
            None => None,
        };

        let mut alternatives = children
            .iter()
            .map(|&c| (self.rules[c].begin.clone(), MatchType::Begin(c)))
            .collect::<Vec<_>>();
        let begin_count = alternatives.len();
        if let Some(terminator) = &self.rules[id].terminator {
            alternatives.push((terminator.clone(), MatchType::End));
        }
        if let Some(illegal) = &mode.illegal {
            alternatives.push((illegal.clone(), MatchType::Illegal));
        }

        let matcher = ResumableMatcher::new(alternatives.clone(), begin_count, case_insensitive);
        let matcher = match matcher {
            Ok(m) => m,
            Err(e) => return Err(self.find_invalid(&alternatives, e)),
        };

        let rule = &mut self.rules[id];
        rule.children = children;
        rule.starts = starts;
        rule.matcher = matcher;

        Ok(id)
    }

    /// Pin a failure of the combined regex on the alternative responsible.
    fn find_invalid(
        &self,
        alternatives: &[(String, MatchType)],
        error: regex::Error,
    ) -> CompileError {
        for (source, _) in alternatives {
            if let Err(e) = lang_regex(source, self.def.case_insensitive) {
                return self.invalid(source, e);
            }
        }
        let combined = alternatives
            .iter()
            .map(|(s, _)| format!("({s})"))
            .collect::<Vec<_>>()
            .join("|");
        self.invalid(&combined, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(grammar: &Grammar, scope: &str) -> Vec<RuleId> {
        grammar
            .rules()
            .filter(|(_, r)| r.scope.as_deref() == Some(scope))
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn test_self_at_top_level() {
        let mut def = LanguageDef::new("broken");
        def.root_mut().contains.push(Child::SelfRef);
        let err = Grammar::new(&def).unwrap_err();
        assert!(matches!(err, CompileError::SelfAtTopLevel { .. }));
    }

    #[test]
    fn test_invalid_pattern_names_culprit() {
        let mut def = LanguageDef::new("broken");
        let ok = def.add(ModeDef::token("number", r"\d+"));
        let bad = def.add(ModeDef::token("string", "(unclosed"));
        def.root_mut().contains = vec![ok.into(), bad.into()];
        match Grammar::new(&def).unwrap_err() {
            CompileError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_shared_mode_compiled_once() {
        let mut def = LanguageDef::new("test");
        let escape = def.add(ModeDef::token("escape", r"\\."));
        let apos = def.add(ModeDef::span("string", "'", "'").contains([escape]));
        let quote = def.add(ModeDef::span("string", "\"", "\"").contains([escape]));
        def.root_mut().contains = vec![apos.into(), quote.into()];

        let grammar = Grammar::new(&def).unwrap();
        assert_eq!(scoped(&grammar, "escape").len(), 1);
        assert_eq!(scoped(&grammar, "string").len(), 2);
    }

    #[test]
    fn test_ends_with_parent_compiled_per_parent() {
        let mut def = LanguageDef::new("test");
        let value = def.add(ModeDef::token("value", "=").ends_with_parent().relevance(0));
        let round = def.add(ModeDef::span("round", r"\(", r"\)").contains([value]));
        let square = def.add(ModeDef::span("square", r"\[", r"\]").contains([value]));
        def.root_mut().contains = vec![round.into(), square.into()];

        let grammar = Grammar::new(&def).unwrap();
        let values = scoped(&grammar, "value");
        assert_eq!(values.len(), 2);
        let mut terminators = values
            .iter()
            .map(|&id| grammar.rule(id).terminator_source().unwrap().to_owned())
            .collect::<Vec<_>>();
        terminators.sort();
        assert_eq!(terminators, [r"\)", r"\]"]);
    }

    #[test]
    fn test_variants_expand() {
        let mut def = LanguageDef::new("test");
        let base = ModeDef::new().scope("string").relevance(0);
        let string = def.add(base.clone().variants(vec![
            ModeDef {
                begin: Begin::Pattern("'".into()),
                end: End::Pattern("'".into()),
                ..base.clone()
            },
            ModeDef {
                begin: Begin::Pattern("\"".into()),
                end: End::Pattern("\"".into()),
                ..base
            },
        ]));
        def.root_mut().contains = vec![string.into()];

        let grammar = Grammar::new(&def).unwrap();
        let root = grammar.rule(grammar.root());
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.matcher.len(), 2);
    }

    #[test]
    fn test_self_reference_resolves_to_own_rule() {
        let mut def = LanguageDef::new("test");
        let parens = def.add(ModeDef::span("parens", r"\(", r"\)").contains([Child::SelfRef]));
        def.root_mut().contains = vec![parens.into()];

        let grammar = Grammar::new(&def).unwrap();
        let id = scoped(&grammar, "parens")[0];
        assert_eq!(grammar.rule(id).children, [id]);
    }

    #[test]
    fn test_runaway_expansion() {
        let mut def = LanguageDef::new("test");
        let nested = def.add(ModeDef::token("x", "x").ends_with_parent());
        def.mode_mut(nested).contains.push(nested.into());
        def.root_mut().contains = vec![nested.into()];
        let err = Grammar::new(&def).unwrap_err();
        assert!(matches!(err, CompileError::TooDeep { .. }));
    }

    #[test]
    fn test_begin_keywords() {
        let mut def = LanguageDef::new("test");
        let class = def.add(ModeDef {
            scope: Some("class".into()),
            begin: Begin::Keywords("class struct".into()),
            end: End::Pattern("[{;]".into()),
            ..Default::default()
        });
        def.root_mut().contains = vec![class.into()];
        let grammar = Grammar::new(&def).unwrap();
        let rule = grammar.rule(scoped(&grammar, "class")[0]);
        assert_eq!(rule.begin_source(), r"\b(?:class|struct)\b");
        assert_eq!(rule.begin_guard, Some(BeginGuard::NotAroundDot));
        assert_eq!(rule.keywords.as_ref().unwrap().get("struct").unwrap().scope, "keyword");
    }

    #[test]
    fn test_class_name_aliases() {
        let mut def = LanguageDef::new("test");
        def.class_name_aliases.insert("dummy".into(), "string".into());
        let mode = def.add(ModeDef::token("dummy", "x"));
        def.root_mut().contains = vec![mode.into()];
        def.root_mut().keywords = Some(Keywords::new().category("dummy", "foo"));
        let grammar = Grammar::new(&def).unwrap();
        assert_eq!(scoped(&grammar, "string").len(), 1);
        let root = grammar.rule(grammar.root());
        assert_eq!(root.keywords.as_ref().unwrap().get("foo").unwrap().scope, "string");
    }
}
