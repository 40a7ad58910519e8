//! Multi-pattern matching.
//!
//! All alternatives of a rule are joined into a single regex where every
//! alternative is wrapped in its own capture group, one search then tells both
//! where the next interesting thing is and which alternative found it.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

pub(crate) fn lang_regex(source: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .multi_line(true)
        .case_insensitive(case_insensitive)
        .build()
}

/// A regex which only matches at the start of the haystack.
pub(crate) fn anchored_regex(source: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    lang_regex(&format!(r"\A(?:{source})"), case_insensitive)
}

/// Number of capture groups the pattern declares.
pub(crate) fn count_groups(source: &str) -> Result<usize, regex::Error> {
    Ok(lang_regex(source, false)?.captures_len() - 1)
}

pub(crate) fn next_char_boundary(text: &str, index: usize) -> usize {
    match text.get(index..).and_then(|s| s.chars().next()) {
        Some(c) => index + c.len_utf8(),
        None => index + 1,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegexMatch<T> {
    pub payload: T,
    /// Index of the alternative within the full rule list.
    pub position: usize,
    pub start: usize,
    pub end: usize,
    /// The first capture group declared inside the alternative, if it participated.
    pub first_group: Option<(usize, usize)>,
}

impl<T> RegexMatch<T> {
    pub fn lexeme<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.start..self.end]
    }
    pub fn first_group<'a>(&self, haystack: &'a str) -> Option<&'a str> {
        self.first_group.map(|(start, end)| &haystack[start..end])
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry<T> {
    payload: T,
    group: usize,
    inner_groups: usize,
}

#[derive(Clone, Debug)]
pub struct MultiRegex<T> {
    regex: Option<Regex>,
    entries: Vec<Entry<T>>,
    /// Position of the first entry within the full rule list.
    offset: usize,
}

impl<T: Copy> MultiRegex<T> {
    pub fn new<'a>(
        rules: impl IntoIterator<Item = (&'a str, T)>,
        offset: usize,
        case_insensitive: bool,
    ) -> Result<MultiRegex<T>, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|(pattern, payload)| {
                count_groups(pattern).map(|groups| (pattern, groups, payload))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        MultiRegex::with_groups(rules, offset, case_insensitive)
    }

    /// Like [`MultiRegex::new`] with the group count of every pattern known.
    fn with_groups<'a>(
        rules: impl IntoIterator<Item = (&'a str, usize, T)>,
        offset: usize,
        case_insensitive: bool,
    ) -> Result<MultiRegex<T>, regex::Error> {
        let mut source = String::new();
        let mut entries = Vec::new();
        let mut group = 1;
        for (pattern, inner_groups, payload) in rules {
            if !entries.is_empty() {
                source.push('|');
            }
            source.push('(');
            source.push_str(pattern);
            source.push(')');

            entries.push(Entry {
                payload,
                group,
                inner_groups,
            });
            group += inner_groups + 1;
        }

        let regex = match entries.is_empty() {
            true => None,
            false => Some(lang_regex(&source, case_insensitive)?),
        };

        Ok(MultiRegex {
            regex,
            entries,
            offset,
        })
    }

    pub fn exec(&self, haystack: &str, at: usize) -> Option<RegexMatch<T>> {
        let regex = self.regex.as_ref()?;
        if at > haystack.len() {
            return None;
        }
        let captures = regex.captures_at(haystack, at)?;
        let (index, entry) = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, e)| captures.get(e.group).is_some())?;
        let whole = captures.get(entry.group)?;
        let first_group = match entry.inner_groups {
            0 => None,
            _ => captures.get(entry.group + 1).map(|m| (m.start(), m.end())),
        };
        Some(RegexMatch {
            payload: entry.payload,
            position: self.offset + index,
            start: whole.start(),
            end: whole.end(),
            first_group,
        })
    }
}

/// A [`MultiRegex`] which can resume a search from any alternative.
///
/// When the scanner rejects a match it asks for the next match at the same
/// offset while skipping the alternatives already tried. The suffix matchers
/// needed for that are built on first use.
#[derive(Debug)]
pub struct ResumableMatcher<T> {
    rules: Vec<(String, T)>,
    groups: Vec<usize>,
    begin_count: usize,
    case_insensitive: bool,
    first: MultiRegex<T>,
    suffixes: Vec<OnceLock<Result<MultiRegex<T>, regex::Error>>>,
}

impl<T: Copy> ResumableMatcher<T> {
    /// The first `begin_count` rules are the ones a search may be resumed after.
    pub fn new(
        rules: Vec<(String, T)>,
        begin_count: usize,
        case_insensitive: bool,
    ) -> Result<ResumableMatcher<T>, regex::Error> {
        let groups = rules
            .iter()
            .map(|(source, _)| count_groups(source))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let first = MultiRegex::with_groups(
            rules.iter().zip(&groups).map(|((s, t), &g)| (s.as_str(), g, *t)),
            0,
            case_insensitive,
        )?;
        let suffixes = (1..rules.len().max(1)).map(|_| OnceLock::new()).collect();
        Ok(ResumableMatcher {
            rules,
            groups,
            begin_count,
            case_insensitive,
            first,
            suffixes,
        })
    }

    pub fn empty() -> ResumableMatcher<T> {
        ResumableMatcher {
            rules: Vec::new(),
            groups: Vec::new(),
            begin_count: 0,
            case_insensitive: false,
            first: MultiRegex {
                regex: None,
                entries: Vec::new(),
                offset: 0,
            },
            suffixes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(s, _)| s.as_str())
    }

    fn matcher(&self, from: usize) -> Result<Option<&MultiRegex<T>>, regex::Error> {
        if from == 0 {
            return Ok(Some(&self.first));
        }
        let Some(cell) = self.suffixes.get(from - 1) else {
            return Ok(None);
        };
        let built = cell.get_or_init(|| {
            let rules = self.rules[from..].iter().zip(&self.groups[from..]);
            MultiRegex::with_groups(
                rules.map(|((s, t), &g)| (s.as_str(), g, *t)),
                from,
                self.case_insensitive,
            )
        });
        match built {
            Ok(m) => Ok(Some(m)),
            Err(e) => Err(e.clone()),
        }
    }

    /// Finds the next match at or after `last_index`, considering alternatives
    /// starting at `regex_index`. A non-zero `regex_index` means the previous
    /// match at `last_index` was rejected, if no other alternative matches
    /// there the search restarts from the first alternative one character later.
    ///
    /// `regex_index` is advanced past the matched alternative.
    pub fn exec(
        &self,
        haystack: &str,
        last_index: usize,
        regex_index: &mut usize,
    ) -> Result<Option<RegexMatch<T>>, regex::Error> {
        let mut result = match self.matcher(*regex_index)? {
            Some(m) => m.exec(haystack, last_index),
            None => None,
        };

        if *regex_index != 0 && !result.is_some_and(|m| m.start == last_index) {
            let next = next_char_boundary(haystack, last_index);
            result = self.first.exec(haystack, next);
        }

        if let Some(m) = &result {
            *regex_index = m.position + 1;
            if *regex_index == self.begin_count {
                *regex_index = 0;
            }
        }

        Ok(result)
    }
}

#[test]
fn test_count_groups() {
    let cases = [
        (r"abc", 0),
        (r"(a)(b)", 2),
        (r"(?:a)(b)", 1),
        (r"\(a\)", 0),
        (r"[(]a", 0),
        (r"[]()](x)", 1),
        (r"[^]()](x)", 1),
        (r"(?P<name>a)(?i:b)", 1),
        (r"((a)|(b))", 3),
        (r"[a-z[(]](c)", 1),
        ("(?x)a # (not a group)\n(b)", 1),
        (r"(?x) (a) \# (b)", 2),
    ];
    for (case, expected) in cases {
        assert_eq!(count_groups(case).unwrap(), expected, "{case}");
    }
    assert!(count_groups("(a").is_err());
}

#[test]
fn test_verbose_alternative_keeps_payload() {
    // the parenthesis inside the comment is not a group
    let verbose = "(?x)a # (c)\n";
    let m = MultiRegex::new([(verbose, 'a'), ("(b)", 'b')], 0, false).unwrap();
    let found = m.exec("xb", 0).unwrap();
    assert_eq!(found.payload, 'b');
    assert_eq!(found.first_group("xb"), Some("b"));

    let rules = vec![(verbose.to_owned(), 0), ("(b)".to_owned(), 1)];
    let matcher = ResumableMatcher::new(rules, 2, false).unwrap();
    let mut index = 1;
    let found = matcher.exec("b", 0, &mut index).unwrap().unwrap();
    assert_eq!((found.payload, found.first_group("b")), (1, Some("b")));
}

#[test]
fn test_earlier_alternative_wins() {
    let m = MultiRegex::new([("fo+", 'a'), ("(f)(o)o", 'b'), ("x", 'c')], 0, false).unwrap();
    let found = m.exec("xfoo", 1).unwrap();
    assert_eq!(found.payload, 'a');
    assert_eq!((found.start, found.end), (1, 4));

    let m = MultiRegex::new([("(f)(o)o", 'b'), ("fo+", 'a'), ("(x)", 'c')], 0, false).unwrap();
    let found = m.exec("foo x", 0).unwrap();
    assert_eq!(found.payload, 'b');
    assert_eq!(found.first_group("foo x"), Some("f"));
    let found = m.exec("foo x", 3).unwrap();
    assert_eq!(found.payload, 'c');
    assert_eq!(found.position, 2);
    assert_eq!(found.first_group("foo x"), Some("x"));
}

#[test]
fn test_resume_after_rejected_match() {
    let rules = vec![
        ("a".to_owned(), 0),
        ("ab".to_owned(), 1),
        ("b".to_owned(), 2),
    ];
    let matcher = ResumableMatcher::new(rules, 3, false).unwrap();

    let mut index = 0;
    let m = matcher.exec("abab", 0, &mut index).unwrap().unwrap();
    assert_eq!((m.payload, m.start), (0, 0));
    assert_eq!(index, 1);

    // reject `a`, the next alternative matches at the same offset
    let m = matcher.exec("abab", 0, &mut index).unwrap().unwrap();
    assert_eq!((m.payload, m.start, m.end), (1, 0, 2));
    assert_eq!(index, 2);

    // reject `ab`, nothing else matches at 0 so the search moves one character on
    let m = matcher.exec("abab", 0, &mut index).unwrap().unwrap();
    assert_eq!((m.payload, m.start), (2, 1));
    // the last alternative wraps around
    assert_eq!(index, 0);
}

#[test]
fn test_resume_advances_by_char() {
    let rules = vec![("é".to_owned(), 0), ("x".to_owned(), 1)];
    let matcher = ResumableMatcher::new(rules, 2, false).unwrap();
    let mut index = 1;
    let m = matcher.exec("éé", 0, &mut index).unwrap().unwrap();
    assert_eq!(m.start, 2);
}

#[test]
fn test_empty_matcher() {
    let matcher = ResumableMatcher::<u8>::empty();
    let mut index = 0;
    assert!(matcher.exec("anything", 0, &mut index).unwrap().is_none());
}
