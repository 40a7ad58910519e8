use std::collections::HashMap;

use crate::def::Keywords;

/// Words that appear in ordinary prose and code alike, they classify but never
/// count towards a language's score.
const COMMON_KEYWORDS: &[&str] = &[
    "of", "and", "for", "in", "not", "or", "if", "then", "parent", "list", "value",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordMatch {
    pub scope: String,
    pub relevance: u32,
}

#[derive(Clone, Debug, Default)]
pub struct KeywordTable {
    words: HashMap<String, KeywordMatch>,
}

impl KeywordTable {
    pub fn new(keywords: &Keywords, case_insensitive: bool) -> KeywordTable {
        let mut words = HashMap::new();
        for (scope, list) in &keywords.categories {
            let list = match case_insensitive {
                true => list.to_lowercase(),
                false => list.clone(),
            };
            for entry in list.split(' ').filter(|w| !w.is_empty()) {
                let (word, relevance) = parse_entry(entry);
                words.insert(
                    word.to_owned(),
                    KeywordMatch {
                        scope: scope.clone(),
                        relevance,
                    },
                );
            }
        }
        KeywordTable { words }
    }

    pub fn get(&self, word: &str) -> Option<&KeywordMatch> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn parse_entry(entry: &str) -> (&str, u32) {
    if let Some((word, weight)) = entry.split_once('|') {
        if let Ok(weight) = weight.parse() {
            return (word, weight);
        }
        return (word, score_for(word));
    }
    (entry, score_for(entry))
}

fn score_for(word: &str) -> u32 {
    match COMMON_KEYWORDS.contains(&word.to_ascii_lowercase().as_str()) {
        true => 0,
        false => 1,
    }
}

#[test]
fn test_shorthand() {
    let keywords = Keywords::new()
        .category("keyword", "if  while|5 of")
        .category("literal", "true While");
    let table = KeywordTable::new(&keywords, false);

    assert_eq!(table.len(), 5);
    assert_eq!(table.get("if").unwrap().relevance, 0);
    assert_eq!(table.get("of").unwrap().relevance, 0);
    assert_eq!(table.get("while").unwrap().relevance, 5);
    assert_eq!(table.get("While").unwrap().scope, "literal");
    assert_eq!(table.get("true").unwrap().relevance, 1);
}

#[test]
fn test_case_insensitive_later_category_wins() {
    let keywords = Keywords::new()
        .category("keyword", "SELECT from")
        .category("built_in", "FROM|2");
    let table = KeywordTable::new(&keywords, true);

    assert!(table.get("SELECT").is_none());
    assert_eq!(table.get("select").unwrap().scope, "keyword");
    let from = table.get("from").unwrap();
    assert_eq!(from.scope, "built_in");
    assert_eq!(from.relevance, 2);
}
