use glimmer_languages::{highlighter, LANGUAGES};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // the leaves of the token tree always spell out the input again
    #[test]
    fn every_language_keeps_the_text(
        code in "[a-zA-Z0-9 \t\n<>/\"'{}()\\[\\]:;=#$@*.,+-]{0,48}",
        ignore_illegals in any::<bool>(),
    ) {
        let highlighter = highlighter().unwrap();
        for (name, _) in LANGUAGES {
            let result = highlighter.highlight(&code, name, ignore_illegals).unwrap();
            prop_assert_eq!(result.tree.text(), code.as_str(), "language {}", name);
            if result.illegal {
                prop_assert!(result.illegal_by.is_some() || result.error_raised.is_some());
            }
            if result.illegal_by.is_some() {
                prop_assert!(!ignore_illegals);
            }
        }
    }

    #[test]
    fn auto_detection_keeps_the_text(code in ".{0,32}") {
        let highlighter = highlighter().unwrap();
        let result = highlighter.highlight_auto(&code, None);
        prop_assert_eq!(result.tree.text(), code);
        if let Some(second) = result.second_best() {
            prop_assert!(second.relevance <= result.relevance);
        }
    }
}
