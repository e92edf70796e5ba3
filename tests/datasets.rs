// Additional integration tests for level catalog invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use memory_match::levels::{self, GLOSSARY, LEVEL1_PAIRS, LEVEL2_PAIRS, THEMES, pair_count};

#[test]
fn every_level_has_valid_quiz() {
    for lvl in memory_match::catalog() {
        assert!(!lvl.quiz.question.is_empty(), "level {} has no question", lvl.number);
        assert!(lvl.quiz.options.len() >= 2, "level {} has too few options", lvl.number);
        assert!(
            lvl.quiz.answer < lvl.quiz.options.len(),
            "level {} answer index {} out of range",
            lvl.number,
            lvl.quiz.answer
        );
        let unique: HashSet<&String> = lvl.quiz.options.iter().collect();
        assert_eq!(unique.len(), lvl.quiz.options.len(), "duplicate option in level {}", lvl.number);
    }
}

#[test]
fn templated_levels_follow_pair_count_rule() {
    for n in 3..=levels::LAST_LEVEL {
        let lvl = memory_match::level(n).unwrap();
        assert_eq!(lvl.pairs.len(), pair_count(n), "level {n}");
        assert!(!lvl.theme.is_empty() && !lvl.lesson.is_empty());
    }
}

#[test]
fn hand_authored_levels_match_tables() {
    let l1 = memory_match::level(1).unwrap();
    assert_eq!(l1.pairs.len(), LEVEL1_PAIRS.len());
    assert_eq!(l1.pairs[0].term, LEVEL1_PAIRS[0].0);
    let l2 = memory_match::level(2).unwrap();
    assert_eq!(l2.pairs.len(), LEVEL2_PAIRS.len());
}

#[test]
fn glossary_entries_are_unique_and_nonempty() {
    let mut terms = HashSet::new();
    for (term, definition) in GLOSSARY.iter() {
        assert!(terms.insert(*term), "duplicate glossary term '{term}'");
        assert!(!definition.is_empty(), "empty definition for '{term}'");
    }
    assert!(GLOSSARY.len() >= 6);
    assert_eq!(THEMES.len(), (levels::LAST_LEVEL - 2) as usize);
}

#[test]
fn definitions_unique_within_level() {
    for lvl in memory_match::catalog() {
        let defs: HashSet<&str> = lvl.pairs.iter().map(|p| p.definition.as_str()).collect();
        assert_eq!(defs.len(), lvl.pairs.len(), "duplicate definition in level {}", lvl.number);
    }
}
