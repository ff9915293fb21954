use super::{build_tree, TreeBuilder};
use crate::error::Error;
use crate::formats::HeadingMarker;
use crate::node::Tree;
use crate::outline::OutlineEntry;
use crate::similarity::MatchStrategy;
use proptest::prelude::*;
use std::sync::atomic::AtomicBool;

fn outline(entries: &[(usize, &str)]) -> Vec<OutlineEntry> {
    entries
        .iter()
        .map(|&(level, title)| OutlineEntry::new(level, title))
        .collect()
}

fn build(text: &str, entries: &[(usize, &str)]) -> Tree {
    build_tree(
        text,
        &outline(entries),
        MatchStrategy::Contains,
        HeadingMarker::default(),
    )
}

fn headings_of(tree: &Tree, id: usize) -> Vec<String> {
    tree.children(id).map(|n| n.heading.clone()).collect()
}

#[test]
fn test_intro_details_scenario() {
    let tree = build(
        "# Intro\nHello\n## Details\nWorld\n",
        &[(1, "Intro"), (2, "Details")],
    );

    assert_eq!(headings_of(&tree, Tree::ROOT), vec!["Intro"]);
    let intro = tree.get(1).unwrap();
    assert_eq!(intro.content, vec!["Hello"]);
    assert_eq!(headings_of(&tree, 1), vec!["Details"]);
    let details = tree.get(2).unwrap();
    assert_eq!(details.content, vec!["World"]);
    assert_eq!(details.parent_index, Some(1));
}

#[test]
fn test_empty_outline_keeps_everything_in_root() {
    let text = "# Title\nfirst\n\n## Section\nsecond\n";

    let tree = build(text, &[]);

    assert!(tree.is_empty());
    assert_eq!(
        tree.root().content,
        vec!["# Title", "first", "## Section", "second"]
    );
}

#[test]
fn test_blank_lines_are_ignored() {
    let tree = build("# Intro\n\n   \nHello\n\n", &[(1, "Intro")]);

    assert_eq!(tree.get(1).unwrap().content, vec!["Hello"]);
    assert!(tree.root().content.is_empty());
}

#[test]
fn test_text_before_first_heading_belongs_to_root() {
    let tree = build("Preamble\n# Intro\nBody\n", &[(1, "Intro")]);

    assert_eq!(tree.root().content, vec!["Preamble"]);
    assert_eq!(tree.get(1).unwrap().content, vec!["Body"]);
}

#[test]
fn test_rejected_heading_becomes_content_and_keeps_cursor() {
    let entries = outline(&[(1, "Intro"), (1, "Methods")]);
    let mut builder = TreeBuilder::new(&entries, MatchStrategy::Contains, HeadingMarker::default());

    builder.feed_line("# Intro");
    assert_eq!(builder.cursor(), 1);

    builder.feed_line("## Figure 1: overview");
    assert_eq!(builder.cursor(), 1, "a rejected heading must not advance");
    assert_eq!(builder.expected().unwrap().title, "Methods");

    builder.feed_line("# Methods");
    assert_eq!(builder.cursor(), 2);

    let tree = builder.finish();
    assert_eq!(tree.get(1).unwrap().content, vec!["## Figure 1: overview"]);
    assert_eq!(headings_of(&tree, Tree::ROOT), vec!["Intro", "Methods"]);
}

#[test]
fn test_cursor_never_looks_ahead() {
    // "Results" is in the outline, but only after "Methods", which never shows up
    let tree = build(
        "# Intro\na\n# Results\nb\n",
        &[(1, "Intro"), (1, "Methods"), (1, "Results")],
    );

    assert_eq!(headings_of(&tree, Tree::ROOT), vec!["Intro"]);
    assert_eq!(tree.get(1).unwrap().content, vec!["a", "# Results", "b"]);
}

#[test]
fn test_exhausted_outline_appends_remaining_lines() {
    let tree = build("# Intro\na\n# Appendix\nb\n", &[(1, "Intro")]);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get(1).unwrap().content, vec!["a", "# Appendix", "b"]);
}

#[test]
fn test_malformed_heading_is_content() {
    let tree = build("# Intro\n##\nbody\n", &[(1, "Intro"), (2, "Details")]);

    assert_eq!(tree.get(1).unwrap().content, vec!["##", "body"]);
}

#[test]
fn test_sibling_and_uncle_attachment() {
    let text = "# A\n## B\n### C\n## D\n# E\n";
    let tree = build(text, &[(1, "A"), (2, "B"), (3, "C"), (2, "D"), (1, "E")]);

    assert_eq!(headings_of(&tree, Tree::ROOT), vec!["A", "E"]);
    assert_eq!(headings_of(&tree, 1), vec!["B", "D"]);
    assert_eq!(headings_of(&tree, 2), vec!["C"]);
    assert!(tree.levels_are_consistent());
}

#[test]
fn test_level_gaps_are_allowed() {
    // Levels only need to increase, not to be contiguous
    let tree = build("# A\n# B\n# C\n", &[(1, "A"), (3, "B"), (2, "C")]);

    assert_eq!(headings_of(&tree, Tree::ROOT), vec!["A"]);
    assert_eq!(headings_of(&tree, 1), vec!["B", "C"]);
    assert!(tree.levels_are_consistent());
}

#[test]
fn test_stale_frontier_entries_are_ignored() {
    // After D (level 1) the level-2 entry B belongs to the previous chapter
    let text = "# A\n# B\n# C\n# D\n# E\n# F\n";
    let tree = build(
        text,
        &[(1, "A"), (2, "B"), (3, "C"), (1, "D"), (3, "E"), (3, "F")],
    );

    let d = 4;
    assert_eq!(tree.get(d).unwrap().heading, "D");
    assert_eq!(headings_of(&tree, d), vec!["E", "F"]);
    assert_eq!(headings_of(&tree, 2), vec!["C"]);
    assert!(tree.levels_are_consistent());
}

#[test]
fn test_heading_text_comes_from_the_line() {
    let tree = build("## 1 INTRODUCTION\n", &[(1, "Introduction")]);

    assert_eq!(tree.get(1).unwrap().heading, "1 INTRODUCTION");
    assert_eq!(tree.get(1).unwrap().level, 1);
}

#[test]
fn test_ratio_strategy_accepts_near_misses() {
    let entries = outline(&[(1, "Related Work"), (1, "Conclusion")]);
    let tree = build_tree(
        "# Related  Work\ntext\n# Conclusions\nend\n",
        &entries,
        MatchStrategy::ratio(0.7).unwrap(),
        HeadingMarker::default(),
    );

    assert_eq!(
        headings_of(&tree, Tree::ROOT),
        vec!["Related  Work", "Conclusions"]
    );
}

#[test]
fn test_custom_marker() {
    let entries = outline(&[(1, "Intro")]);
    let tree = build_tree(
        "= Intro\n# not a heading\n",
        &entries,
        MatchStrategy::Contains,
        HeadingMarker('='),
    );

    assert_eq!(tree.get(1).unwrap().content, vec!["# not a heading"]);
}

#[test]
fn test_cancellation_between_lines() {
    let entries = outline(&[(1, "Intro")]);
    let mut builder = TreeBuilder::new(&entries, MatchStrategy::Contains, HeadingMarker::default());

    let running = AtomicBool::new(false);
    builder
        .feed_text_cancellable("# Intro\nHello\n", &running)
        .unwrap();
    assert_eq!(builder.tree().len(), 2);

    let cancelled = AtomicBool::new(true);
    let err = builder
        .feed_text_cancellable("more\n", &cancelled)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(builder.tree().get(1).unwrap().content, vec!["Hello"]);
}

fn arb_document() -> impl Strategy<Value = (Vec<(usize, String)>, Vec<String>)> {
    let titles = prop::sample::select(vec!["Alpha", "Beta", "Gamma", "Delta", "Omega"]);
    let entry = (1usize..6, titles.clone()).prop_map(|(level, title)| (level, title.to_string()));
    let line = prop_oneof![
        (1usize..4, titles).prop_map(|(depth, title)| format!("{} {title}", "#".repeat(depth))),
        "[a-z ]{0,12}".prop_map(String::from),
        Just("##".to_string()),
    ];
    (
        prop::collection::vec(entry, 0..12),
        prop::collection::vec(line, 0..40),
    )
}

proptest! {
    #[test]
    fn prop_levels_increase_along_every_edge((entries, lines) in arb_document()) {
        let entries: Vec<OutlineEntry> = entries
            .into_iter()
            .map(|(level, title)| OutlineEntry::new(level, title))
            .collect();
        let text = lines.join("\n");

        let mut builder = TreeBuilder::new(&entries, MatchStrategy::Contains, HeadingMarker::default());
        builder.feed_text(&text);
        let cursor = builder.cursor();
        let tree = builder.finish();

        prop_assert!(tree.levels_are_consistent());
        prop_assert_eq!(tree.len(), cursor + 1);
        prop_assert!(cursor <= entries.len());
        prop_assert_eq!(tree.preorder().count(), tree.len());

        let non_blank = lines.iter().filter(|l| !l.trim().is_empty()).count();
        let content: usize = tree.preorder().map(|id| tree.get(id).unwrap().content.len()).sum();
        prop_assert_eq!(content + tree.len() - 1, non_blank);
    }

    #[test]
    fn prop_empty_outline_is_root_only(lines in prop::collection::vec("[#a-z ]{0,10}", 0..30)) {
        let text = lines.join("\n");
        let tree = build_tree(&text, &[], MatchStrategy::Contains, HeadingMarker::default());

        let expected: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        prop_assert!(tree.is_empty());
        prop_assert_eq!(&tree.root().content, &expected);
    }
}
