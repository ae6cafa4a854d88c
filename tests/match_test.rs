//! Match tests driving the public engine interface: building matchers from
//! pattern catalogues, filling grids cell by cell and checking the reported
//! match positions.

use gridscan::{Alphabet, MatcherState, Pattern, PatternMatcher};

/// Test data for the match tests: an alphabet, a catalogue, a grid given as
/// `/`-separated rows and the expected match positions per pattern ID.
#[derive(Debug)]
struct TestData {
    name: &'static str,
    alphabet: &'static str,
    patterns: &'static [&'static str],
    grid: &'static str,
    expected: &'static [(usize, &'static [(usize, usize)])],
}

const TEST_DATA: &[TestData] = &[
    TestData {
        name: "SingleSymbol",
        alphabet: "AB",
        patterns: &["A"],
        grid: "ABA",
        expected: &[(0, &[(0, 0), (2, 0)])],
    },
    TestData {
        name: "OverlappingPair",
        alphabet: "BI",
        patterns: &["II"],
        grid: "III",
        expected: &[(0, &[(0, 0), (1, 0)])],
    },
    TestData {
        name: "WildcardMiddleAllMatching",
        alphabet: "BW",
        patterns: &["W*W"],
        grid: "WWWWW",
        expected: &[(0, &[(0, 0), (1, 0), (2, 0)])],
    },
    TestData {
        name: "WildcardMiddleAlternating",
        alphabet: "BW",
        patterns: &["W*W"],
        grid: "WBWBW",
        expected: &[(0, &[(0, 0), (2, 0)])],
    },
    TestData {
        name: "SquareInSquare",
        alphabet: "BW",
        patterns: &["WW/WW"],
        grid: "WWW/WWW/WWW",
        expected: &[(0, &[(0, 0), (1, 0), (0, 1), (1, 1)])],
    },
    TestData {
        name: "ExactRowScan",
        alphabet: "BWR",
        patterns: &["RBB"],
        grid: "BRBBB",
        expected: &[(0, &[(1, 0)])],
    },
    TestData {
        name: "VerticalPattern",
        alphabet: "BW",
        patterns: &["W/B"],
        grid: "WB/BW/WW",
        expected: &[(0, &[(0, 0)])],
    },
    TestData {
        name: "MultiplePatternsShareCells",
        alphabet: "BW",
        patterns: &["WW", "W"],
        grid: "WWW",
        expected: &[(0, &[(0, 0), (1, 0)]), (1, &[(0, 0), (1, 0), (2, 0)])],
    },
    TestData {
        name: "FullWildcardMatchesEverywhere",
        alphabet: "BW",
        patterns: &["*"],
        grid: "WB/BW",
        expected: &[(0, &[(0, 0), (1, 0), (0, 1), (1, 1)])],
    },
    TestData {
        name: "TallAndWide",
        alphabet: "BWR",
        patterns: &["RW/WR", "BB"],
        grid: "RWB/WRB/BBB",
        expected: &[(0, &[(0, 0)]), (1, &[(0, 2), (1, 2)])],
    },
];

fn build_state(data: &TestData) -> (PatternMatcher, MatcherState) {
    let alphabet: Alphabet = data.alphabet.parse().unwrap();
    let patterns = data
        .patterns
        .iter()
        .map(|text| Pattern::parse(text, &alphabet).unwrap())
        .collect();
    let matcher = PatternMatcher::new(alphabet, patterns).unwrap();
    let rows: Vec<&str> = data.grid.split('/').collect();
    let mut state = matcher
        .make_state(rows[0].chars().count(), rows.len())
        .unwrap();
    fill(&mut state, &matcher, data.grid);
    (matcher, state)
}

fn fill(state: &mut MatcherState, matcher: &PatternMatcher, grid: &str) {
    for (y, row) in grid.split('/').enumerate() {
        for (x, symbol) in row.chars().enumerate() {
            state
                .set(x, y, matcher.alphabet().index_of(symbol).unwrap())
                .unwrap();
        }
    }
}

#[test]
fn test_match_positions() {
    let _ = env_logger::builder().is_test(true).try_init();

    for data in TEST_DATA {
        let (_, state) = build_state(data);
        for &(pattern_id, expected) in data.expected {
            let mut expected: Vec<(usize, usize)> = expected.to_vec();
            expected.sort_by_key(|&(x, y)| (y, x));
            assert_eq!(
                state.match_positions(pattern_id).unwrap(),
                expected,
                "{}: wrong positions for pattern {}",
                data.name,
                pattern_id
            );
            assert_eq!(
                state.count_matches(pattern_id).unwrap(),
                expected.len(),
                "{}: wrong count for pattern {}",
                data.name,
                pattern_id
            );
        }
    }
}

#[test]
fn test_single_cell_edit_creates_and_destroys_match() {
    let alphabet: Alphabet = "BI".parse().unwrap();
    let patterns = vec![Pattern::parse("I", &alphabet).unwrap()];
    let matcher = PatternMatcher::new(alphabet, patterns).unwrap();
    let mut state = matcher.make_state(2, 2).unwrap();

    assert_eq!(state.count_matches(0).unwrap(), 0);
    state.set(1, 1, 1).unwrap();
    assert_eq!(state.count_matches(0).unwrap(), 1);
    assert_eq!(state.match_positions(0).unwrap(), vec![(1, 1)]);
    state.set(1, 1, 0).unwrap();
    assert_eq!(state.count_matches(0).unwrap(), 0);
}

#[test]
fn test_edit_shifts_exact_match() {
    let alphabet: Alphabet = "BWR".parse().unwrap();
    let patterns = vec![Pattern::parse("RBB", &alphabet).unwrap()];
    let matcher = PatternMatcher::new(alphabet.clone(), patterns).unwrap();
    let mut state = matcher.make_state(5, 1).unwrap();
    let mut set = |state: &mut MatcherState, x: usize, symbol: char| {
        state.set(x, 0, alphabet.index_of(symbol).unwrap()).unwrap();
    };
    for (x, symbol) in "BRBBB".chars().enumerate() {
        set(&mut state, x, symbol);
    }
    assert_eq!(state.match_positions(0).unwrap(), vec![(1, 0)]);

    // "RRBBB" still contains exactly one occurrence, starting at column 1.
    set(&mut state, 0, 'R');
    assert_eq!(state.match_positions(0).unwrap(), vec![(1, 0)]);
}

#[test]
fn test_set_pattern_stamps_payload_only() {
    let alphabet: Alphabet = "BW".parse().unwrap();
    let patterns = vec![
        Pattern::parse("WW/WW", &alphabet).unwrap(),
        Pattern::parse("W*W", &alphabet).unwrap(),
    ];
    let matcher = PatternMatcher::new(alphabet.clone(), patterns).unwrap();
    let mut state = matcher.make_state(4, 3).unwrap();

    let stamp = Pattern::parse("W*W", &alphabet).unwrap();
    state.set_pattern(1, 1, &stamp).unwrap();
    // The wildcard cell stays B, so only the outer cells were written.
    assert_eq!(state.grid().get(1, 1).unwrap(), 1);
    assert_eq!(state.grid().get(2, 1).unwrap(), 0);
    assert_eq!(state.grid().get(3, 1).unwrap(), 1);
    assert_eq!(state.match_positions(1).unwrap(), vec![(1, 1)]);

    let square = Pattern::parse("WW/WW", &alphabet).unwrap();
    state.set_pattern(0, 0, &square).unwrap();
    assert_eq!(state.match_positions(0).unwrap(), vec![(0, 0)]);
}

#[test]
fn test_random_match_samples_current_matches() {
    use rand::{rngs::StdRng, SeedableRng};

    let alphabet: Alphabet = "BW".parse().unwrap();
    let patterns = vec![Pattern::parse("W", &alphabet).unwrap()];
    let matcher = PatternMatcher::new(alphabet, patterns).unwrap();
    let mut state = matcher.make_state(4, 4).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    assert_eq!(state.random_match(0, &mut rng).unwrap(), None);

    let targets = [(0, 0), (3, 1), (2, 3)];
    for &(x, y) in &targets {
        state.set(x, y, 1).unwrap();
    }
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..200 {
        let hit = state.random_match(0, &mut rng).unwrap().unwrap();
        assert!(targets.contains(&hit), "sampled a non-match {:?}", hit);
        seen.insert(hit);
    }
    assert_eq!(seen.len(), targets.len(), "sampling never saw some match");
}

#[cfg(feature = "serde")]
#[test]
fn test_catalogue_serde_roundtrip() {
    let alphabet: Alphabet = "BWR".parse().unwrap();
    let pattern = Pattern::parse("BW/R*", &alphabet).unwrap();

    let alphabet_json = serde_json::to_string(&alphabet).unwrap();
    let pattern_json = serde_json::to_string(&pattern).unwrap();
    let alphabet_back: Alphabet = serde_json::from_str(&alphabet_json).unwrap();
    let pattern_back: Pattern = serde_json::from_str(&pattern_json).unwrap();

    assert_eq!(alphabet_back, alphabet);
    assert_eq!(pattern_back, pattern);
    // The rebuilt pattern carries the derived representations as well.
    assert_eq!(pattern_back.key(), pattern.key());
    assert_eq!(pattern_back.payload(), pattern.payload());
}
