//! Randomised property tests: after arbitrary edit sequences the engine must
//! agree with a naive rescan of the whole grid, for every pattern. This
//! covers soundness (every reported match holds) and completeness (every
//! holding match is reported) of the incremental recomputation.

use gridscan::{Alphabet, MatcherState, Pattern, PatternMatcher};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ALPHABET: &str = "BWR";
const PATTERNS: &[&str] = &["W", "BW", "RB", "B*R", "WW/WW", "R/W", "BWB", "*W/W*"];

fn build(width: usize, height: usize) -> (PatternMatcher, MatcherState) {
    let _ = env_logger::builder().is_test(true).try_init();
    let alphabet: Alphabet = ALPHABET.parse().unwrap();
    let patterns = PATTERNS
        .iter()
        .map(|text| Pattern::parse(text, &alphabet).unwrap())
        .collect();
    let matcher = PatternMatcher::new(alphabet, patterns).unwrap();
    let state = matcher.make_state(width, height).unwrap();
    (matcher, state)
}

/// Rescan the whole grid for one pattern by brute force.
fn naive_matches(state: &MatcherState, pattern: &Pattern) -> Vec<(usize, usize)> {
    let mut positions = Vec::new();
    if pattern.width() > state.width() || pattern.height() > state.height() {
        return positions;
    }
    for y in 0..=(state.height() - pattern.height()) {
        for x in 0..=(state.width() - pattern.width()) {
            let holds = pattern
                .payload()
                .iter()
                .all(|&(dx, dy, symbol)| state.grid().get(x + dx, y + dy).unwrap() == symbol);
            if holds {
                positions.push((x, y));
            }
        }
    }
    positions.sort_by_key(|&(x, y)| (y, x));
    positions
}

fn assert_agrees_with_naive(matcher: &PatternMatcher, state: &MatcherState, context: &str) {
    for (pattern_id, pattern) in matcher.patterns().iter().enumerate() {
        let expected = naive_matches(state, pattern);
        assert_eq!(
            state.match_positions(pattern_id).unwrap(),
            expected,
            "{}: pattern {} ('{}') diverged from the naive rescan",
            context,
            pattern_id,
            pattern
        );
        assert_eq!(state.count_matches(pattern_id).unwrap(), expected.len());
    }
}

#[test]
fn test_random_single_cell_edits() {
    let (matcher, mut state) = build(12, 9);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    assert_agrees_with_naive(&matcher, &state, "initial");

    for step in 0..400 {
        let x = rng.gen_range(0..state.width());
        let y = rng.gen_range(0..state.height());
        let symbol = rng.gen_range(0..matcher.alphabet().len());
        state.set(x, y, symbol).unwrap();
        if step % 7 == 0 {
            assert_agrees_with_naive(&matcher, &state, &format!("step {}", step));
        }
    }
    assert_agrees_with_naive(&matcher, &state, "final");
}

#[test]
fn test_random_pattern_stamps() {
    let (matcher, mut state) = build(10, 10);
    let mut rng = StdRng::seed_from_u64(0xfeed);

    for step in 0..120 {
        let pattern = matcher.patterns()[rng.gen_range(0..matcher.pattern_count())].clone();
        let x = rng.gen_range(0..=(state.width() - pattern.width()));
        let y = rng.gen_range(0..=(state.height() - pattern.height()));
        state.set_pattern(x, y, &pattern).unwrap();
        assert_agrees_with_naive(&matcher, &state, &format!("stamp {}", step));
    }
}

#[test]
fn test_full_recompute_is_observably_idempotent() {
    let (matcher, mut state) = build(8, 8);
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..60 {
        let x = rng.gen_range(0..state.width());
        let y = rng.gen_range(0..state.height());
        let symbol = rng.gen_range(0..matcher.alphabet().len());
        state.set(x, y, symbol).unwrap();
    }

    let before: Vec<_> = (0..matcher.pattern_count())
        .map(|id| state.match_positions(id).unwrap())
        .collect();
    state.recompute(0, 0, 8, 8).unwrap();
    state.recompute(0, 0, 8, 8).unwrap();
    let after: Vec<_> = (0..matcher.pattern_count())
        .map(|id| state.match_positions(id).unwrap())
        .collect();
    assert_eq!(before, after);
    assert_agrees_with_naive(&matcher, &state, "after full recomputes");
}

#[test]
fn test_recompute_clamps_oversized_rectangles() {
    let (matcher, mut state) = build(6, 6);
    state.set(3, 3, 1).unwrap();
    state.recompute(0, 0, 100, 100).unwrap();
    assert_agrees_with_naive(&matcher, &state, "after clamped recompute");
}

#[test]
fn test_many_states_share_one_matcher() {
    let (matcher, mut first) = build(5, 5);
    let mut second = matcher.make_state(7, 3).unwrap();
    first.set(2, 2, 1).unwrap();
    second.set(6, 2, 2).unwrap();
    assert_agrees_with_naive(&matcher, &first, "first state");
    assert_agrees_with_naive(&matcher, &second, "second state");
}
