//! The matcher compilation pipeline.
//!
//! A pattern catalogue compiles into two automata. The row DFA reads grid
//! symbols right to left and accepts a row pattern at its leftmost cell; the
//! column DFA reads the row DFA's accept set IDs bottom to top and accepts a
//! catalogue pattern at its top-left corner. Between any two accept sets of
//! the column DFA the set differences are precomputed, so an edit can list
//! the matches it creates and destroys in time proportional to their number.

use log::debug;

use crate::{Alphabet, GridScanError, Pattern, Result};

use super::{
    ids::{AcceptIDBase, AcceptSetIDBase},
    AcceptID, AcceptSetID, Dfa, IdMap, IntSet, Regex,
};

/// The compiled, immutable core of a pattern matcher.
#[derive(Debug)]
pub(crate) struct MatcherImpl {
    alphabet: Alphabet,
    patterns: Vec<Pattern>,
    row_dfa: Dfa,
    col_dfa: Dfa,
    /// Flattened accept set differences of the column DFA:
    /// `diffs[p + K*q] = accept_set(p) \ accept_set(q)` with K set counts.
    diffs: Vec<Vec<AcceptID>>,
}

impl MatcherImpl {
    /// Compile a pattern catalogue over `alphabet`. Patterns are
    /// deduplicated by canonical key; the surviving order assigns pattern IDs.
    pub(crate) fn try_new(alphabet: Alphabet, patterns: Vec<Pattern>) -> Result<Self> {
        let mut pattern_keys: IdMap<String> = IdMap::new();
        let mut unique: Vec<Pattern> = Vec::new();
        for pattern in patterns {
            for &(_, _, symbol) in pattern.payload() {
                if symbol >= alphabet.len() {
                    return Err(GridScanError::unknown_key(format!(
                        "symbol id {} in pattern '{}'",
                        symbol, pattern
                    )));
                }
            }
            let id = pattern_keys.get_or_insert(pattern.key().to_string());
            if id == unique.len() {
                unique.push(pattern);
            }
        }

        // Collect the distinct rows of all patterns; their first-seen order
        // assigns the row IDs that the row DFA accepts.
        let mut row_keys: IdMap<String> = IdMap::new();
        let mut row_patterns: Vec<Pattern> = Vec::new();
        let mut pattern_rows: Vec<Vec<usize>> = Vec::with_capacity(unique.len());
        for pattern in &unique {
            let mut ids = Vec::with_capacity(pattern.height());
            for row in pattern.rows() {
                let id = row_keys.get_or_insert(row.key().to_string());
                if id == row_patterns.len() {
                    row_patterns.push(row);
                }
                ids.push(id);
            }
            pattern_rows.push(ids);
        }
        debug!(
            "compiling {} patterns with {} distinct rows over {} symbols",
            unique.len(),
            row_patterns.len(),
            alphabet.len()
        );

        let row_regex = row_regex(alphabet.len(), &row_patterns);
        let row_dfa = Dfa::from_regex(alphabet.len(), row_patterns.len(), &row_regex);
        let column_alphabet = row_dfa.accept_set_count();
        debug!(
            "row DFA: {} states, column alphabet of {} letters",
            row_dfa.state_count(),
            column_alphabet
        );

        // Invert the row DFA's accept set table: for each row pattern, the
        // set of column letters that signal the row is matched.
        let accepting_sets: Vec<IntSet> = (0..row_patterns.len())
            .map(|row| {
                let label = AcceptID::new(row as AcceptIDBase);
                let mut set = IntSet::new(column_alphabet);
                for letter in 0..column_alphabet {
                    let id = AcceptSetID::new(letter as AcceptSetIDBase);
                    if row_dfa.accept_set(id).binary_search(&label).is_ok() {
                        set.insert(letter);
                    }
                }
                set
            })
            .collect();

        let col_regex = col_regex(&pattern_rows, &accepting_sets);
        let col_dfa = Dfa::from_regex(column_alphabet, unique.len(), &col_regex);
        debug!(
            "column DFA: {} states, {} accept sets",
            col_dfa.state_count(),
            col_dfa.accept_set_count()
        );

        let diffs = accept_set_diffs(&col_dfa);

        Ok(Self {
            alphabet,
            patterns: unique,
            row_dfa,
            col_dfa,
            diffs,
        })
    }

    /// The alphabet the matcher was compiled for.
    pub(crate) fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The deduplicated pattern catalogue; positions are the pattern IDs.
    pub(crate) fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The number of catalogue patterns.
    pub(crate) fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// The row automaton, over the symbol alphabet.
    pub(crate) fn row_dfa(&self) -> &Dfa {
        &self.row_dfa
    }

    /// The column automaton, over the row automaton's accept set IDs.
    pub(crate) fn col_dfa(&self) -> &Dfa {
        &self.col_dfa
    }

    /// The precomputed difference `accept_set(p) \ accept_set(q)` of two
    /// column DFA accept sets: the pattern IDs matched at p but not at q.
    pub(crate) fn diff(&self, p: AcceptSetID, q: AcceptSetID) -> &[AcceptID] {
        &self.diffs[p.as_usize() + self.col_dfa.accept_set_count() * q.as_usize()]
    }
}

/// The row expression: skip any prefix, then recognise any row pattern read
/// right to left and emit its row ID. The reversal makes the DFA accept at
/// the leftmost cell of a matched row when scanning leftwards.
fn row_regex(alphabet_size: usize, row_patterns: &[Pattern]) -> Regex {
    let alternatives = row_patterns
        .iter()
        .enumerate()
        .map(|(row_id, row)| {
            let mut parts: Vec<Regex> = row
                .raster()
                .iter()
                .rev()
                .map(|cell| match cell {
                    Some(symbol) => Regex::letter(*symbol, alphabet_size),
                    None => Regex::Wildcard,
                })
                .collect();
            parts.push(Regex::accept(row_id));
            Regex::Concat(parts)
        })
        .collect();
    Regex::Concat(vec![
        Regex::Star(Box::new(Regex::Wildcard)),
        Regex::Union(alternatives),
    ])
}

/// The column expression: skip any prefix, then recognise any pattern's rows
/// read bottom to top and emit its pattern ID. Each atom accepts the column
/// letters whose row accept set contains that row.
fn col_regex(pattern_rows: &[Vec<usize>], accepting_sets: &[IntSet]) -> Regex {
    let alternatives = pattern_rows
        .iter()
        .enumerate()
        .map(|(pattern_id, rows)| {
            let mut parts: Vec<Regex> = rows
                .iter()
                .rev()
                .map(|&row_id| Regex::Letters(accepting_sets[row_id].clone()))
                .collect();
            parts.push(Regex::accept(pattern_id));
            Regex::Concat(parts)
        })
        .collect();
    Regex::Concat(vec![
        Regex::Star(Box::new(Regex::Wildcard)),
        Regex::Union(alternatives),
    ])
}

/// Precompute `accept_set(p) \ accept_set(q)` for every ordered pair of the
/// column DFA's accept sets, flattened as `p + K*q`.
fn accept_set_diffs(col_dfa: &Dfa) -> Vec<Vec<AcceptID>> {
    let count = col_dfa.accept_set_count();
    let mut diffs = Vec::with_capacity(count * count);
    for q in 0..count {
        for p in 0..count {
            let set_p = col_dfa.accept_set(AcceptSetID::new(p as AcceptSetIDBase));
            let set_q = col_dfa.accept_set(AcceptSetID::new(q as AcceptSetIDBase));
            diffs.push(sorted_difference(set_p, set_q));
        }
    }
    diffs
}

/// The elements of sorted slice `a` not contained in sorted slice `b`.
fn sorted_difference(a: &[AcceptID], b: &[AcceptID]) -> Vec<AcceptID> {
    let mut result = Vec::new();
    let mut j = 0;
    for &value in a {
        while j < b.len() && b[j] < value {
            j += 1;
        }
        if j >= b.len() || b[j] != value {
            result.push(value);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(alphabet: &str, patterns: &[&str]) -> MatcherImpl {
        let alphabet: Alphabet = alphabet.parse().unwrap();
        let patterns = patterns
            .iter()
            .map(|text| Pattern::parse(text, &alphabet).unwrap())
            .collect();
        MatcherImpl::try_new(alphabet, patterns).unwrap()
    }

    #[test]
    fn test_catalogue_deduplication() {
        let matcher = compile("BW", &["BW", "WB", "BW"]);
        assert_eq!(matcher.pattern_count(), 2);
        assert_eq!(matcher.patterns()[0].key(), "0,1");
        assert_eq!(matcher.patterns()[1].key(), "1,0");
    }

    #[test]
    fn test_rejects_foreign_symbols() {
        let alphabet: Alphabet = "BW".parse().unwrap();
        let pattern = Pattern::from_cells(1, 1, vec![Some(7)]).unwrap();
        assert!(MatcherImpl::try_new(alphabet, vec![pattern]).is_err());
    }

    #[test]
    fn test_shared_rows_compile_once() {
        // Both patterns contain the row "BW"; the row automaton sees three
        // distinct rows, not four.
        let alphabet: Alphabet = "BW".parse().unwrap();
        let patterns = vec![
            Pattern::parse("BW/WW", &alphabet).unwrap(),
            Pattern::parse("BW/BB", &alphabet).unwrap(),
        ];
        let matcher = MatcherImpl::try_new(alphabet, patterns).unwrap();
        // Rows: "BW", "WW", "BB" — encoded in the row DFA's accept labels.
        let distinct_labels: std::collections::BTreeSet<AcceptID> = (0..matcher
            .row_dfa()
            .accept_set_count())
            .flat_map(|id| {
                matcher
                    .row_dfa()
                    .accept_set(AcceptSetID::new(id as AcceptSetIDBase))
                    .iter()
                    .copied()
            })
            .collect();
        assert_eq!(distinct_labels.len(), 3);
    }

    #[test]
    fn test_diff_law() {
        // For all accept set pairs: diff(p, q) ∪ (p ∩ q) == p and
        // diff(p, q) ∩ q == ∅.
        let matcher = compile("BW", &["W", "WW", "WB", "B"]);
        let col_dfa = matcher.col_dfa();
        let count = col_dfa.accept_set_count();
        for p in 0..count {
            for q in 0..count {
                let p_id = AcceptSetID::new(p as AcceptSetIDBase);
                let q_id = AcceptSetID::new(q as AcceptSetIDBase);
                let set_p = col_dfa.accept_set(p_id);
                let set_q = col_dfa.accept_set(q_id);
                let diff = matcher.diff(p_id, q_id);
                for label in diff {
                    assert!(set_p.contains(label));
                    assert!(!set_q.contains(label));
                }
                for label in set_p {
                    let in_q = set_q.contains(label);
                    let in_diff = diff.contains(label);
                    assert!(in_q != in_diff, "diff law violated for label {}", label);
                }
            }
        }
    }

    #[test]
    fn test_accepting_sets_invert_the_accept_table() {
        let matcher = compile("BW", &["BW/WB"]);
        let row_dfa = matcher.row_dfa();
        // Every column letter either signals a given row or it does not, and
        // the inversion used at compile time must agree with the accept sets.
        for letter in 0..row_dfa.accept_set_count() {
            let id = AcceptSetID::new(letter as AcceptSetIDBase);
            for &label in row_dfa.accept_set(id) {
                assert!(label.as_usize() < 2);
            }
        }
    }
}
