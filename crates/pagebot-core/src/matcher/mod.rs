//! Lexical matching: normalization, similarity and ranking.
//!
//! Scores live in [0, 1]. Containment of one normalized string in the other
//! scores 1.0 outright; otherwise the score is the Jaccard index of the two
//! token sets. No stemming, stop words or synonyms.

use std::collections::HashSet;

use crate::knowledge::QaEntry;

/// An entry paired with its score for one query. Discarded after the reply is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a QaEntry,
    pub score: f64,
}

/// Lower-cases, replaces everything outside `[a-z0-9]` and whitespace with a space,
/// collapses whitespace runs and trims. Absent input normalizes to `""`.
pub fn normalize<'a>(text: impl Into<Option<&'a str>>) -> String {
    let lowered = text.into().unwrap_or_default().to_lowercase();
    let mapped: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `|a ∩ b| / |a ∪ b|` over the distinct tokens; 0 when both are empty.
pub fn jaccard(a: &[&str], b: &[&str]) -> f64 {
    let a: HashSet<&str> = a.iter().copied().collect();
    let b: HashSet<&str> = b.iter().copied().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Similarity of a user message to a candidate question.
pub fn score(user_text: &str, candidate_text: &str) -> f64 {
    score_normalized(&normalize(user_text), &normalize(candidate_text))
}

/// Both arguments must already be normalized.
fn score_normalized(user: &str, candidate: &str) -> f64 {
    if user.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if user == candidate || user.contains(candidate) || candidate.contains(user) {
        return 1.0;
    }
    let user_tokens: Vec<&str> = user.split(' ').collect();
    let candidate_tokens: Vec<&str> = candidate.split(' ').collect();
    jaccard(&user_tokens, &candidate_tokens)
}

fn score_all<'a>(query: &str, entries: &'a [QaEntry]) -> impl Iterator<Item = ScoredEntry<'a>> {
    let query = normalize(query);
    entries.iter().map(move |entry| ScoredEntry {
        entry,
        score: score_normalized(&query, &normalize(entry.question())),
    })
}

/// Highest-scoring entry. Ties keep the earliest entry; `(None, 0.0)` when nothing scores above 0.
pub fn select_best<'a>(query: &str, entries: &'a [QaEntry]) -> (Option<&'a QaEntry>, f64) {
    let mut best = None;
    let mut best_score = 0.0;
    for scored in score_all(query, entries) {
        if scored.score > best_score {
            best_score = scored.score;
            best = Some(scored.entry);
        }
    }
    (best, best_score)
}

/// Top `size` entries by descending score (stable, so declared order breaks ties),
/// keeping only those that score above 0.
pub fn shortlist<'a>(query: &str, entries: &'a [QaEntry], size: usize) -> Vec<ScoredEntry<'a>> {
    let mut ranked: Vec<ScoredEntry<'a>> = score_all(query, entries).collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(size);
    ranked.retain(|s| s.score > 0.0);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(questions: &[&str]) -> Vec<QaEntry> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| QaEntry::new(*q, format!("answer {}", i)))
            .collect()
    }

    #[test]
    fn normalize_strips_case_punctuation_and_spacing() {
        assert_eq!(normalize("  What IS   Tidal-Energy?! "), "what is tidal energy");
        assert_eq!(normalize("CO2\temissions\n(net)"), "co2 emissions net");
        assert_eq!(normalize("café"), "caf");
    }

    #[test]
    fn normalize_handles_empty_and_absent() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize("?!..."), "");
        assert_eq!(normalize(None::<&str>), "");
    }

    #[test]
    fn normalize_is_idempotent_and_clean() {
        let samples = [
            "What is EGS?",
            "  ground-source   heat pump ",
            "Ünïcödé ǅ test 42",
            "tabs\tand\r\nnewlines",
            "",
            "İstanbul KELVIN\u{212A}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(once.as_str()), once, "not idempotent for {sample:?}");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            assert!(!once.starts_with(' ') && !once.ends_with(' '));
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn containment_scores_full() {
        assert_eq!(score("tidal energy", "what is tidal energy"), 1.0);
        assert_eq!(score("what is tidal energy", "tidal energy"), 1.0);
        assert_eq!(score("what is tidal energy", "What Is Tidal Energy?"), 1.0);
    }

    #[test]
    fn disjoint_tokens_score_zero() {
        assert_eq!(score("xyz123", "what is tidal energy"), 0.0);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(score("", "what is tidal energy"), 0.0);
        assert_eq!(score("what is tidal energy", ""), 0.0);
        assert_eq!(score("!!!", "???"), 0.0);
    }

    #[test]
    fn token_overlap_uses_jaccard() {
        // {what, is, biochar} vs {what, is, tidal, energy}: 2 / 5
        let s = score("what is biochar", "what is tidal energy");
        assert!((s - 0.4).abs() < 1e-12);
        // duplicates collapse: {tidal, tidal, site} -> {tidal, site}
        let s = score("site tidal tidal", "how to choose a tidal site");
        assert!((s - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn set_path_is_order_insensitive_and_symmetric() {
        let a = "energy tidal stored";
        let b = "how is tidal energy stored";
        assert_eq!(score(a, b), score(b, a));
        assert_eq!(score("stored energy tidal", b), score(a, b));
    }

    #[test]
    fn jaccard_of_empty_sets_is_zero() {
        assert_eq!(jaccard(&[], &[]), 0.0);
        assert_eq!(jaccard(&["a"], &[]), 0.0);
        assert_eq!(jaccard(&["a", "b"], &["b", "a"]), 1.0);
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let pairs = [
            ("", ""),
            ("a", "a"),
            ("one two three", "three four"),
            ("tidal", "tidal lagoon"),
            ("qwerty", "asdf"),
        ];
        for (a, b) in pairs {
            let s = score(a, b);
            assert!((0.0..=1.0).contains(&s), "{a:?} vs {b:?} -> {s}");
        }
    }

    #[test]
    fn select_best_prefers_earliest_on_tie() {
        let list = entries(&["alpha beta", "alpha gamma", "delta"]);
        // "alpha zeta" overlaps each of the first two with 1/3
        let (best, s) = select_best("alpha zeta", &list);
        assert_eq!(best.unwrap().question(), "alpha beta");
        assert!((s - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn select_best_none_when_nothing_scores() {
        let list = entries(&["alpha", "beta"]);
        assert_eq!(select_best("zzz", &list), (None, 0.0));
        assert_eq!(select_best("alpha", &[]), (None, 0.0));
    }

    #[test]
    fn shortlist_ranks_filters_and_truncates() {
        let list = entries(&[
            "solar panel cost",
            "wind turbine cost",
            "wind turbine noise",
            "hydro dam",
            "wind farm",
        ]);
        let top = shortlist("wind turbine price", &list, 3);
        let questions: Vec<&str> = top.iter().map(|s| s.entry.question()).collect();
        // 2/4, 2/4, then "wind farm" 1/4 ahead of "solar panel cost" 0/6
        assert_eq!(
            questions,
            vec!["wind turbine cost", "wind turbine noise", "wind farm"]
        );
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));

        let none = shortlist("geothermal", &list, 3);
        assert!(none.is_empty());
    }
}
