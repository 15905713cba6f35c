use std::io::Write;

use lf::config::SearchArgs;
use lf::fuzzy::run_search;
use lf::SearchResults;

fn write_lines(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn search(query: &str, lines: &[&str], mutate: impl FnOnce(&mut SearchArgs)) -> SearchResults {
    let file = write_lines(lines);
    let mut args = SearchArgs::default();
    args.q = query.to_string();
    args.topk = 10;
    args.filenames = vec![file.path().to_str().unwrap().to_string()];
    mutate(&mut args);
    run_search(&args).unwrap()
}

fn texts(results: &SearchResults) -> Vec<String> {
    results
        .lines
        .iter()
        .map(|l| l.record.text.clone())
        .collect()
}

#[test]
fn fuzzy_ranking_prefers_tight_early_matches() {
    let results = search("abc", &["axbxc", "abcx", "zzz", "aabbcc"], |_| {});
    assert_eq!(texts(&results), vec!["abcx", "axbxc", "aabbcc"]);
    assert_eq!(results.matched, 3);
}

#[test]
fn prefix_anchor_filters_non_prefixes() {
    let results = search("^foo", &["foobar", "barfoo", "fooo"], |_| {});
    assert_eq!(texts(&results), vec!["foobar", "fooo"]);
}

#[test]
fn phrase_requires_contiguous_bytes() {
    let results = search(
        "\"hello world\"",
        &["hello world!", "hello  world", "world hello"],
        |_| {},
    );
    assert_eq!(texts(&results), vec!["hello world!"]);
}

#[test]
fn negation_excludes_whole_words_only() {
    let results = search("cat !dog", &["cat", "cat dog", "dogcat", "dog"], |_| {});
    assert_eq!(texts(&results), vec!["cat", "dogcat"]);
}

#[test]
fn or_accepts_either_branch_and_keeps_the_better_score() {
    let results = search("foo|bar", &["foo", "bar", "foobar", "baz"], |_| {});
    assert_eq!(results.matched, 3);
    let foo_score = results
        .lines
        .iter()
        .find(|l| l.record.text == "foo")
        .unwrap()
        .result
        .score;
    let combined = results
        .lines
        .iter()
        .find(|l| l.record.text == "foobar")
        .unwrap();
    // "foobar" takes its better branch: the prefix "foo".
    assert_eq!(combined.result.path, vec![0, 1, 2]);
    assert!(combined.result.score < foo_score);
}

#[test]
fn preserve_order_rejects_out_of_order_matches() {
    let results = search("ab cd", &["abcd", "cdab", "a_b_c_d"], |args| {
        args.preserve_order = true;
    });
    let mut found = texts(&results);
    found.sort();
    assert_eq!(found, vec!["a_b_c_d", "abcd"]);
}

#[test]
fn and_without_preserve_order_accepts_any_order() {
    let results = search("ab cd", &["abcd", "cdab", "a_b_c_d"], |_| {});
    assert_eq!(results.matched, 3);
}

#[test]
fn results_are_sorted_by_score_then_input_order() {
    let results = search("x", &["x", "x", "ax", "x"], |_| {});
    let mut previous: Option<(f64, u64)> = None;
    for line in &results.lines {
        if let Some((prev_score, prev_seq)) = previous {
            assert!(
                line.result.score < prev_score
                    || (line.result.score == prev_score && line.record.seq > prev_seq)
            );
        }
        previous = Some((line.result.score, line.record.seq));
    }
}

#[test]
fn paths_are_ascending_and_in_bounds() {
    let results = search("ab \"cd\" e$", &["ab cd xe", "abcde", "ab cde"], |_| {});
    for line in &results.lines {
        let len = line.record.text.len();
        for pair in line.result.path.windows(2) {
            assert!(pair[0] < pair[1], "path not strictly ascending");
        }
        assert!(line.result.path.iter().all(|&p| p < len));
        assert!(line.result.score.is_finite());
    }
}

#[test]
fn smart_case_applies_per_atom() {
    let results = search("Read foo", &["Read foo", "read foo", "Read FOO"], |_| {});
    // "Read" is case-sensitive under smart case, "foo" is not.
    let mut found = texts(&results);
    found.sort();
    assert_eq!(found, vec!["Read FOO", "Read foo"]);
}

#[test]
fn uppercase_atom_with_smart_case_disabled_matches_any_case() {
    let results = search("READ", &["read me", "unrelated"], |args| {
        args.ignore_case = true;
        args.smart_case = false;
    });
    assert_eq!(texts(&results), vec!["read me"]);
}

#[test]
fn max_symbol_gap_of_one_only_accepts_substrings() {
    let results = search("abc", &["abc", "a_b_c", "xxabcxx"], |args| {
        args.max_symbol_dist = 1;
    });
    let mut found = texts(&results);
    found.sort();
    assert_eq!(found, vec!["abc", "xxabcxx"]);
}

#[test]
fn unbounded_symbol_gap_accepts_distant_witnesses() {
    let wide = format!("a{}b", "x".repeat(50));
    let results = search("ab", &[&wide], |args| {
        args.max_symbol_dist = usize::MAX;
    });
    assert_eq!(results.matched, 1);
}

#[test]
fn log_penalty_softens_very_long_gaps() {
    // 0.5 * ln(1 + 50) is far below 0.1 * 50.
    let wide = format!("a{}bc", "x".repeat(50));
    let lines = [wide.as_str()];
    let linear = search("abc", &lines, |args| {
        args.max_symbol_dist = usize::MAX;
    });
    let log = search("abc", &lines, |args| {
        args.max_symbol_dist = usize::MAX;
        args.gap_penalty = lf::GapPenalty::Log;
    });
    assert!(log.lines[0].result.score > linear.lines[0].result.score);
}

#[test]
fn custom_word_delims_change_bonus_structure() {
    let results = search("b", &["a|b"], |args| {
        args.word_delims = "|".to_string();
    });
    let default = search("b", &["a|b"], |_| {});
    assert!(results.lines[0].result.score > default.lines[0].result.score);
}

#[test]
fn empty_lines_reject_nonempty_queries() {
    let results = search("a", &["", "a", ""], |_| {});
    assert_eq!(results.matched, 1);
}

#[test]
fn empty_query_accepts_every_line_including_empty() {
    let results = search("", &["", "a", ""], |_| {});
    assert_eq!(results.matched, 3);
}

#[test]
fn parallel_and_sequential_agree_on_a_large_mixed_input() {
    let mut lines: Vec<String> = Vec::new();
    for i in 0..2000 {
        lines.push(format!("src/module_{i}/handler.rs"));
        lines.push(format!("doc for item {i}"));
        lines.push("no relation at all".to_string());
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let run = |parallel: bool| {
        search("mhrs", &refs, |args| {
            args.parallel = parallel;
            args.topk = 25;
            args.batch_size = 256;
        })
    };
    let sequential = run(false);
    let parallel = run(true);

    assert_eq!(sequential.matched, parallel.matched);
    assert_eq!(sequential.lines.len(), parallel.lines.len());
    for (s, p) in sequential.lines.iter().zip(parallel.lines.iter()) {
        assert_eq!(s.record.seq, p.record.seq);
        assert_eq!(s.result.score, p.result.score);
        assert_eq!(s.result.path, p.result.path);
    }
}

#[test]
fn preserve_order_scores_never_exceed_unordered_scores() {
    let lines = ["abcd", "ab_cd", "a_b_c_d", "cd ab cd"];
    let free = search("ab cd", &lines, |_| {});
    let ordered = search("ab cd", &lines, |args| {
        args.preserve_order = true;
    });
    for line in &ordered.lines {
        let unordered = free
            .lines
            .iter()
            .find(|l| l.record.seq == line.record.seq)
            .expect("ordered match must also match unordered");
        assert!(line.result.score <= unordered.result.score + 1e-9);
    }
}
