use std::collections::HashSet;
use std::fs;

use tempfile::tempdir;

use strata::SampleSummary;
use strata::cli::run_sample;

const HEADER: &str = "doc_id\tpara\tsent_id\ttoken_id\tform\tlemma";

fn write_input(path: &std::path::Path) -> Vec<String> {
    let mut lines = vec![HEADER.to_string()];
    for doc in 0..4 {
        for sent in 0..(doc + 2) {
            for tok in 0..(2 + (doc + sent) % 4) {
                lines.push(format!("news{doc}\tp1\t{sent}\t{tok}\tform{tok}\tlemma{tok}"));
            }
            // Blank lines between sentences are tolerated and dropped.
            lines.push(String::new());
        }
    }
    fs::write(path, lines.join("\n")).unwrap();
    lines.into_iter().filter(|line| !line.is_empty()).collect()
}

fn args(parts: &[&str]) -> impl Iterator<Item = String> {
    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .into_iter()
}

#[test]
fn cli_writes_sample_and_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("corpus.tsv");
    let output = dir.path().join("sample.tsv");
    let summary_path = dir.path().join("summary.json");
    let input_lines = write_input(&input);

    run_sample(args(&[
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "2",
        "6",
        "20",
        "--force-sample-size",
        "--seed",
        "1234",
        "--summary-json",
        summary_path.to_str().unwrap(),
    ]))
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let out_lines: Vec<&str> = written.lines().collect();
    assert_eq!(out_lines[0], HEADER);
    assert!(out_lines.iter().all(|line| !line.is_empty()));
    let known: HashSet<&str> = input_lines.iter().map(String::as_str).collect();
    assert!(out_lines.iter().all(|line| known.contains(line)));

    let summary: SampleSummary =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary.seed, Some(1234));
    assert_eq!(summary.header, HEADER);
    assert_eq!(summary.corpus.documents, 4);
    assert_eq!(summary.sample.budget, 20);
    assert_eq!(summary.sample.tokens + 1, out_lines.len());
    let selected: usize = summary
        .per_label
        .iter()
        .map(|label| label.selected_sentences)
        .sum();
    assert_eq!(selected, summary.sample.sentences);
}

#[test]
fn cli_runs_are_reproducible_with_a_seed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("corpus.tsv");
    write_input(&input);

    let mut outputs = Vec::new();
    for name in ["first.tsv", "second.tsv"] {
        let output = dir.path().join(name);
        run_sample(args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "1",
            "10",
            "15",
            "--output-order",
            "round",
            "--seed",
            "77",
        ]))
        .unwrap();
        outputs.push(fs::read_to_string(&output).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn cli_rejects_malformed_lines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.tsv");
    fs::write(&input, format!("{HEADER}\nnews0\tp1\n")).unwrap();
    let output = dir.path().join("out.tsv");

    let err = run_sample(args(&[
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "1",
        "10",
        "5",
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("malformed token line 2"));
}

#[test]
fn cli_requires_all_positionals() {
    assert!(run_sample(args(&["only_input.tsv"])).is_err());
}
