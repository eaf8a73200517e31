//! End-to-end tests of the recital-check binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const IKHLAS: &str = "قل هو الله أحد الله الصمد لم يلد ولم يولد ولم يكن له كفوا أحد";

fn recital_check() -> Command {
    let mut cmd = Command::cargo_bin("recital-check").unwrap();
    cmd.env_remove("TRANSCRIBER_URL")
        .env_remove("TRANSCRIBER_API_KEY")
        .env_remove("RECITAL_API_TOKEN");
    cmd
}

#[test]
fn test_check_single_verse() {
    recital_check()
        .args(["check", "قل هو الله أحد", "--chapter", "112", "--verse", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: CORRECT (100.00%)"))
        .stdout(predicate::str::contains("Chapter 112, verse 1"));
}

#[test]
fn test_check_whole_chapter_breakdown() {
    recital_check()
        .args(["check", IKHLAS, "--chapter", "112"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: CORRECT (100.00%)"))
        .stdout(predicate::str::contains("Verses: 0/4 correct"));
}

#[test]
fn test_check_reports_missing_word() {
    recital_check()
        .args(["check", "قل الله أحد", "--chapter", "112", "--verse", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing:  هو"));
}

#[test]
fn test_check_json_output() {
    recital_check()
        .args([
            "check",
            "قل هو الله أحد",
            "--chapter",
            "112",
            "--verse",
            "1",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"correct\""))
        .stdout(predicate::str::contains("\"chapter\": 112"));
}

#[test]
fn test_check_tsv_output() {
    recital_check()
        .args(["check", IKHLAS, "--chapter", "112", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "scope\tchapter\tverse\tstatus\tratio\tword_errors",
        ))
        .stdout(predicate::str::contains("overall\t112\t-\tcorrect\t1.0000\t0"))
        .stdout(predicate::str::contains("verse\t112\t4\tincorrect\t0.4750\t1"));
}

#[test]
fn test_check_from_transcript_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("ikhlas.txt");
    fs::write(&path, IKHLAS).expect("Failed to write transcript");

    recital_check()
        .args(["check", "--transcript", path.to_str().unwrap(), "--chapter", "112"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: CORRECT"));
}

#[test]
fn test_check_from_stdin() {
    recital_check()
        .args(["check", "--transcript", "-", "--chapter", "112"])
        .write_stdin(IKHLAS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Verses: 0/4 correct"));
}

#[test]
fn test_check_transcriber_failure_is_a_result() {
    recital_check()
        .args(["check", "❌ timeout", "--chapter", "112", "--verse", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: ERROR"))
        .stdout(predicate::str::contains("[ERROR] timeout"));
}

#[test]
fn test_check_unknown_verse() {
    recital_check()
        .args(["check", "قل", "--chapter", "112", "--verse", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Verse 9 not found in chapter 112"));
}

#[test]
fn test_check_chapter_missing_from_corpus() {
    recital_check()
        .args(["check", "الم", "--chapter", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chapter 2 not found in corpus"))
        .stderr(predicate::str::contains(
            "The embedded corpus only holds chapters 1, 108, 112, 113, 114",
        ))
        .stderr(predicate::str::contains("--corpus"));
}

#[test]
fn test_check_rejects_out_of_range_chapter() {
    recital_check()
        .args(["check", "قل", "--chapter", "115"])
        .assert()
        .failure();
}

#[test]
fn test_check_without_transcription() {
    recital_check()
        .args(["check", "--chapter", "112"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No transcription given"));
}

#[test]
fn test_check_audio_needs_transcriber() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("recitation.wav");
    fs::write(&path, b"RIFF\0\0\0\0WAVEfmt ").expect("Failed to write audio");

    recital_check()
        .args(["check", "--audio", path.to_str().unwrap(), "--chapter", "112"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--transcriber-url"));
}

#[test]
fn test_compare_texts() {
    recital_check()
        .args(["compare", "الحمد لله رب العالمين", "الحمد لله ربي العالمين"])
        .assert()
        .success()
        .stdout(predicate::str::contains("replaced: رب -> ربي"));
}

#[test]
fn test_compare_empty_hypothesis() {
    recital_check()
        .args(["compare", "الحمد لله", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transcription is empty"));
}

#[test]
fn test_corpus_list() {
    recital_check()
        .args(["corpus", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Al-Ikhlas"))
        .stdout(predicate::str::contains("Total: 5 chapters"));
}

#[test]
fn test_corpus_show_tsv() {
    recital_check()
        .args(["corpus", "show", "112", "--format", "tsv", "--normalizer", "fallback"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("number\ttext\tnormalized_text"))
        .stdout(predicate::str::contains("\tالله الصمد\n"));
}

#[test]
fn test_corpus_show_unknown_chapter() {
    recital_check()
        .args(["corpus", "show", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chapter 2 not found"));
}

#[test]
fn test_corpus_export_and_reload() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("corpus.json");

    recital_check()
        .args(["corpus", "export", "--output", path.to_str().unwrap()])
        .assert()
        .success();

    let exported = fs::read_to_string(&path).expect("Failed to read export");
    assert!(exported.contains("\"version\": \"1.0.0\""));
    assert!(exported.contains("\"exported_at\""));

    recital_check()
        .args([
            "check",
            "قل هو الله أحد",
            "--chapter",
            "112",
            "--verse",
            "1",
            "--corpus",
            path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: CORRECT"));
}
