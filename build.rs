use std::collections::HashSet;
use std::path::Path;

fn main() {
    let corpus_path = Path::new("corpus/quran_verses.json");
    validate_corpus_file(corpus_path);
    set_build_dependencies();
}

fn validate_corpus_file(corpus_path: &Path) {
    // Ensure corpus exists at build time
    assert!(
        corpus_path.exists(),
        "\n\nCORPUS BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the corpus file before building.\n",
        corpus_path.display()
    );

    let corpus_contents = std::fs::read_to_string(corpus_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCORPUS BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            corpus_path.display()
        );
    });

    let corpus: serde_json::Value = serde_json::from_str(&corpus_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCORPUS BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            corpus_path.display()
        );
    });

    validate_corpus_structure(&corpus);
}

fn validate_corpus_structure(corpus: &serde_json::Value) {
    assert!(
        corpus.is_object(),
        "\n\nCORPUS BUILD ERROR: Root must be a JSON object\n"
    );

    let chapters = corpus
        .get("chapters")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!(
                "\n\nCORPUS BUILD ERROR: Missing 'chapters' array\n\
                 The corpus must have a top-level 'chapters' array.\n"
            );
        });

    let total_verses = validate_chapters(chapters);

    println!(
        "cargo:warning=Validated corpus: {} chapters, {total_verses} total verses",
        chapters.len()
    );
}

fn validate_chapters(chapters: &[serde_json::Value]) -> usize {
    let mut seen = HashSet::new();
    let mut total_verses = 0;

    for (i, chapter) in chapters.iter().enumerate() {
        let number = chapter
            .get("number")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| {
                panic!("\n\nCORPUS BUILD ERROR: Chapter at index {i} missing numeric 'number'\n");
            });

        assert!(
            (1..=114).contains(&number),
            "\n\nCORPUS BUILD ERROR: Chapter number {number} (index {i}) outside 1..=114\n"
        );
        assert!(
            seen.insert(number),
            "\n\nCORPUS BUILD ERROR: Chapter {number} appears more than once\n"
        );

        total_verses += validate_verses(chapter, number);
    }

    total_verses
}

fn validate_verses(chapter: &serde_json::Value, number: u64) -> usize {
    let verses = chapter
        .get("verses")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!("\n\nCORPUS BUILD ERROR: Chapter {number} missing 'verses' array\n");
        });

    assert!(
        !verses.is_empty(),
        "\n\nCORPUS BUILD ERROR: Chapter {number} has no verses\n"
    );

    for (j, verse) in verses.iter().enumerate() {
        let text = verse.as_str().unwrap_or_else(|| {
            panic!("\n\nCORPUS BUILD ERROR: Chapter {number} verse {} is not a string\n", j + 1);
        });
        assert!(
            !text.trim().is_empty(),
            "\n\nCORPUS BUILD ERROR: Chapter {number} verse {} is empty\n",
            j + 1
        );
    }

    verses.len()
}

fn set_build_dependencies() {
    println!("cargo:rerun-if-changed=corpus/quran_verses.json");
    println!("cargo:rerun-if-changed=build.rs");
}
