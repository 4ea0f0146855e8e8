//! Integration tests for gen-merge.
//!
//! These tests run the whole pipeline against Go packages on disk:
//! scanning, parsing, extraction, rendering and output.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use gen_merge::{
    config::{Config, ConfigManager, UnsupportedFieldPolicy},
    error::{AnalysisError, GenMergeError},
    generate,
    renderer::GENERATED_HEADER,
    scanner::SourceScanner,
    writer::{CheckResult, FileWriter, WriteResult},
    Extractor,
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Create a temporary directory with test files.
fn create_temp_package(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

// =============================================================================
// Golden Output
// =============================================================================

#[test]
fn test_teststructs_matches_golden_file() {
    let dir = fixtures_path().join("teststructs");
    let expected = fs::read_to_string(dir.join("genmerge_teststructs.go")).unwrap();

    let output = generate(&dir, &Config::default()).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_teststructs_generation_is_deterministic() {
    let dir = fixtures_path().join("teststructs");

    let first = generate(&dir, &Config::default()).unwrap();
    let second = generate(&dir, &Config::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_teststructs_model() {
    let dir = fixtures_path().join("teststructs");
    let model = Extractor::default().extract_dir(&dir).unwrap();

    assert_eq!(model.package_name, "teststructs");

    // Unaliased "time" is not carried.
    let imports: Vec<String> = model.imports.iter().map(ToString::to_string).collect();
    assert_eq!(imports, vec!["sqlx \"database/sql\""]);

    let person = model.get_struct("Person").unwrap();
    let fields: Vec<(&str, &str)> = person
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.zero_value.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("Name", "*(new(string))"),
            ("Age", "*(new(int64))"),
            ("secretIdentity", "*(new(string))"),
            ("City", "nil"),
            ("Height", "*(new(NullableFloat))"),
            ("Friends", "nil"),
            ("LastSeen", "*(new(sqlx.NullTime))"),
        ]
    );

    // Multi-name declaration expands, blank field is dropped.
    let point = model.get_struct("Point").unwrap();
    let names: Vec<&str> = point.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["X", "Y"]);

    assert!(model.get_struct("visit").is_none());
    assert!(model.get_struct("Box").is_none());
    assert!(model.get_struct("Celsius").is_none());
}

#[test]
fn test_scanner_skips_test_and_hidden_files() {
    let dir = create_temp_package(&[
        ("models.go", "package models\n"),
        ("models_test.go", "package models\n"),
        ("_scratch.go", "package models\n"),
        (".hidden.go", "package models\n"),
        ("README.md", "# models\n"),
        ("nested/other.go", "package nested\n"),
    ]);

    let files = SourceScanner::new(dir.path()).scan().unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|f| f.relative_path.to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["models.go"]);
}

// =============================================================================
// Structural Rules
// =============================================================================

#[test]
fn test_structs_from_several_files_are_sorted() {
    let dir = create_temp_package(&[
        (
            "b.go",
            "package models\n\ntype Zebra struct {\n\tStripes int\n}\n",
        ),
        (
            "a.go",
            "package models\n\ntype Apple struct {\n\tSeeds int\n}\n",
        ),
    ]);

    let output = generate(dir.path(), &Config::default()).unwrap();

    let apple = output.find("func (s1 Apple) Merge(").unwrap();
    let zebra = output.find("func (s1 Zebra) Merge(").unwrap();
    assert!(apple < zebra);
}

#[test]
fn test_imports_are_deduplicated_across_files() {
    let dir = create_temp_package(&[
        (
            "a.go",
            "package models\n\nimport sqlx \"database/sql\"\n\ntype A struct {\n\tT sqlx.NullTime\n}\n",
        ),
        (
            "b.go",
            "package models\n\nimport sqlx \"database/sql\"\n\ntype B struct {\n\tT sqlx.NullTime\n}\n",
        ),
    ]);

    let output = generate(dir.path(), &Config::default()).unwrap();

    assert_eq!(output.matches("sqlx \"database/sql\"").count(), 1);
}

#[test]
fn test_package_without_structs_renders_header_only() {
    let dir = create_temp_package(&[("doc.go", "package models\n\nconst Version = 1\n")]);

    let output = generate(dir.path(), &Config::default()).unwrap();

    assert_eq!(output, format!("{}\n\npackage models\n", GENERATED_HEADER));
}

#[test]
fn test_previous_output_is_ignored() {
    let dir = create_temp_package(&[(
        "models.go",
        "package models\n\ntype User struct {\n\tName string\n}\n",
    )]);

    let first = generate(dir.path(), &Config::default()).unwrap();
    fs::write(dir.path().join("genmerge_models.go"), &first).unwrap();

    let second = generate(dir.path(), &Config::default()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_directory_is_error() {
    let result = generate(&fixtures_path().join("does-not-exist"), &Config::default());

    assert!(matches!(
        result,
        Err(GenMergeError::Analysis(AnalysisError::DirectoryNotFound { .. }))
    ));
}

#[test]
fn test_empty_directory_is_error() {
    let dir = create_temp_package(&[("notes.txt", "nothing here")]);

    let result = generate(dir.path(), &Config::default());

    assert!(matches!(
        result,
        Err(GenMergeError::Analysis(AnalysisError::NoSourceFiles { .. }))
    ));
}

#[test]
fn test_multiple_packages_is_error() {
    let dir = create_temp_package(&[
        ("a.go", "package alpha\n"),
        ("b.go", "package beta\n"),
    ]);

    let result = generate(dir.path(), &Config::default());

    match result {
        Err(GenMergeError::Analysis(AnalysisError::MultiplePackages { first, second, .. })) => {
            assert_eq!(first, "alpha");
            assert_eq!(second, "beta");
        }
        other => panic!("expected MultiplePackages, got {:?}", other),
    }
}

#[test]
fn test_syntax_error_is_reported() {
    let dir = create_temp_package(&[(
        "broken.go",
        "package models\n\ntype User struct {\n\tName string\n",
    )]);

    let result = generate(dir.path(), &Config::default());

    assert!(matches!(
        result,
        Err(GenMergeError::Analysis(AnalysisError::Parse { .. }))
    ));
}

#[test]
fn test_unsupported_field_is_error_by_default() {
    let result = generate(&fixtures_path().join("unsupported"), &Config::default());

    match result {
        Err(GenMergeError::Analysis(AnalysisError::UnsupportedFieldShape {
            struct_name,
            field,
            shape,
            ..
        })) => {
            assert_eq!(struct_name, "Hooks");
            assert_eq!(field, "OnSave");
            assert_eq!(shape, "function");
        }
        other => panic!("expected UnsupportedFieldShape, got {:?}", other),
    }
}

#[test]
fn test_unsupported_field_skipped_when_configured() {
    let mut config = Config::default();
    config.extract.unsupported_fields = UnsupportedFieldPolicy::Skip;

    let output = generate(&fixtures_path().join("unsupported"), &config).unwrap();

    assert!(output.contains("func (s1 Hooks) Merge(s2 Hooks) Hooks {"));
    assert!(output.contains("s1.Name = s2.Name"));
    assert!(!output.contains("OnSave"));
}

// =============================================================================
// Config and Output
// =============================================================================

#[test]
fn test_config_file_drives_generation() {
    let dir = create_temp_package(&[
        (
            "models.go",
            "package models\n\ntype Pair struct {\n\tLeft, Right string\n\tMeta map[string]string\n}\n",
        ),
        (
            "gen-merge.toml",
            "[extract]\nunsupported_fields = \"skip\"\nfirst_name_only = true\n",
        ),
    ]);

    let config = ConfigManager::load(Some(&dir.path().join("gen-merge.toml"))).unwrap();
    let output = generate(dir.path(), &config).unwrap();

    assert!(output.contains("s1.Left = s2.Left"));
    assert!(!output.contains("Right"));
    assert!(!output.contains("Meta"));
}

#[test]
fn test_exclude_pattern_skips_file() {
    let dir = create_temp_package(&[
        (
            "models.go",
            "package models\n\ntype User struct {\n\tName string\n}\n",
        ),
        (
            "legacy.go",
            "package models\n\ntype Legacy struct {\n\tHandler func()\n}\n",
        ),
    ]);

    let mut config = Config::default();
    config.extract.exclude.push("legacy.go".to_string());

    let output = generate(dir.path(), &config).unwrap();
    assert!(output.contains("User"));
    assert!(!output.contains("Legacy"));
}

#[test]
fn test_write_then_check_round() {
    let dir = create_temp_package(&[(
        "models.go",
        "package models\n\ntype User struct {\n\tName string\n}\n",
    )]);
    let out = dir.path().join("genmerge_models.go");
    let writer = FileWriter::new();

    let content = generate(dir.path(), &Config::default()).unwrap();
    assert_eq!(writer.check(&out, &content).unwrap(), CheckResult::Missing);

    let result = writer.write(&out, &content).unwrap();
    assert!(matches!(result, WriteResult::Written { .. }));
    assert_eq!(writer.check(&out, &content).unwrap(), CheckResult::UpToDate);

    // Rerun with the output inside the package directory.
    let again = generate(dir.path(), &Config::default()).unwrap();
    assert!(matches!(
        writer.write(&out, &again).unwrap(),
        WriteResult::Unchanged { .. }
    ));

    fs::write(
        dir.path().join("models.go"),
        "package models\n\ntype User struct {\n\tName string\n\tAge int\n}\n",
    )
    .unwrap();
    let changed = generate(dir.path(), &Config::default()).unwrap();
    assert_eq!(writer.check(&out, &changed).unwrap(), CheckResult::Stale);
}

// =============================================================================
// Go Toolchain
// =============================================================================

/// Copy the fixture package next to freshly generated merge functions and run
/// its Go tests. Needs `go` on PATH: `cargo test -- --ignored`.
#[test]
#[ignore]
fn test_generated_merge_functions_pass_go_tests() {
    let go_available = std::process::Command::new("go")
        .arg("version")
        .output()
        .is_ok_and(|out| out.status.success());
    if !go_available {
        eprintln!("go toolchain not found, skipping");
        return;
    }

    let fixture = fixtures_path().join("teststructs");
    let dir = create_temp_package(&[("go.mod", "module teststructs\n\ngo 1.18\n")]);
    for name in ["person.go", "geometry.go", "merge_test.go"] {
        fs::copy(fixture.join(name), dir.path().join(name)).unwrap();
    }

    let content = generate(dir.path(), &Config::default()).unwrap();
    fs::write(dir.path().join("genmerge_teststructs.go"), content).unwrap();

    let output = std::process::Command::new("go")
        .args(["test", "./..."])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "go test failed:\n{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
