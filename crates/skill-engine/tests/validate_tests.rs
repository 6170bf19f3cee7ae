use std::path::{Path, PathBuf};

use skill_engine::validate::{check_document, check_tree, is_valid_name};
use skill_engine::{Issue, RegistryOptions, Severity};

fn fixture(name: &str) -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")).join(name)
}

const GOOD_BODY: &str = "# Good Skill\n\n## Instructions\n\nFollow these steps carefully, \
one at a time, and confirm each result before moving on to the next step.\n";

fn doc(frontmatter: &str, body: &str) -> String {
    format!("---\n{frontmatter}---\n{body}")
}

fn messages(issues: &[Issue], severity: Severity) -> Vec<&str> {
    issues
        .iter()
        .filter(|i| i.severity == severity)
        .map(|i| i.message.as_str())
        .collect()
}

fn check(frontmatter: &str, body: &str) -> Vec<Issue> {
    check_document(Path::new("good-skill/SKILL.md"), &doc(frontmatter, body), "good-skill")
}

const GOOD_FM: &str = "name: good-skill\ndescription: A well described skill. Use when testing the validator.\n";

// ============================================================================
// Single documents
// ============================================================================

#[test]
fn clean_document_has_no_issues() {
    assert_eq!(check(GOOD_FM, GOOD_BODY), vec![]);
}

#[test]
fn missing_frontmatter_is_an_error() {
    let issues = check_document(Path::new("x/SKILL.md"), "# Title\n", "x");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Error);
}

#[test]
fn unterminated_frontmatter_is_an_error() {
    let issues = check_document(Path::new("x/SKILL.md"), "---\nname: x\n", "x");
    assert_eq!(messages(&issues, Severity::Error).len(), 1);
}

#[test]
fn missing_and_empty_required_fields_are_errors() {
    let issues = check("name: good-skill\ndescription: \"\"\n", GOOD_BODY);
    assert_eq!(
        messages(&issues, Severity::Error),
        vec!["required field `description` is missing"]
    );

    let issues = check("name: \"  \"\ndescription: A well described skill. Use when testing.\n", GOOD_BODY);
    assert_eq!(
        messages(&issues, Severity::Error),
        vec!["required field `name` is empty"]
    );
}

#[test]
fn name_conventions_are_warnings() {
    let issues = check(
        "name: Good_Skill\ndescription: A well described skill. Use when testing the validator.\n",
        GOOD_BODY,
    );
    let warnings = messages(&issues, Severity::Warning);
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].contains("lowercase"));
    assert!(warnings[1].contains("differs from its directory"));
    assert!(messages(&issues, Severity::Error).is_empty());
}

#[test]
fn overlong_name_is_a_warning() {
    let name = "a".repeat(65);
    let issues = check_document(
        Path::new("x/SKILL.md"),
        &doc(
            &format!("name: {name}\ndescription: A well described skill. Use when testing.\n"),
            GOOD_BODY,
        ),
        &name,
    );
    assert_eq!(
        messages(&issues, Severity::Warning),
        vec!["name is longer than 64 characters"]
    );
}

#[test]
fn description_quality_warnings() {
    let issues = check("name: good-skill\ndescription: Too short\n", GOOD_BODY);
    let warnings = messages(&issues, Severity::Warning);
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].contains("very short"));
    assert!(warnings[1].contains("trigger phrase"));

    let long = format!("{} Handles everything.", "x".repeat(1020));
    let issues = check(&format!("name: good-skill\ndescription: {long}\n"), GOOD_BODY);
    assert_eq!(messages(&issues, Severity::Warning).len(), 1);
    assert!(messages(&issues, Severity::Warning)[0].contains("longer than 1024"));
}

#[test]
fn trigger_phrases_are_case_insensitive() {
    let issues = check(
        "name: good-skill\ndescription: COVERS every corner of the validator.\n",
        GOOD_BODY,
    );
    assert_eq!(issues, vec![]);
}

#[test]
fn uncommon_tools_are_warnings() {
    let fm = format!("{GOOD_FM}allowed-tools: [Read, Bash, Figma, node]\n");
    assert_eq!(
        messages(&check(&fm, GOOD_BODY), Severity::Warning),
        vec!["uncommon allowed tool `Figma`"]
    );
}

#[test]
fn body_warnings() {
    assert_eq!(
        messages(&check(GOOD_FM, "\n\n"), Severity::Warning),
        vec!["body is empty"]
    );

    let warnings = messages(&check(GOOD_FM, "plain text only\n"), Severity::Warning).join("\n");
    assert!(warnings.contains("very short"));
    assert!(warnings.contains("no `# ` title"));
    assert!(warnings.contains("no `## ` sections"));

    let long_body = format!("{GOOD_BODY}{}", "line\n".repeat(500));
    assert_eq!(
        messages(&check(GOOD_FM, &long_body), Severity::Warning),
        vec!["body has 505 lines (more than 500)"]
    );
}

#[test]
fn name_pattern() {
    for ok in ["a", "api-design", "v2", "a-1-b"] {
        assert!(is_valid_name(ok), "{ok}");
    }
    for bad in ["", "-a", "a-", "a--b", "Api", "a_b", "a b", "데이터"] {
        assert!(!is_valid_name(bad), "{bad}");
    }
}

// ============================================================================
// Trees
// ============================================================================

#[test]
fn tree_report_over_corpus() {
    let report = check_tree(&fixture("corpus"), &RegistryOptions::default()).unwrap();
    assert_eq!(report.checked, 9);
    assert!(report.has_errors());

    let error_paths: Vec<PathBuf> = report.errors().map(|i| i.path.clone()).collect();
    assert_eq!(
        error_paths,
        vec![
            fixture("corpus/broken/missing-description/SKILL.md"),
            fixture("corpus/broken/no-frontmatter/SKILL.md"),
            fixture("corpus/broken/unterminated/SKILL.md"),
        ]
    );

    let api = fixture("corpus/backend/api-design/SKILL.md");
    assert!(report.issues.iter().all(|i| i.path != api));

    let copy = fixture("corpus/tools/debugging-copy/SKILL.md");
    let copy_warnings: Vec<&str> = report
        .warnings()
        .filter(|i| i.path == copy)
        .map(|i| i.message.as_str())
        .collect();
    assert!(copy_warnings.iter().any(|m| m.contains("differs from its directory")));
    assert!(copy_warnings.iter().any(|m| m.starts_with("duplicate record `debugging`")));

    assert!(report
        .warnings()
        .any(|i| i.message == "uncommon allowed tool `Figma`"));
}

#[test]
fn clean_tree_has_no_errors() {
    let report = check_tree(&fixture("scenario"), &RegistryOptions::default()).unwrap();
    assert_eq!(report.checked, 2);
    assert!(!report.has_errors());
}
