//! Replays a corpus of Java declarations through the full validator.
//!
//! Each declaration below mirrors one in the Java fixture sources (`NamingRulesTest.java`,
//! `UserManager.java`, `sample.java`), with the verdict a naming reviewer would give.

use naming_guardian::{
    gate, ConfigBuilder, Declaration, DeclarationKind, Modifier, NamingConfig, NamingValidator,
    Role, SourceLocation, ValidationOptions, ViolatedConstraint,
};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

use DeclarationKind::*;
use ViolatedConstraint::*;

const NAMING_RULES_TEST: &str = "com/example/naming/NamingRulesTest.java";
const USER_MANAGER: &str = "com/example/naming/UserManager.java";
const SAMPLE: &str = "sample.java";

struct Fixture {
    identifier: &'static str,
    kind: DeclarationKind,
    modifiers: &'static [Modifier],
    file: &'static str,
    line: u32,
    expected: Option<ViolatedConstraint>,
}

const fn fixture(
    identifier: &'static str,
    kind: DeclarationKind,
    modifiers: &'static [Modifier],
    file: &'static str,
    line: u32,
    expected: Option<ViolatedConstraint>,
) -> Fixture {
    Fixture { identifier, kind, modifiers, file, line, expected }
}

const CONSTANT: &[Modifier] = &[Modifier::Public, Modifier::Static, Modifier::Final];
const PRIVATE: &[Modifier] = &[Modifier::Private];
const PUBLIC: &[Modifier] = &[Modifier::Public];
const FINAL: &[Modifier] = &[Modifier::Final];
const NONE: &[Modifier] = &[];

fn corpus() -> Vec<Fixture> {
    vec![
        fixture("com.example.naming", Package, NONE, NAMING_RULES_TEST, 1, None),
        fixture("NamingRulesTest", Class, PUBLIC, NAMING_RULES_TEST, 6, None),
        fixture("DATABASE_URL", Field, CONSTANT, NAMING_RULES_TEST, 9, None),
        fixture("connectionTimeout", Field, CONSTANT, NAMING_RULES_TEST, 12, Some(WrongCase)),
        fixture("userName", Field, PRIVATE, NAMING_RULES_TEST, 15, None),
        fixture("maxRetryCount", Field, PRIVATE, NAMING_RULES_TEST, 16, None),
        fixture("UserEmail", Field, PRIVATE, NAMING_RULES_TEST, 19, Some(WrongCase)),
        fixture("max_count", Field, PRIVATE, NAMING_RULES_TEST, 22, Some(IllegalSeparator)),
        fixture("isactive", Field, PRIVATE, NAMING_RULES_TEST, 25, None),
        fixture("processUserData", Method, PUBLIC, NAMING_RULES_TEST, 30, None),
        fixture("count", LocalVariable, NONE, NAMING_RULES_TEST, 32, None),
        fixture("temporaryBuffer", LocalVariable, NONE, NAMING_RULES_TEST, 33, None),
        fixture("Result", LocalVariable, NONE, NAMING_RULES_TEST, 36, Some(WrongCase)),
        fixture("isvalid", LocalVariable, NONE, NAMING_RULES_TEST, 39, None),
        fixture("MAX_RETRY", LocalVariable, FINAL, NAMING_RULES_TEST, 42, Some(IllegalSeparator)),
        fixture("defaultValue", LocalVariable, FINAL, NAMING_RULES_TEST, 45, None),
        fixture("ProcessData", Method, PUBLIC, NAMING_RULES_TEST, 51, Some(WrongCase)),
        fixture("get_count", Method, PUBLIC, NAMING_RULES_TEST, 58, Some(IllegalSeparator)),
        fixture("updateuserprofile", Method, PUBLIC, NAMING_RULES_TEST, 65, None),
        fixture("User_Profile", Class, NONE, NAMING_RULES_TEST, 73, Some(IllegalSeparator)),
        fixture("dataProcessor", Class, NONE, NAMING_RULES_TEST, 80, Some(WrongCase)),
        fixture("userprofilemanager", Class, NONE, NAMING_RULES_TEST, 87, Some(AmbiguousWordBoundary)),
        fixture("DataProvider", Interface, NONE, NAMING_RULES_TEST, 94, None),
        fixture("dataConsumer", Interface, NONE, NAMING_RULES_TEST, 101, Some(WrongCase)),
        fixture("UserManager", Class, PUBLIC, USER_MANAGER, 4, None),
        fixture("name", Field, PRIVATE, USER_MANAGER, 5, None),
        fixture("processData", Method, PUBLIC, USER_MANAGER, 7, None),
        fixture("userService", Class, NONE, USER_MANAGER, 13, Some(WrongCase)),
        fixture("getData", Method, PUBLIC, USER_MANAGER, 14, None),
        fixture("User_Data", Class, NONE, USER_MANAGER, 20, Some(IllegalSeparator)),
        fixture("Product-Manager", Class, NONE, USER_MANAGER, 25, Some(IllegalSeparator)),
        fixture("Productmanager", Class, NONE, USER_MANAGER, 30, None),
        fixture("ABcService", Class, NONE, USER_MANAGER, 35, Some(AmbiguousAcronymPlacement)),
        fixture("XMLParser", Class, NONE, USER_MANAGER, 40, None),
        fixture("xml", Parameter, NONE, USER_MANAGER, 41, None),
        fixture("UserProfileManager", Class, NONE, USER_MANAGER, 47, None),
        fixture("userId", Field, PRIVATE, USER_MANAGER, 48, None),
        fixture("OAuth2Client", Class, NONE, USER_MANAGER, 52, None),
        fixture("clientId", Field, PRIVATE, USER_MANAGER, 53, None),
        fixture("DATAPROCESSOR", Class, NONE, USER_MANAGER, 57, Some(AmbiguousWordBoundary)),
        fixture("goodClass", Class, PUBLIC, SAMPLE, 2, Some(WrongCase)),
        fixture("value", Field, PRIVATE, SAMPLE, 3, None),
        fixture("getValue", Method, PUBLIC, SAMPLE, 9, None),
        fixture("anotherBadNamedClass", Class, NONE, SAMPLE, 14, Some(WrongCase)),
        fixture("GoodClass", Class, NONE, SAMPLE, 22, None),
        fixture("status", Field, PRIVATE, SAMPLE, 23, None),
    ]
}

fn declaration(f: &Fixture) -> Declaration {
    Declaration::new(f.identifier, f.kind, SourceLocation::new(f.file, f.line))
        .with_modifiers(f.modifiers.iter().copied())
}

fn declarations() -> Vec<Declaration> {
    corpus().iter().map(declaration).collect()
}

fn verdicts(validator: &NamingValidator, options: &ValidationOptions) -> Vec<(String, ViolatedConstraint)> {
    validator
        .validate_declarations(declarations(), options)
        .unwrap()
        .violations
        .into_iter()
        .map(|v| (v.declaration.identifier, v.constraint))
        .collect()
}

fn expected_verdicts() -> Vec<(String, ViolatedConstraint)> {
    corpus()
        .into_iter()
        .filter_map(|f| f.expected.map(|c| (f.identifier.to_string(), c)))
        .collect()
}

#[rstest]
#[case::sequential(false)]
#[case::parallel(true)]
fn corpus_matches_expected_verdicts(#[case] parallel: bool) {
    let validator = NamingValidator::new().unwrap();
    let options = ValidationOptions { parallel, ..Default::default() };

    assert_eq!(verdicts(&validator, &options), expected_verdicts());
}

#[test]
fn type_violations_block_and_member_violations_warn() {
    let validator = NamingValidator::new().unwrap();
    let report = validator.validate_declarations(declarations(), &ValidationOptions::default()).unwrap();

    assert!(report.has_errors());
    for violation in &report.violations {
        let blocking = matches!(violation.role, Role::TypeName | Role::InterfaceName);
        assert_eq!(violation.is_blocking(), blocking, "{}", violation.format_display());
    }
    assert_eq!(report.summary.total_declarations, corpus().len());
    assert!(report.rejected.is_empty());
}

#[test]
fn repeated_passes_are_identical() {
    let validator = NamingValidator::new().unwrap();
    let first = validator.validate_declarations(declarations(), &ValidationOptions::default()).unwrap();
    let second = validator.validate_declarations(declarations(), &ValidationOptions::default()).unwrap();

    assert_eq!(first.violations, second.violations);
}

#[test]
fn final_locals_as_constants_flips_local_verdicts() {
    let config = ConfigBuilder::new().final_locals_as_constants(true).build().unwrap();
    let validator = NamingValidator::new_with_config(config).unwrap();
    let verdicts = verdicts(&validator, &ValidationOptions::default());

    assert!(!verdicts.iter().any(|(id, _)| id == "MAX_RETRY"));
    assert!(verdicts.contains(&("defaultValue".to_string(), WrongCase)));
}

#[test]
fn unsegmented_length_limit_flags_run_together_words() {
    let config = ConfigBuilder::new().max_unsegmented_length(7).build().unwrap();
    let validator = NamingValidator::new_with_config(config).unwrap();
    let flagged: Vec<String> = verdicts(&validator, &ValidationOptions::default())
        .into_iter()
        .filter(|(_, c)| *c == AmbiguousWordBoundary)
        .map(|(id, _)| id)
        .collect();

    for identifier in ["isactive", "updateuserprofile", "Productmanager", "userprofilemanager"] {
        assert!(flagged.iter().any(|id| id == identifier), "{identifier} not flagged");
    }
    // seven characters is within the limit
    assert!(!flagged.iter().any(|id| id == "isvalid"));
}

#[tokio::test]
async fn manifests_on_disk_gate_a_commit() {
    let temp_dir = TempDir::new().unwrap();
    let entries: Vec<serde_json::Value> = corpus()
        .iter()
        .filter(|f| f.file == USER_MANAGER)
        .map(|f| {
            serde_json::json!({
                "identifier": f.identifier,
                "kind": f.kind,
                "modifiers": f.modifiers,
                "line": f.line
            })
        })
        .collect();
    let manifest = temp_dir.path().join("UserManager.json");
    fs::write(
        &manifest,
        serde_json::to_string(&serde_json::json!({ "file": USER_MANAGER, "declarations": entries })).unwrap(),
    )
    .unwrap();

    let validator = NamingValidator::new_with_config(NamingConfig::default()).unwrap();
    let report = validator
        .validate_stream(vec![temp_dir.path()], &ValidationOptions::default())
        .await
        .unwrap();
    assert_eq!(report.violations.len(), 5);

    assert!(gate::pre_commit_check(vec![&manifest]).await.is_err());
}

#[test]
fn common_acronyms_keep_corpus_verdicts() {
    let config = ConfigBuilder::new().common_acronyms().build().unwrap();
    let validator = NamingValidator::new_with_config(config).unwrap();

    assert_eq!(verdicts(&validator, &ValidationOptions::default()), expected_verdicts());

    let extra = vec![
        Declaration::new("JSONParser", Class, SourceLocation::new("Extra.java", 1)),
        Declaration::new("HTTPClient", Class, SourceLocation::new("Extra.java", 2)),
        Declaration::new("userIDs", Field, SourceLocation::new("Extra.java", 3)),
        Declaration::new("QZXReader", Class, SourceLocation::new("Extra.java", 4)),
    ];
    let report = validator.validate_declarations(extra, &ValidationOptions::default()).unwrap();
    let flagged: Vec<(&str, ViolatedConstraint)> = report
        .violations
        .iter()
        .map(|v| (v.identifier(), v.constraint))
        .collect();
    assert_eq!(flagged, vec![("QZXReader", AmbiguousAcronymPlacement)]);
}

#[test]
fn manifests_under_a_target_directory_are_scanned() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("target").join("naming");
    fs::create_dir_all(root.join("target")).unwrap();
    let manifest = r#"{ "file": "A.java", "declarations": [ { "identifier": "bad_class", "kind": "class", "line": 1 } ] }"#;
    fs::write(root.join("a.json"), manifest).unwrap();
    fs::write(root.join("target").join("b.json"), manifest.replace("A.java", "B.java")).unwrap();

    let validator = NamingValidator::new().unwrap();
    let report = validator.validate_paths(&[&root], &ValidationOptions::default()).unwrap();

    // only the nested target/ below the scan root is excluded
    assert_eq!(report.summary.total_declarations, 1);
    assert!(report.has_errors());
}
