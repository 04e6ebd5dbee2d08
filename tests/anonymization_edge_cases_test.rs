//! Edge case coverage for detection and span replacement

use veil::anonymization::{
    config::AnonymizerConfig, Anonymizer, EntityCategory, Operator, RecognizerRule,
};

fn default_anonymizer() -> Anonymizer {
    Anonymizer::new(AnonymizerConfig::default()).unwrap()
}

#[test]
fn empty_input_yields_empty_output() {
    let anonymizer = default_anonymizer();
    assert_eq!(anonymizer.anonymize("").unwrap(), "");
}

#[test]
fn pii_at_start_and_end_of_text() {
    let anonymizer = default_anonymizer();

    assert_eq!(
        anonymizer.anonymize("jane@example.com sent it").unwrap(),
        "<EMAIL_ADDRESS> sent it"
    );
    assert_eq!(
        anonymizer.anonymize("reply to jane@example.com").unwrap(),
        "reply to <EMAIL_ADDRESS>"
    );
}

#[test]
fn adjacent_detections_do_not_corrupt_surrounding_text() {
    let anonymizer = default_anonymizer();
    let output = anonymizer
        .anonymize("a@b.com,c@d.com and 10.0.0.1")
        .unwrap();

    assert_eq!(output, "<EMAIL_ADDRESS>,<EMAIL_ADDRESS> and <IP_ADDRESS>");
}

#[test]
fn overlapping_detections_keep_highest_score() {
    let mut anonymizer = default_anonymizer();

    // Two rules that both match a 9-digit run, one wider and stronger
    anonymizer
        .add_recognizer(RecognizerRule::new(
            "digits_weak",
            "ACCOUNT_NUMBER",
            r"\d{6}",
            0.5,
        ))
        .unwrap();
    anonymizer
        .add_recognizer(RecognizerRule::new(
            "digits_strong",
            "PHONE_NUMBER",
            r"\d{9}",
            0.9,
        ))
        .unwrap();

    let output = anonymizer.anonymize("id 666555444 end").unwrap();
    assert_eq!(output, "id <PHONE_NUMBER> end");
}

#[test]
fn multibyte_text_around_detections_is_preserved() {
    let anonymizer = default_anonymizer();
    let output = anonymizer
        .anonymize("Écrivez à jane@example.com, s'il vous plaît ✉")
        .unwrap();

    assert_eq!(output, "Écrivez à <EMAIL_ADDRESS>, s'il vous plaît ✉");
}

#[test]
fn repeated_values_are_each_replaced() {
    let anonymizer = default_anonymizer();
    let output = anonymizer
        .anonymize("jane@example.com wrote to jane@example.com")
        .unwrap();

    assert_eq!(output, "<EMAIL_ADDRESS> wrote to <EMAIL_ADDRESS>");
}

#[test]
fn category_names_are_normalized() {
    let mut anonymizer = default_anonymizer();

    anonymizer
        .add_recognizer(RecognizerRule::new(
            "employee_id",
            "employee id",
            r"\bEMP-\d{4}\b",
            0.9,
        ))
        .unwrap();

    // Operator registered under a differently-cased spelling still applies
    anonymizer.add_operator("Employee-Id", Operator::fixed("EMP-0000"));

    assert_eq!(
        anonymizer.anonymize("badge EMP-1234").unwrap(),
        "badge EMP-0000"
    );
    assert_eq!(EntityCategory::new("employee id").as_str(), "EMPLOYEE_ID");
}

#[test]
fn failing_operator_propagates_an_error() {
    let mut anonymizer = default_anonymizer();
    anonymizer.add_operator(
        "EMAIL_ADDRESS",
        Operator::new(|_| anyhow::bail!("replacement backend unavailable")),
    );

    let err = anonymizer.anonymize("write jane@example.com").unwrap_err();
    assert!(format!("{err:#}").contains("unavailable"));
}

#[test]
fn detections_below_threshold_are_ignored() {
    let config = AnonymizerConfig {
        confidence_threshold: 0.9,
        ..Default::default()
    };
    let anonymizer = Anonymizer::new(config).unwrap();

    // credit_card confidence (0.5) falls under the raised threshold
    let input = "card 4111111111111111";
    assert_eq!(anonymizer.anonymize(input).unwrap(), input);
}

#[test]
fn audit_log_never_contains_plaintext_pii() {
    use veil::anonymization::config::AuditConfig;

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("audit.log");

    let config = AnonymizerConfig {
        audit: AuditConfig {
            enabled: true,
            log_path: log_path.clone(),
            json_format: true,
        },
        ..Default::default()
    };
    let anonymizer = Anonymizer::new(config).unwrap();

    anonymizer
        .anonymize("mail jane@example.com from 10.0.0.1")
        .unwrap();

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(!contents.contains("jane@example.com"));
    assert!(!contents.contains("10.0.0.1"));
    assert!(contents.contains("EMAIL_ADDRESS"));
    assert!(contents.contains("IP_ADDRESS"));
}
