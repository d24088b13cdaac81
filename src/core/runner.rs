use crate::core::scenario::{Check, Expectation, Scenario, ScenarioMeta};
use crate::domain::model::{Fixture, Operation};
use crate::domain::ports::{ConversionApi, FixtureSource};
use crate::utils::converters::json_to_map;
use crate::utils::error::{ErrorCategory, SuiteError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Instant;

const PREPARE_STEP: &str = "Prepare test data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    /// An assertion did not hold.
    Failed,
    /// The step raised an error before it could assert anything.
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { reason: String },
    ExpectedFailure { reason: String, detail: String },
    UnexpectedPass { reason: String },
}

impl Outcome {
    /// Whether this outcome should fail the run. Unexpected passes only count in strict mode.
    pub fn is_failure(&self, strict: bool) -> bool {
        match self {
            Outcome::Failed { .. } => true,
            Outcome::UnexpectedPass { .. } => strict,
            Outcome::Passed | Outcome::ExpectedFailure { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub meta: ScenarioMeta,
    pub steps: Vec<StepRecord>,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

/// Expected and actual values of a failed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub subject: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch\n  expected: {:?}\n  actual:   {:?}",
            self.subject, self.expected, self.actual
        )
    }
}

#[derive(Debug)]
enum Failure {
    Error(SuiteError),
    Mismatch(Mismatch),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(e) => write!(f, "{}", e),
            Failure::Mismatch(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Default)]
struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    async fn step<T, Fut>(&mut self, name: &str, work: Fut) -> Result<T, Failure>
    where
        Fut: Future<Output = Result<T, SuiteError>>,
    {
        tracing::debug!("Step: {}", name);
        let started = Instant::now();
        let result = work.await;
        self.record(
            name,
            if result.is_ok() {
                StepStatus::Passed
            } else {
                StepStatus::Broken
            },
            started,
        );
        result.map_err(Failure::Error)
    }

    fn compare<T>(&mut self, name: &str, subject: &str, expected: &T, actual: &T) -> Result<(), Failure>
    where
        T: PartialEq + fmt::Display,
    {
        let started = Instant::now();
        let mismatch = (expected != actual).then(|| Mismatch {
            subject: subject.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
        self.settle(name, started, mismatch)
    }

    /// One step over several `(subject, expected, actual)` pairs; the first mismatch fails it.
    fn compare_each(&mut self, name: &str, pairs: &[(&str, &str, &str)]) -> Result<(), Failure> {
        let started = Instant::now();
        let mismatch = pairs
            .iter()
            .find(|(_, expected, actual)| expected != actual)
            .map(|(subject, expected, actual)| Mismatch {
                subject: subject.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        self.settle(name, started, mismatch)
    }

    fn settle(&mut self, name: &str, started: Instant, mismatch: Option<Mismatch>) -> Result<(), Failure> {
        match mismatch {
            None => {
                self.record(name, StepStatus::Passed, started);
                Ok(())
            }
            Some(mismatch) => {
                self.record(name, StepStatus::Failed, started);
                Err(Failure::Mismatch(mismatch))
            }
        }
    }

    fn record(&mut self, name: &str, status: StepStatus, started: Instant) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status,
            duration_ms: started.elapsed().as_millis() as u64,
        });
    }
}

/// Executes single scenarios against an API and a fixture source.
pub struct ScenarioRunner<A: ConversionApi, F: FixtureSource> {
    api: A,
    fixtures: F,
}

impl<A: ConversionApi, F: FixtureSource> ScenarioRunner<A, F> {
    pub fn new(api: A, fixtures: F) -> Self {
        Self { api, fixtures }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn run(&self, scenario: &Scenario) -> ScenarioReport {
        tracing::info!("▶ {} ({})", scenario.name, scenario.meta.title);
        let started = Instant::now();
        let mut log = StepLog::default();

        let result = self.execute(&scenario.check, &mut log).await;
        let outcome = Self::judge(&scenario.expectation, result);

        match &outcome {
            Outcome::Passed => tracing::info!("✅ {} passed", scenario.name),
            Outcome::Failed { reason } => tracing::error!("❌ {} failed: {}", scenario.name, reason),
            Outcome::ExpectedFailure { reason, detail } => {
                tracing::warn!("⚠️ {} failed as expected ({}): {}", scenario.name, reason, detail)
            }
            Outcome::UnexpectedPass { reason } => {
                tracing::warn!("⚠️ {} passed but is marked as a known bug ({})", scenario.name, reason)
            }
        }

        ScenarioReport {
            name: scenario.name.clone(),
            meta: scenario.meta.clone(),
            steps: log.records,
            outcome,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn judge(expectation: &Expectation, result: Result<(), Failure>) -> Outcome {
        match (expectation, result) {
            (Expectation::Pass, Ok(())) => Outcome::Passed,
            (Expectation::Pass, Err(failure)) => Outcome::Failed {
                reason: failure.to_string(),
            },
            (Expectation::KnownBug { reason }, Ok(())) => Outcome::UnexpectedPass {
                reason: reason.clone(),
            },
            // Broken fixtures or config are never excused by a known API bug.
            (Expectation::KnownBug { .. }, Err(Failure::Error(e)))
                if e.category() != ErrorCategory::Api =>
            {
                Outcome::Failed {
                    reason: e.to_string(),
                }
            }
            (Expectation::KnownBug { reason }, Err(failure)) => Outcome::ExpectedFailure {
                reason: reason.clone(),
                detail: failure.to_string(),
            },
        }
    }

    async fn execute(&self, check: &Check, log: &mut StepLog) -> Result<(), Failure> {
        match check {
            Check::MinifiedXml {
                operation,
                input,
                expected,
            } => self.check_minified_xml(*operation, input, expected, log).await,
            Check::Verbatim {
                operation,
                input,
                expected,
            } => self.check_verbatim(*operation, input, expected, log).await,
            Check::Mapping { input, expected } => self.check_mapping(input, expected, log).await,
            Check::ValidatorMessage {
                input,
                expected_message,
            } => self.check_validator(input, expected_message, log).await,
            Check::YamlXmlRoundTrip { yaml, xml } => self.check_round_trip(yaml, xml, log).await,
        }
    }

    async fn check_minified_xml(
        &self,
        operation: Operation,
        input: &Fixture,
        expected: &Fixture,
        log: &mut StepLog,
    ) -> Result<(), Failure> {
        let (source, mini_expected) = log
            .step(PREPARE_STEP, async {
                let source = self.fixtures.load(input).await?;
                let expected_xml = self.fixtures.load(expected).await?;
                let mini_expected = self.api.minify_xml(&expected_xml).await?;
                Ok::<_, SuiteError>((source, mini_expected))
            })
            .await?;

        let mini_actual = log
            .step(&operation.step_title(), async {
                let actual = self.api.convert_text(operation, &source).await?;
                self.api.minify_xml(&actual).await
            })
            .await?;

        log.compare("Compare expected and actual XML", "XML", &mini_expected, &mini_actual)
    }

    async fn check_verbatim(
        &self,
        operation: Operation,
        input: &Fixture,
        expected: &Fixture,
        log: &mut StepLog,
    ) -> Result<(), Failure> {
        let (source, expected_text) = log
            .step(PREPARE_STEP, async {
                let source = self.fixtures.load(input).await?;
                let expected_text = self.fixtures.load(expected).await?;
                Ok::<_, SuiteError>((source, expected_text))
            })
            .await?;

        let actual = log
            .step(&operation.step_title(), self.api.convert_text(operation, &source))
            .await?;

        let subject = operation.target_format().label();
        log.compare(
            &format!("Compare expected and actual {}", subject),
            subject,
            &expected_text,
            &actual,
        )
    }

    async fn check_mapping(
        &self,
        input: &Fixture,
        expected: &Fixture,
        log: &mut StepLog,
    ) -> Result<(), Failure> {
        let (source, expected_map) = log
            .step(PREPARE_STEP, async {
                let source = self.fixtures.load(input).await?;
                let expected_json = self.fixtures.load(expected).await?;
                let expected_map = json_to_map(&expected_json, &expected.relative_path())?;
                Ok::<_, SuiteError>((source, expected_map))
            })
            .await?;

        let actual_map = log
            .step(
                &Operation::YamlToJson.step_title(),
                self.api.yaml_to_json(&source),
            )
            .await?;

        log.compare(
            "Compare expected and actual mapping",
            "Mapping",
            &serde_json::Value::Object(expected_map),
            &serde_json::Value::Object(actual_map),
        )
    }

    async fn check_validator(
        &self,
        input: &Fixture,
        expected_message: &str,
        log: &mut StepLog,
    ) -> Result<(), Failure> {
        let document = log
            .step(PREPARE_STEP, self.fixtures.load(input))
            .await?;

        let actual = log
            .step(
                &Operation::ValidateYaml.step_title(),
                self.api.validate_yaml(&document),
            )
            .await?;

        log.compare(
            "Compare expected and actual text",
            "Validator message",
            &expected_message.to_string(),
            &actual,
        )
    }

    async fn check_round_trip(
        &self,
        yaml: &Fixture,
        xml: &Fixture,
        log: &mut StepLog,
    ) -> Result<(), Failure> {
        let (mini_expected_xml, expected_yaml) = log
            .step(PREPARE_STEP, async {
                let expected_xml = self.fixtures.load(xml).await?;
                let mini_expected_xml = self.api.minify_xml(&expected_xml).await?;
                let expected_yaml = self.fixtures.load(yaml).await?;
                Ok::<_, SuiteError>((mini_expected_xml, expected_yaml))
            })
            .await?;

        let mini_actual_xml = log
            .step(&Operation::YamlToXml.step_title(), async {
                let actual_xml = self.api.yaml_to_xml(&expected_yaml).await?;
                self.api.minify_xml(&actual_xml).await
            })
            .await?;

        let actual_yaml = log
            .step(
                &Operation::XmlToYaml.step_title(),
                self.api.xml_to_yaml(&mini_actual_xml),
            )
            .await?;

        log.compare_each(
            "Compare expected and actual YAML and XML",
            &[
                ("XML", mini_expected_xml.as_str(), mini_actual_xml.as_str()),
                ("YAML", expected_yaml.as_str(), actual_yaml.as_str()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::Severity;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryFixtures {
        files: HashMap<String, String>,
    }

    impl MemoryFixtures {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl FixtureSource for MemoryFixtures {
        async fn read_data_file(&self, relative_path: &str) -> Result<String> {
            self.files
                .get(relative_path)
                .cloned()
                .ok_or_else(|| SuiteError::FixtureNotFoundError {
                    path: relative_path.to_string(),
                })
        }
    }

    /// Answers from a lookup table keyed by (operation, input) and records every call.
    #[derive(Default)]
    struct ScriptedApi {
        answers: HashMap<(Operation, String), String>,
        calls: Mutex<Vec<Operation>>,
    }

    impl ScriptedApi {
        fn answer(mut self, operation: Operation, input: &str, output: &str) -> Self {
            self.answers
                .insert((operation, input.to_string()), output.to_string());
            self
        }

        fn calls(&self) -> Vec<Operation> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self, operation: Operation, input: &str) -> Result<String> {
            self.calls.lock().unwrap().push(operation);
            self.answers
                .get(&(operation, input.to_string()))
                .cloned()
                .ok_or_else(|| SuiteError::ApiStatusError {
                    operation: operation.name().to_string(),
                    status: 400,
                    body: format!("no scripted answer for {:?}", input),
                })
        }
    }

    #[async_trait]
    impl ConversionApi for ScriptedApi {
        async fn json_to_xml(&self, json: &str) -> Result<String> {
            self.respond(Operation::JsonToXml, json)
        }
        async fn json_to_yaml(&self, json: &str) -> Result<String> {
            self.respond(Operation::JsonToYaml, json)
        }
        async fn yaml_to_json(&self, yaml: &str) -> Result<Map<String, Value>> {
            let text = self.respond(Operation::YamlToJson, yaml)?;
            json_to_map(&text, "yaml_to_json")
        }
        async fn yaml_to_xml(&self, yaml: &str) -> Result<String> {
            self.respond(Operation::YamlToXml, yaml)
        }
        async fn xml_to_yaml(&self, xml: &str) -> Result<String> {
            self.respond(Operation::XmlToYaml, xml)
        }
        async fn extract_text_from_json(&self, json: &str) -> Result<String> {
            self.respond(Operation::ExtractTextFromJson, json)
        }
        async fn validate_yaml(&self, document: &str) -> Result<String> {
            self.respond(Operation::ValidateYaml, document)
        }
        async fn minify_xml(&self, xml: &str) -> Result<String> {
            self.respond(Operation::MinifyXml, xml)
        }
    }

    const XML: &str = "<?xml version=\"1.0\"?>\n<root>\n  <a>1</a>\n</root>\n";
    const MINI_XML: &str = "<?xml version=\"1.0\"?><root><a>1</a></root>";
    const JSON: &str = "{\n  \"a\": 1\n}\n";
    const YAML: &str = "a: 1\n";

    fn fixtures() -> MemoryFixtures {
        MemoryFixtures::new(&[
            ("json/1.json", JSON),
            ("xml/1.xml", XML),
            ("yaml/1.yaml", YAML),
        ])
    }

    fn scenario(check: Check) -> Scenario {
        Scenario::new("case[1]", "suite", "title", check).severity(Severity::Minor)
    }

    fn json_to_xml_check() -> Check {
        Check::MinifiedXml {
            operation: Operation::JsonToXml,
            input: Fixture::json("1"),
            expected: Fixture::xml("1"),
        }
    }

    #[tokio::test]
    async fn test_minified_xml_passes_when_minified_forms_match() {
        let api = ScriptedApi::default()
            .answer(Operation::JsonToXml, JSON, "<root>\n<a>1</a>\n</root>")
            .answer(Operation::MinifyXml, XML, MINI_XML)
            .answer(Operation::MinifyXml, "<root>\n<a>1</a>\n</root>", MINI_XML);
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner.run(&scenario(json_to_xml_check())).await;

        assert_eq!(report.outcome, Outcome::Passed);
        let step_names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            step_names,
            vec![
                "Prepare test data",
                "Convert JSON to XML via API",
                "Compare expected and actual XML"
            ]
        );
        assert!(report.steps.iter().all(|s| s.status == StepStatus::Passed));
        assert_eq!(
            runner.api().calls(),
            vec![Operation::MinifyXml, Operation::JsonToXml, Operation::MinifyXml]
        );
    }

    #[tokio::test]
    async fn test_mismatch_reports_expected_and_actual() {
        let api = ScriptedApi::default()
            .answer(Operation::JsonToYaml, JSON, "a: 2\n");
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(&scenario(Check::Verbatim {
                operation: Operation::JsonToYaml,
                input: Fixture::json("1"),
                expected: Fixture::yaml("1"),
            }))
            .await;

        match &report.outcome {
            Outcome::Failed { reason } => {
                assert!(reason.starts_with("YAML mismatch"), "{reason}");
                assert!(reason.contains("a: 1"));
                assert!(reason.contains("a: 2"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(report.steps.last().unwrap().status, StepStatus::Failed);
    }

    #[tokio::test]
    async fn test_missing_fixture_fails_before_any_api_call() {
        let runner = ScenarioRunner::new(ScriptedApi::default(), MemoryFixtures::new(&[]));

        let report = runner.run(&scenario(json_to_xml_check())).await;

        assert!(matches!(report.outcome, Outcome::Failed { ref reason } if reason.contains("json/1.json")));
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].status, StepStatus::Broken);
        assert!(runner.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_expected_json_fails_in_preparation() {
        let runner = ScenarioRunner::new(
            ScriptedApi::default(),
            MemoryFixtures::new(&[("yaml/1.yaml", YAML), ("json/1.json", "{\"a\": ")]),
        );

        let report = runner
            .run(&scenario(Check::Mapping {
                input: Fixture::yaml("1"),
                expected: Fixture::json("1"),
            }))
            .await;

        assert!(matches!(report.outcome, Outcome::Failed { ref reason } if reason.contains("Malformed JSON")));
        assert!(runner.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_mapping_compares_structurally() {
        let api = ScriptedApi::default().answer(Operation::YamlToJson, YAML, "{\"a\":1}");
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(&scenario(Check::Mapping {
                input: Fixture::yaml("1"),
                expected: Fixture::json("1"),
            }))
            .await;

        assert_eq!(report.outcome, Outcome::Passed);
    }

    #[tokio::test]
    async fn test_validator_message() {
        let api = ScriptedApi::default().answer(Operation::ValidateYaml, YAML, "Valid YAML");
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(&scenario(Check::ValidatorMessage {
                input: Fixture::yaml("1"),
                expected_message: "Valid YAML".to_string(),
            }))
            .await;

        assert_eq!(report.outcome, Outcome::Passed);
    }

    #[tokio::test]
    async fn test_known_bug_mismatch_is_expected_failure() {
        let api = ScriptedApi::default().answer(Operation::XmlToYaml, XML, "root:\n  a: '1'\n");
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(
                &scenario(Check::Verbatim {
                    operation: Operation::XmlToYaml,
                    input: Fixture::xml("1"),
                    expected: Fixture::yaml("1"),
                })
                .known_bug("Bug in the API"),
            )
            .await;

        match report.outcome {
            Outcome::ExpectedFailure { reason, detail } => {
                assert_eq!(reason, "Bug in the API");
                assert!(detail.contains("YAML mismatch"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_known_bug_api_error_is_expected_failure() {
        let runner = ScenarioRunner::new(ScriptedApi::default(), fixtures());

        let report = runner
            .run(
                &scenario(Check::Verbatim {
                    operation: Operation::XmlToYaml,
                    input: Fixture::xml("1"),
                    expected: Fixture::yaml("1"),
                })
                .known_bug("Bug in the API"),
            )
            .await;

        assert!(matches!(report.outcome, Outcome::ExpectedFailure { .. }));
        assert!(!report.outcome.is_failure(true));
    }

    #[tokio::test]
    async fn test_known_bug_with_missing_fixture_still_fails() {
        let runner = ScenarioRunner::new(ScriptedApi::default(), MemoryFixtures::new(&[]));

        let report = runner
            .run(
                &scenario(Check::YamlXmlRoundTrip {
                    yaml: Fixture::yaml("1"),
                    xml: Fixture::xml("1"),
                })
                .known_bug("Bug in the API"),
            )
            .await;

        assert!(matches!(report.outcome, Outcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_known_bug_that_passes_is_unexpected_pass() {
        let api = ScriptedApi::default()
            .answer(Operation::MinifyXml, XML, MINI_XML)
            .answer(Operation::MinifyXml, MINI_XML, MINI_XML)
            .answer(Operation::YamlToXml, YAML, XML)
            .answer(Operation::XmlToYaml, MINI_XML, YAML);
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(
                &scenario(Check::YamlXmlRoundTrip {
                    yaml: Fixture::yaml("1"),
                    xml: Fixture::xml("1"),
                })
                .known_bug("Bug in the API"),
            )
            .await;

        assert_eq!(
            report.outcome,
            Outcome::UnexpectedPass {
                reason: "Bug in the API".to_string()
            }
        );
        assert!(!report.outcome.is_failure(false));
        assert!(report.outcome.is_failure(true));
        let step_names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            step_names,
            vec![
                "Prepare test data",
                "Convert YAML to XML via API",
                "Convert XML to YAML via API",
                "Compare expected and actual YAML and XML"
            ]
        );
        assert_eq!(
            runner.api().calls(),
            vec![
                Operation::MinifyXml,
                Operation::YamlToXml,
                Operation::MinifyXml,
                Operation::XmlToYaml
            ]
        );
    }

    #[tokio::test]
    async fn test_round_trip_checks_xml_before_yaml() {
        let api = ScriptedApi::default()
            .answer(Operation::MinifyXml, XML, MINI_XML)
            .answer(Operation::YamlToXml, YAML, "<other/>")
            .answer(Operation::MinifyXml, "<other/>", "<other/>")
            .answer(Operation::XmlToYaml, "<other/>", YAML);
        let runner = ScenarioRunner::new(api, fixtures());

        let report = runner
            .run(&scenario(Check::YamlXmlRoundTrip {
                yaml: Fixture::yaml("1"),
                xml: Fixture::xml("1"),
            }))
            .await;

        assert!(matches!(report.outcome, Outcome::Failed { ref reason } if reason.starts_with("XML mismatch")));
        let compare_steps: Vec<&StepRecord> = report
            .steps
            .iter()
            .filter(|s| s.name.starts_with("Compare"))
            .collect();
        assert_eq!(compare_steps.len(), 1);
        assert_eq!(compare_steps[0].status, StepStatus::Failed);
    }
}
