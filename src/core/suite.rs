use crate::core::runner::{Outcome, ScenarioReport, ScenarioRunner};
use crate::core::scenario::Scenario;
use crate::domain::ports::{ConversionApi, FixtureSource};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Selects scenarios by case, name substring and/or tag. An empty filter selects everything.
#[derive(Debug, Clone, Default)]
pub struct ScenarioFilter {
    /// Exact case name, matching every parameter of it (`yaml_to_xml` selects `yaml_to_xml[2]` only).
    pub case: Option<String>,
    pub name_contains: Option<String>,
    pub tag: Option<String>,
}

impl ScenarioFilter {
    pub fn case(case: impl Into<String>) -> Self {
        Self {
            case: Some(case.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, scenario: &Scenario) -> bool {
        let case_ok = self.case.as_deref().map_or(true, |case| scenario.case() == case);
        let name_ok = self
            .name_contains
            .as_deref()
            .map_or(true, |needle| scenario.name.contains(needle));
        let tag_ok = self.tag.as_deref().map_or(true, |tag| scenario.has_tag(tag));
        case_ok && name_ok && tag_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub expected_failures: usize,
    pub unexpected_passes: usize,
}

impl Summary {
    fn from_reports(reports: &[ScenarioReport]) -> Self {
        let mut summary = Summary {
            total: reports.len(),
            ..Summary::default()
        };
        for report in reports {
            match report.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed { .. } => summary.failed += 1,
                Outcome::ExpectedFailure { .. } => summary.expected_failures += 1,
                Outcome::UnexpectedPass { .. } => summary.unexpected_passes += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub strict: bool,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Scenarios whose outcome fails the run under this report's strictness.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        let strict = self.strict;
        self.scenarios
            .iter()
            .filter(move |report| report.outcome.is_failure(strict))
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|report| report.name == name)
    }

    pub async fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json_data = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json_data).await?;
        tracing::debug!("Run report written to {}", path.display());
        Ok(())
    }
}

/// Runs a list of scenarios one after another and collects a [`RunReport`].
pub struct SuiteRunner<A: ConversionApi, F: FixtureSource> {
    runner: ScenarioRunner<A, F>,
    strict: bool,
}

impl<A: ConversionApi, F: FixtureSource> SuiteRunner<A, F> {
    pub fn new(api: A, fixtures: F) -> Self {
        Self {
            runner: ScenarioRunner::new(api, fixtures),
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub async fn run_all(&self, scenarios: &[Scenario], filter: &ScenarioFilter) -> RunReport {
        let started_at = Utc::now();
        let selected: Vec<&Scenario> = scenarios.iter().filter(|s| filter.matches(s)).collect();
        tracing::info!("Running {} of {} scenarios", selected.len(), scenarios.len());

        let mut reports = Vec::with_capacity(selected.len());
        for scenario in selected {
            reports.push(self.runner.run(scenario).await);
        }

        let summary = Summary::from_reports(&reports);
        tracing::info!(
            "📊 {} passed, {} failed, {} expected failures, {} unexpected passes",
            summary.passed,
            summary.failed,
            summary.expected_failures,
            summary.unexpected_passes
        );

        RunReport {
            started_at,
            finished_at: Utc::now(),
            strict: self.strict,
            summary,
            scenarios: reports,
        }
    }
}
