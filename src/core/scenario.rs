use crate::domain::model::{Fixture, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocker,
    Critical,
    #[default]
    Normal,
    Minor,
    Trivial,
}

/// Reporting metadata attached to a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub suite: String,
    pub title: String,
    pub severity: Severity,
    pub tags: Vec<String>,
    pub links: Vec<String>,
    pub description: Option<String>,
}

/// What a scenario sends to the API and how the result is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Convert `input`, minify both sides through the API, compare.
    MinifiedXml {
        operation: Operation,
        input: Fixture,
        expected: Fixture,
    },
    /// Convert `input` and compare the text with `expected` byte for byte.
    Verbatim {
        operation: Operation,
        input: Fixture,
        expected: Fixture,
    },
    /// Convert a YAML fixture to JSON and deep-compare with the parsed JSON fixture.
    Mapping { input: Fixture, expected: Fixture },
    /// Run the YAML validator on `input` and compare its message.
    ValidatorMessage {
        input: Fixture,
        expected_message: String,
    },
    /// YAML -> XML -> YAML; the intermediate XML must match `xml` and the
    /// final YAML must match `yaml`.
    YamlXmlRoundTrip { yaml: Fixture, xml: Fixture },
}

impl Check {
    /// Input fixtures the check reads, in the order it reads them.
    pub fn fixtures(&self) -> Vec<&Fixture> {
        match self {
            Check::MinifiedXml {
                input, expected, ..
            }
            | Check::Verbatim {
                input, expected, ..
            }
            | Check::Mapping { input, expected } => vec![input, expected],
            Check::ValidatorMessage { input, .. } => vec![input],
            Check::YamlXmlRoundTrip { yaml, xml } => vec![xml, yaml],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    #[default]
    Pass,
    /// The API is known to get this wrong; failures are reported as expected.
    KnownBug { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub meta: ScenarioMeta,
    pub check: Check,
    pub expectation: Expectation,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        suite: &str,
        title: &str,
        check: Check,
    ) -> Self {
        Self {
            name: name.into(),
            meta: ScenarioMeta {
                suite: suite.to_string(),
                title: title.to_string(),
                severity: Severity::default(),
                tags: Vec::new(),
                links: Vec::new(),
                description: None,
            },
            check,
            expectation: Expectation::Pass,
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.meta.severity = severity;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.meta.tags.push(tag.to_string());
        self
    }

    pub fn link(mut self, url: &str) -> Self {
        self.meta.links.push(url.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.meta.description = Some(text.to_string());
        self
    }

    pub fn known_bug(mut self, reason: &str) -> Self {
        self.expectation = Expectation::KnownBug {
            reason: reason.to_string(),
        };
        self
    }

    /// Name without the parameter suffix: `yaml_to_xml[2]` belongs to case `yaml_to_xml`.
    pub fn case(&self) -> &str {
        self.name
            .split_once('[')
            .map_or(self.name.as_str(), |(case, _)| case)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.meta.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_known_bug(&self) -> bool {
        matches!(self.expectation, Expectation::KnownBug { .. })
    }
}
