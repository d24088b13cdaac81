use crate::core::scenario::{Check, Scenario, Severity};
use crate::domain::model::{Fixture, Operation};

pub const SUITE: &str = "Lambdatest API tests";

/// Fixture ids every parametrized scenario runs over.
pub const FIXTURE_IDS: [&str; 2] = ["1", "2"];

pub const VALID_YAML_MESSAGE: &str = "Valid YAML";

/// Validator message for an XML document, whose first line is the XML declaration.
pub const XML_AS_YAML_ERROR: &str = r#"Unable to parse at line 1 (near "<?xml version="1.0"?>")."#;

pub const KNOWN_API_BUG: &str = "Bug in the API";

const TOOLS_URL: &str = "https://www.lambdatest.com/free-online-tools";

fn tool_link(slug: &str) -> String {
    format!("{}/{}", TOOLS_URL, slug)
}

/// Every scenario the suite knows about, in execution order.
pub fn catalogue() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    for id in FIXTURE_IDS {
        scenarios.push(Scenario::new(
            format!("json_to_xml[{}]", id),
            SUITE,
            "JSON to XML conversion",
            Check::MinifiedXml {
                operation: Operation::JsonToXml,
                input: Fixture::json(id),
                expected: Fixture::xml(id),
            },
        ));
    }

    for id in FIXTURE_IDS {
        scenarios.push(
            Scenario::new(
                format!("extract_text_from_json[{}]", id),
                SUITE,
                "Extract text from JSON",
                Check::Verbatim {
                    operation: Operation::ExtractTextFromJson,
                    input: Fixture::json(id),
                    expected: Fixture::txt(id),
                },
            )
            .severity(Severity::Critical)
            .tag("smoke")
            .link(&tool_link("json-to-text"))
            .link("https://jira.com/TEST-1234")
            .description(
                "Verifies that the \"Extract Text from JSON\" endpoint works correctly.\n\
                 Steps:\n\
                 1. Prepare test data.\n\
                 2. Extract text from JSON via API.\n\
                 3. Compare expected and actual text.",
            ),
        );
    }

    for id in FIXTURE_IDS {
        scenarios.push(
            Scenario::new(
                format!("validate_yaml[{}]", id),
                SUITE,
                "Validate YAML",
                Check::ValidatorMessage {
                    input: Fixture::yaml(id),
                    expected_message: VALID_YAML_MESSAGE.to_string(),
                },
            )
            .link(&tool_link("yaml-validator")),
        );
    }

    for id in FIXTURE_IDS {
        scenarios.push(
            Scenario::new(
                format!("validate_yaml_invalid_input[{}]", id),
                SUITE,
                "Validate YAML with invalid file",
                Check::ValidatorMessage {
                    input: Fixture::xml(id),
                    expected_message: XML_AS_YAML_ERROR.to_string(),
                },
            )
            .link(&tool_link("yaml-validator")),
        );
    }

    for id in FIXTURE_IDS {
        scenarios.push(
            Scenario::new(
                format!("json_to_yaml[{}]", id),
                SUITE,
                "Convert JSON to YAML",
                Check::Verbatim {
                    operation: Operation::JsonToYaml,
                    input: Fixture::json(id),
                    expected: Fixture::yaml(id),
                },
            )
            .link(&tool_link("json-to-yaml")),
        );
    }

    for id in FIXTURE_IDS {
        scenarios.push(
            Scenario::new(
                format!("yaml_to_json[{}]", id),
                SUITE,
                "YAML to JSON conversion",
                Check::Mapping {
                    input: Fixture::yaml(id),
                    expected: Fixture::json(id),
                },
            )
            .link(&tool_link("yaml-to-json")),
        );
    }

    scenarios.push(
        Scenario::new(
            "yaml_to_xml[2]",
            SUITE,
            "YAML to XML conversion",
            Check::MinifiedXml {
                operation: Operation::YamlToXml,
                input: Fixture::yaml("2"),
                expected: Fixture::xml("2"),
            },
        )
        .link(&tool_link("yaml-to-xml")),
    );

    scenarios.push(
        Scenario::new(
            "xml_to_yaml[2]",
            SUITE,
            "XML to YAML conversion",
            Check::Verbatim {
                operation: Operation::XmlToYaml,
                input: Fixture::xml("2"),
                expected: Fixture::yaml("2"),
            },
        )
        .link(&tool_link("xml-to-yaml"))
        .known_bug(KNOWN_API_BUG),
    );

    scenarios.push(
        Scenario::new(
            "xml_to_yaml_via_yaml_to_xml[2]",
            SUITE,
            "XML to YAML via YAML to XML conversion",
            Check::YamlXmlRoundTrip {
                yaml: Fixture::yaml("2"),
                xml: Fixture::xml("2"),
            },
        )
        .link(&tool_link("xml-to-yaml"))
        .known_bug(KNOWN_API_BUG),
    );

    scenarios
}
