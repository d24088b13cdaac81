#![allow(dead_code)]

use httpmock::prelude::*;
use lambdatest_e2e::core::catalogue::{FIXTURE_IDS, VALID_YAML_MESSAGE, XML_AS_YAML_ERROR};
use lambdatest_e2e::{Fixture, Operation};
use serde_json::json;
use std::path::Path;

/// How the stand-in answers `xml_to_yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlToYaml {
    /// Wraps the document in an extra `root:` level, like the live API does today.
    Buggy,
    /// Returns the YAML fixture.
    Fixed,
}

pub fn read_fixture(fixture: &Fixture) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(fixture.relative_path());
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

/// Drops indentation and line breaks between tags.
pub fn minify(xml: &str) -> String {
    xml.lines().map(str::trim).collect()
}

pub fn wrapped_in_root(yaml: &str) -> String {
    let indented: Vec<String> = yaml.lines().map(|line| format!("  {}", line)).collect();
    format!("root:\n{}\n", indented.join("\n"))
}

/// Registers one canned answer: `POST /<endpoint>` with `{"input": input}` returns `{"output": output}`.
pub async fn answer(server: &MockServer, operation: Operation, input: &str, output: &str) {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/{}", operation.default_endpoint()))
                .json_body(json!({ "input": input }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "output": output }));
        })
        .await;
}

/// Mounts the behavior the suite expects from the real API for every bundled fixture.
pub async fn mount_api(server: &MockServer, xml_to_yaml: XmlToYaml) {
    for id in FIXTURE_IDS {
        let json_doc = read_fixture(&Fixture::json(id));
        let xml_doc = read_fixture(&Fixture::xml(id));
        let yaml_doc = read_fixture(&Fixture::yaml(id));
        let txt_doc = read_fixture(&Fixture::txt(id));
        let mini_xml = minify(&xml_doc);

        answer(server, Operation::JsonToXml, &json_doc, &xml_doc).await;
        answer(server, Operation::MinifyXml, &xml_doc, &mini_xml).await;
        answer(server, Operation::ExtractTextFromJson, &json_doc, &txt_doc).await;
        answer(server, Operation::ValidateYaml, &yaml_doc, VALID_YAML_MESSAGE).await;
        answer(server, Operation::ValidateYaml, &xml_doc, XML_AS_YAML_ERROR).await;
        answer(server, Operation::JsonToYaml, &json_doc, &yaml_doc).await;
        answer(server, Operation::YamlToJson, &yaml_doc, &json_doc).await;
        answer(server, Operation::YamlToXml, &yaml_doc, &xml_doc).await;

        let yaml_from_xml = match xml_to_yaml {
            XmlToYaml::Buggy => wrapped_in_root(&yaml_doc),
            XmlToYaml::Fixed => yaml_doc.clone(),
        };
        answer(server, Operation::XmlToYaml, &xml_doc, &yaml_from_xml).await;
        answer(server, Operation::XmlToYaml, &mini_xml, &yaml_from_xml).await;
    }
}
