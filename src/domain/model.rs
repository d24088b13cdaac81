use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document formats the fixtures are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Json,
    Xml,
    Yaml,
    Txt,
}

impl Format {
    /// Directory under the fixture root holding this format.
    pub fn directory(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
            Format::Txt => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        // Directory and extension coincide for every format in the data layout.
        self.directory()
    }

    /// Name used in step titles, e.g. "Convert JSON to XML via API".
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Xml => "XML",
            Format::Yaml => "YAML",
            Format::Txt => "text",
        }
    }
}

/// A static input or expected-output file, addressed by format and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub format: Format,
    pub id: String,
}

impl Fixture {
    pub fn new(format: Format, id: impl Into<String>) -> Self {
        Self {
            format,
            id: id.into(),
        }
    }

    pub fn json(id: &str) -> Self {
        Self::new(Format::Json, id)
    }

    pub fn xml(id: &str) -> Self {
        Self::new(Format::Xml, id)
    }

    pub fn yaml(id: &str) -> Self {
        Self::new(Format::Yaml, id)
    }

    pub fn txt(id: &str) -> Self {
        Self::new(Format::Txt, id)
    }

    /// Logical path under the fixture root, e.g. `json/1.json`.
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}.{}",
            self.format.directory(),
            self.id,
            self.format.extension()
        )
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Conversion and validation capabilities offered by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    JsonToXml,
    JsonToYaml,
    YamlToJson,
    YamlToXml,
    XmlToYaml,
    ExtractTextFromJson,
    ValidateYaml,
    MinifyXml,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::JsonToXml,
        Operation::JsonToYaml,
        Operation::YamlToJson,
        Operation::YamlToXml,
        Operation::XmlToYaml,
        Operation::ExtractTextFromJson,
        Operation::ValidateYaml,
        Operation::MinifyXml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::JsonToXml => "json_to_xml",
            Operation::JsonToYaml => "json_to_yaml",
            Operation::YamlToJson => "yaml_to_json",
            Operation::YamlToXml => "yaml_to_xml",
            Operation::XmlToYaml => "xml_to_yaml",
            Operation::ExtractTextFromJson => "extract_text_from_json",
            Operation::ValidateYaml => "validate_yaml",
            Operation::MinifyXml => "minify_xml",
        }
    }

    /// Endpoint slug used when the configuration does not override it.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Operation::JsonToXml => "json-to-xml",
            Operation::JsonToYaml => "json-to-yaml",
            Operation::YamlToJson => "yaml-to-json",
            Operation::YamlToXml => "yaml-to-xml",
            Operation::XmlToYaml => "xml-to-yaml",
            Operation::ExtractTextFromJson => "json-to-text",
            Operation::ValidateYaml => "yaml-validator",
            Operation::MinifyXml => "xml-minify",
        }
    }

    /// Format the operation consumes.
    pub fn source_format(&self) -> Format {
        match self {
            Operation::JsonToXml | Operation::JsonToYaml | Operation::ExtractTextFromJson => {
                Format::Json
            }
            Operation::YamlToJson | Operation::YamlToXml | Operation::ValidateYaml => Format::Yaml,
            Operation::XmlToYaml | Operation::MinifyXml => Format::Xml,
        }
    }

    /// Format the operation produces.
    pub fn target_format(&self) -> Format {
        match self {
            Operation::JsonToXml | Operation::YamlToXml | Operation::MinifyXml => Format::Xml,
            Operation::JsonToYaml | Operation::XmlToYaml => Format::Yaml,
            Operation::YamlToJson => Format::Json,
            Operation::ExtractTextFromJson | Operation::ValidateYaml => Format::Txt,
        }
    }

    /// Step title for the API call, e.g. "Convert JSON to XML via API".
    pub fn step_title(&self) -> String {
        match self {
            Operation::ExtractTextFromJson => "Extract text from JSON via API".to_string(),
            Operation::ValidateYaml => "Validate YAML via API".to_string(),
            Operation::MinifyXml => "Minify XML via API".to_string(),
            _ => format!(
                "Convert {} to {} via API",
                self.source_format().label(),
                self.target_format().label()
            ),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Accepts both `json_to_xml` and the endpoint slug `json-to-xml`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == normalized || op.default_endpoint().replace('-', "_") == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
                format!("unknown operation '{}', expected one of: {}", s, known.join(", "))
            })
    }
}
