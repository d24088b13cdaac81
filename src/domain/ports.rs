use crate::domain::model::{Fixture, Operation};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Read-only access to named fixtures.
pub trait FixtureSource: Send + Sync {
    fn read_data_file(
        &self,
        relative_path: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn load(&self, fixture: &Fixture) -> impl std::future::Future<Output = Result<String>> + Send {
        let path = fixture.relative_path();
        async move { self.read_data_file(&path).await }
    }
}

/// The remote document conversion API. One request per call, no retries.
#[async_trait]
pub trait ConversionApi: Send + Sync {
    async fn json_to_xml(&self, json: &str) -> Result<String>;
    async fn json_to_yaml(&self, json: &str) -> Result<String>;
    async fn yaml_to_json(&self, yaml: &str) -> Result<Map<String, Value>>;
    async fn yaml_to_xml(&self, yaml: &str) -> Result<String>;
    async fn xml_to_yaml(&self, xml: &str) -> Result<String>;
    async fn extract_text_from_json(&self, json: &str) -> Result<String>;
    async fn validate_yaml(&self, document: &str) -> Result<String>;
    async fn minify_xml(&self, xml: &str) -> Result<String>;

    /// Dispatch a text-producing operation by value.
    async fn convert_text(&self, operation: Operation, input: &str) -> Result<String> {
        match operation {
            Operation::JsonToXml => self.json_to_xml(input).await,
            Operation::JsonToYaml => self.json_to_yaml(input).await,
            Operation::YamlToJson => {
                let mapping = self.yaml_to_json(input).await?;
                Ok(serde_json::to_string_pretty(&mapping)?)
            }
            Operation::YamlToXml => self.yaml_to_xml(input).await,
            Operation::XmlToYaml => self.xml_to_yaml(input).await,
            Operation::ExtractTextFromJson => self.extract_text_from_json(input).await,
            Operation::ValidateYaml => self.validate_yaml(input).await,
            Operation::MinifyXml => self.minify_xml(input).await,
        }
    }
}
