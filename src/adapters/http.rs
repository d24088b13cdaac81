//! HTTP client for the LambdaTest free-online-tools conversion API.
//!
//! Every operation is a single `POST {base_url}/{endpoint}` carrying the
//! source document as `{"<input_field>": "..."}`. A JSON object response is
//! unwrapped through `<output_field>`; anything else is returned verbatim.
//!
//! The envelope is recognised by shape alone. A raw JSON result whose own
//! top-level object has an `<output_field>` key is unwrapped too; when the
//! converted documents can carry such a key, configure an `output_field`
//! they cannot contain.

use crate::config::SuiteConfig;
use crate::domain::model::Operation;
use crate::domain::ports::ConversionApi;
use crate::utils::converters::json_to_map;
use crate::utils::error::{Result, SuiteError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct LambdatestService {
    http_client: Client,
    base_url: String,
    endpoints: HashMap<Operation, String>,
    input_field: String,
    output_field: String,
    header_names: Vec<String>,
}

impl fmt::Debug for LambdatestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdatestService")
            .field("base_url", &self.base_url)
            .field("input_field", &self.input_field)
            .field("output_field", &self.output_field)
            .field("headers", &format!("{:?} [REDACTED]", self.header_names))
            .finish()
    }
}

impl LambdatestService {
    /// Client for `base_url` with every other setting at its default.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut config = SuiteConfig::default();
        config.service.base_url = Some(base_url.into());
        Self::from_config(&config)
    }

    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        let configured_headers = config.headers();
        let mut headers = HeaderMap::new();
        for (name, value) in &configured_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SuiteError::InvalidConfigValueError {
                    field: "service.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let mut header_value =
                HeaderValue::from_str(value).map_err(|e| SuiteError::InvalidConfigValueError {
                    field: format!("service.headers.{}", name),
                    value: "[REDACTED]".to_string(),
                    reason: e.to_string(),
                })?;
            header_value.set_sensitive(true);
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(config.timeout()))
            .user_agent(config.user_agent())
            .default_headers(headers)
            .build()?;

        let endpoints = Operation::ALL
            .iter()
            .map(|op| (*op, config.endpoint_for(*op)))
            .collect();

        let mut header_names: Vec<String> = configured_headers.into_keys().collect();
        header_names.sort();

        Ok(Self {
            http_client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            endpoints,
            input_field: config.input_field().to_string(),
            output_field: config.output_field().to_string(),
            header_names,
        })
    }

    pub fn endpoint_url(&self, operation: Operation) -> String {
        let endpoint = self
            .endpoints
            .get(&operation)
            .map(String::as_str)
            .unwrap_or_else(|| operation.default_endpoint());
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn call(&self, operation: Operation, input: &str) -> Result<String> {
        let url = self.endpoint_url(operation);
        tracing::debug!("Calling {} at {} ({} bytes)", operation, url, input.len());

        let mut payload = Map::new();
        payload.insert(self.input_field.clone(), Value::String(input.to_string()));

        let response = self
            .http_client
            .post(&url)
            .json(&Value::Object(payload))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} response status: {}", operation, status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(SuiteError::ApiStatusError {
                operation: operation.name().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(self.extract_output(body))
    }

    fn extract_output(&self, body: String) -> String {
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(mut envelope)) => match envelope.remove(&self.output_field) {
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => body,
            },
            _ => body,
        }
    }
}

#[async_trait]
impl ConversionApi for LambdatestService {
    async fn json_to_xml(&self, json: &str) -> Result<String> {
        self.call(Operation::JsonToXml, json).await
    }

    async fn json_to_yaml(&self, json: &str) -> Result<String> {
        self.call(Operation::JsonToYaml, json).await
    }

    async fn yaml_to_json(&self, yaml: &str) -> Result<Map<String, Value>> {
        let operation = Operation::YamlToJson;
        let text = self.call(operation, yaml).await?;
        json_to_map(&text, operation.name()).map_err(|e| match e {
            SuiteError::MalformedJsonError { source, .. } => SuiteError::UnexpectedResponseError {
                operation: operation.name().to_string(),
                message: format!("response is not valid JSON: {}", source),
            },
            other => other,
        })
    }

    async fn yaml_to_xml(&self, yaml: &str) -> Result<String> {
        self.call(Operation::YamlToXml, yaml).await
    }

    async fn xml_to_yaml(&self, xml: &str) -> Result<String> {
        self.call(Operation::XmlToYaml, xml).await
    }

    async fn extract_text_from_json(&self, json: &str) -> Result<String> {
        self.call(Operation::ExtractTextFromJson, json).await
    }

    async fn validate_yaml(&self, document: &str) -> Result<String> {
        self.call(Operation::ValidateYaml, document).await
    }

    async fn minify_xml(&self, xml: &str) -> Result<String> {
        self.call(Operation::MinifyXml, xml).await
    }
}
