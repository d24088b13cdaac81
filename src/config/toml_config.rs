use crate::domain::model::Operation;
use crate::utils::error::{Result, SuiteError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.lambdatest.com/free-online-tools/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_INPUT_FIELD: &str = "input";
pub const DEFAULT_OUTPUT_FIELD: &str = "output";
pub const DEFAULT_FIXTURE_ROOT: &str = "data";

const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub input_field: Option<String>,
    pub output_field: Option<String>,
    pub user_agent: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    /// Endpoint overrides keyed by operation name (`json_to_xml = "json-to-xml"`).
    pub endpoints: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturesConfig {
    pub root: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: Option<String>,
    pub strict: Option<bool>,
}

impl SuiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SuiteError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SuiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LAMBDATEST_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SuiteError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set, leaving it unresolved", var_name);
                format!("${{{}}}", var_name)
            })
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_base_url("service.base_url", self.base_url())?;
        validation::validate_range(
            "service.timeout_seconds",
            self.timeout_seconds(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_non_empty_string("service.input_field", self.input_field())?;
        validation::validate_non_empty_string("service.output_field", self.output_field())?;
        validation::validate_path("fixtures.root", self.fixture_root())?;

        if let Some(path) = self.report_path() {
            validation::validate_path("report.output_path", path)?;
        }

        if let Some(endpoints) = &self.service.endpoints {
            let mut keys: Vec<&String> = endpoints.keys().collect();
            keys.sort();

            // `json_to_xml` and `json-to-xml` name the same operation
            let mut seen: HashMap<Operation, &str> = HashMap::new();
            for key in keys {
                let operation = key.parse::<Operation>().map_err(|reason| {
                    SuiteError::InvalidConfigValueError {
                        field: "service.endpoints".to_string(),
                        value: key.clone(),
                        reason,
                    }
                })?;
                if let Some(previous) = seen.insert(operation, key) {
                    return Err(SuiteError::InvalidConfigValueError {
                        field: "service.endpoints".to_string(),
                        value: key.clone(),
                        reason: format!(
                            "{} is already configured as '{}'",
                            operation.name(),
                            previous
                        ),
                    });
                }
                validation::validate_non_empty_string(
                    &format!("service.endpoints.{}", key),
                    &endpoints[key],
                )?;
            }
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    pub fn input_field(&self) -> &str {
        self.service.input_field.as_deref().unwrap_or(DEFAULT_INPUT_FIELD)
    }

    pub fn output_field(&self) -> &str {
        self.service.output_field.as_deref().unwrap_or(DEFAULT_OUTPUT_FIELD)
    }

    pub fn user_agent(&self) -> String {
        self.service
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("lambdatest-e2e/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.service.headers.clone().unwrap_or_default()
    }

    /// Endpoint for an operation: configured override, else the default slug.
    pub fn endpoint_for(&self, operation: Operation) -> String {
        self.service
            .endpoints
            .as_ref()
            .and_then(|endpoints| {
                endpoints
                    .iter()
                    .find(|(key, _)| key.parse::<Operation>().ok() == Some(operation))
                    .map(|(_, endpoint)| endpoint.clone())
            })
            .unwrap_or_else(|| operation.default_endpoint().to_string())
    }

    pub fn fixture_root(&self) -> &str {
        self.fixtures.root.as_deref().unwrap_or(DEFAULT_FIXTURE_ROOT)
    }

    pub fn report_path(&self) -> Option<&str> {
        self.report.output_path.as_deref()
    }

    pub fn strict(&self) -> bool {
        self.report.strict.unwrap_or(false)
    }
}

impl Validate for SuiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
