use crate::config::SuiteConfig;
use crate::domain::model::Operation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lambdatest-e2e")]
#[command(about = "End-to-end checks for the LambdaTest document conversion API")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override service.base_url")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Override fixtures.root")]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the scenario catalogue against the API
    Run {
        #[arg(long, help = "Only run the parameters of this case, e.g. yaml_to_xml")]
        case: Option<String>,

        #[arg(long, help = "Only run scenarios whose name contains this text")]
        filter: Option<String>,

        #[arg(long, help = "Only run scenarios carrying this tag")]
        tag: Option<String>,

        #[arg(long, help = "Write the JSON run report to this path")]
        report: Option<String>,

        #[arg(long, help = "Treat unexpected passes of known-bug scenarios as failures")]
        strict: bool,
    },

    /// List the scenarios in the catalogue
    List,

    /// Call a single operation and print the result
    Convert {
        #[arg(help = "Operation name, e.g. json_to_xml or json-to-xml")]
        operation: Operation,

        #[arg(help = "File holding the source document")]
        input: PathBuf,
    },
}

impl CliConfig {
    /// Applies command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut SuiteConfig) {
        if let Some(base_url) = &self.base_url {
            config.service.base_url = Some(base_url.clone());
        }
        if let Some(data_dir) = &self.data_dir {
            config.fixtures.root = Some(data_dir.clone());
        }
        if let Command::Run { report, strict, .. } = &self.command {
            if let Some(report) = report {
                config.report.output_path = Some(report.clone());
            }
            if *strict {
                config.report.strict = Some(true);
            }
        }
    }
}
