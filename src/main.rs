use anyhow::Context;
use clap::Parser;
use lambdatest_e2e::config::cli::{CliConfig, Command};
use lambdatest_e2e::config::load_config;
use lambdatest_e2e::core::scenario::Expectation;
use lambdatest_e2e::utils::logger::{self, LogFormat};
use lambdatest_e2e::utils::validation::Validate;
use lambdatest_e2e::{
    catalogue, ConversionApi, FixtureLoader, LambdatestService, Operation, Outcome,
    ScenarioFilter, SuiteConfig, SuiteError, SuiteRunner,
};
use std::path::Path;
use std::process::ExitCode;

/// Exit code when a filter selects no scenario at all.
const NO_SCENARIOS_SELECTED: u8 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting lambdatest-e2e");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<SuiteError>() {
            Some(suite_error) => {
                tracing::error!(
                    "❌ {:#} (Category: {:?}, Severity: {:?})",
                    e,
                    suite_error.category(),
                    suite_error.severity()
                );
                eprintln!("❌ {:#}", e);
                eprintln!("💡 {}", suite_error.recovery_suggestion());
                ExitCode::from(suite_error.exit_code())
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    tracing::debug!(
        "Using API at {} with fixtures from {}",
        config.base_url(),
        config.fixture_root()
    );

    match &cli.command {
        Command::List => {
            list_scenarios();
            Ok(ExitCode::SUCCESS)
        }
        Command::Convert { operation, input } => {
            convert(&config, *operation, input).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run {
            case, filter, tag, ..
        } => {
            let filter = ScenarioFilter {
                case: case.clone(),
                name_contains: filter.clone(),
                tag: tag.clone(),
            };
            run_suite(&config, &filter).await
        }
    }
}

fn list_scenarios() {
    for scenario in catalogue() {
        let expectation = match &scenario.expectation {
            Expectation::Pass => String::new(),
            Expectation::KnownBug { reason } => format!("  (expected failure: {})", reason),
        };
        let tags = if scenario.meta.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", scenario.meta.tags.join(" #"))
        };
        println!(
            "{:<36} {:<10} {}{}{}",
            scenario.name,
            format!("{:?}", scenario.meta.severity).to_lowercase(),
            scenario.meta.title,
            tags,
            expectation
        );
    }
}

async fn convert(config: &SuiteConfig, operation: Operation, input: &Path) -> anyhow::Result<()> {
    let expected_extension = operation.source_format().extension();
    if input.extension().and_then(|ext| ext.to_str()) != Some(expected_extension) {
        tracing::warn!(
            "{} expects a .{} document, got {}",
            operation,
            expected_extension,
            input.display()
        );
    }

    let document = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("cannot read input document {}", input.display()))?;

    let service = LambdatestService::from_config(config)?;
    let output = service
        .convert_text(operation, &document)
        .await
        .with_context(|| format!("{} failed", operation))?;

    println!("{}", output);
    Ok(())
}

async fn run_suite(config: &SuiteConfig, filter: &ScenarioFilter) -> anyhow::Result<ExitCode> {
    let service = LambdatestService::from_config(config)?;
    let fixtures = FixtureLoader::new(config.fixture_root());
    tracing::debug!("Fixture root: {}", fixtures.root().display());
    if !fixtures.root().is_dir() {
        tracing::warn!(
            "Fixture root {} is not a directory, every scenario will fail to prepare",
            fixtures.root().display()
        );
    }
    let suite = SuiteRunner::new(service, fixtures).with_strict(config.strict());

    let report = suite.run_all(&catalogue(), filter).await;

    for scenario in &report.scenarios {
        let icon = match scenario.outcome {
            Outcome::Passed => "✅",
            Outcome::Failed { .. } => "❌",
            Outcome::ExpectedFailure { .. } => "⚠️ xfail",
            Outcome::UnexpectedPass { .. } => "⚠️ xpass",
        };
        println!("{} {}", icon, scenario.name);
        if let Outcome::Failed { reason } = &scenario.outcome {
            for line in reason.lines() {
                println!("     {}", line);
            }
        }
    }

    let summary = &report.summary;
    println!(
        "📈 {} scenarios: {} passed, {} failed, {} expected failures, {} unexpected passes",
        summary.total,
        summary.passed,
        summary.failed,
        summary.expected_failures,
        summary.unexpected_passes
    );

    if let Some(path) = config.report_path() {
        report.write_json(path).await?;
        println!("📁 Report saved to: {}", path);
    }

    if summary.total == 0 {
        tracing::warn!("No scenario matched the filter");
        return Ok(ExitCode::from(NO_SCENARIOS_SELECTED));
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
