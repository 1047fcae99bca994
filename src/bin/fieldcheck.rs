use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use field_validator::config::Config;
use field_validator::schema::load_schema;
use field_validator::validation::record_from_value;
use field_validator::{RuleRegistry, Validator};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let registry = RuleRegistry::with_builtin_rules();
    let loaded = load_schema(&config.schema_path, &registry).await?;
    let options = config.validator_options(loaded.options);
    let validator = Validator::with_options(loaded.schema, Some(loaded.messages), options)
        .with_context(|| format!("Invalid schema: {}", config.schema_path.display()))?;

    if config.list_required {
        println!("{}", serde_json::to_string(&validator.required_fields())?);
        return Ok(ExitCode::SUCCESS);
    }

    let input = match &config.input_path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read records: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read records from stdin")?;
            buf
        }
    };

    let mut checked = 0usize;
    let mut invalid = 0usize;
    for (index, value) in serde_json::Deserializer::from_str(&input)
        .into_iter::<Value>()
        .enumerate()
    {
        let value = value.with_context(|| format!("Failed to parse record #{}", index + 1))?;
        let record = record_from_value(value)
            .ok_or_else(|| anyhow!("Record #{} is not a JSON object", index + 1))?;

        let errors = match &config.fields {
            Some(fields) => validator.validate_fields(fields, &record).await?,
            None => validator.validate_all(&record).await?,
        };

        checked += 1;
        if errors.is_some() {
            invalid += 1;
        }
        println!("{}", serde_json::to_string(&errors)?);
    }

    log::info!("{} of {} records invalid", invalid, checked);

    Ok(if invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
