//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::ClientConfig;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the client config: file first, then flag overrides
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(app_id) = &self.cli.app_id {
            config.app_id.clone_from(app_id);
        }
        if let Some(concurrency) = self.cli.concurrency {
            config.max_concurrency = concurrency;
        }
        config.validate().context("invalid client config")?;
        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self) -> anyhow::Result<()> {
        let client = Client::new(self.client_config()?)?;
        let pages = self.cli.pages;
        info!(base_url = %client.config().base_url, "Running {:?}", self.cli.command);

        match &self.cli.command {
            Commands::Loans { ids } => self.print(&client.loans_by_id(ids).await?),
            Commands::NewestLoans => self.print(&client.newest_loans(pages).await?),
            Commands::Similar { loan_id } => self.print(&client.similar_loans(*loan_id).await?),
            Commands::Lenders { loan_id } => {
                self.print(&client.loan_lenders(*loan_id, pages).await?)
            }
            Commands::Teams { loan_id } => self.print(&client.loan_teams(*loan_id, pages).await?),
            Commands::NewestLenders => self.print(&client.newest_lenders(pages).await?),
            Commands::LenderTeams { lender_id } => {
                self.print(&client.lender_teams(lender_id, pages).await?)
            }
            Commands::TeamLenders { team_id } => {
                self.print(&client.team_lenders(*team_id, pages).await?)
            }
            Commands::TeamLoans { team_id } => {
                self.print(&client.team_loans(*team_id, pages).await?)
            }
        }
    }

    fn print<T: Serialize>(&self, items: &[T]) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        render(&mut out, items, self.cli.format)?;
        out.flush()?;
        Ok(())
    }
}

/// Write items in the requested format
pub fn render<W: Write, T: Serialize>(
    out: &mut W,
    items: &[T],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            for item in items {
                serde_json::to_writer(&mut *out, item)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Pretty => {
            for (i, item) in items.iter().enumerate() {
                writeln!(out, "#{}", i + 1)?;
                serde_json::to_writer_pretty(&mut *out, item)?;
                writeln!(out)?;
            }
            writeln!(out, "{} item(s)", items.len())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_json_lines() {
        let items = vec![json!({"id": 1}), json!({"id": 2})];
        let mut out = Vec::new();
        render(&mut out, &items, OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"id\":1}\n{\"id\":2}\n");
    }

    #[test]
    fn test_render_pretty() {
        let items = vec![json!({"id": 1})];
        let mut out = Vec::new();
        render(&mut out, &items, OutputFormat::Pretty).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("#1\n{\n  \"id\": 1\n}\n"));
        assert!(text.ends_with("1 item(s)\n"));
    }

    #[test]
    fn test_client_config_flag_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://from-file.example\napp_id: file.app").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from([
            "microlend",
            "--config",
            path.as_str(),
            "--app-id",
            "flag.app",
            "--concurrency",
            "3",
            "newest-loans",
        ]);
        let config = Runner::new(cli).client_config().unwrap();

        assert_eq!(config.base_url, "http://from-file.example");
        assert_eq!(config.app_id, "flag.app");
        assert_eq!(config.max_concurrency, 3);
    }

    #[test]
    fn test_client_config_rejects_zero_concurrency() {
        let cli = Cli::parse_from(["microlend", "--concurrency", "0", "newest-loans"]);
        assert!(Runner::new(cli).client_config().is_err());
    }
}
