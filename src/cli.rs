//! Command-line interface and dispatch.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::export;
use crate::ga4::admin::AdminApiClient;
use crate::ga4::auth::{self, AccessToken};
use crate::ga4::data::DataApiClient;
use crate::render;
use crate::report::audit;

/// Audit a Google Analytics 4 property: 90-day KPIs, configuration checks,
/// and a CSV export.
#[derive(Debug, Parser)]
#[command(name = "ga-audit", version, about)]
pub struct Cli {
    /// OAuth2 access token for the Analytics APIs.
    #[arg(long, global = true, env = "GA_AUDIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the config file (default: ~/.config/ga-audit/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List GA4 accounts and property IDs visible to the token.
    Properties,

    /// Run the full audit against one property.
    Audit {
        /// Property to audit, as a bare ID or `properties/<id>`.
        #[arg(long)]
        property: String,

        /// Write the flat CSV export here.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit the report as JSON instead of the terminal summary.
        #[arg(long)]
        json: bool,
    },

    /// OAuth2 helper: print the authorization URL, or exchange a code for
    /// an access token.
    Login {
        /// Authorization code from the redirect URL. Without it, the
        /// authorization URL is printed instead.
        #[arg(long)]
        code: Option<String>,
    },
}

fn require_token(cli: &Cli) -> anyhow::Result<AccessToken> {
    match &cli.token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token.clone())),
        _ => bail!(
            "no access token: pass --token, set GA_AUDIT_TOKEN, or run `ga-audit login`"
        ),
    }
}

/// Dispatch one parsed invocation.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Properties => {
            let token = require_token(&cli)?;
            let admin = AdminApiClient::new(token)?;
            let accounts = admin.list_account_summaries()?;
            if accounts.is_empty() {
                println!("No GA4 accounts found for this user.");
                return Ok(());
            }
            for account in accounts {
                println!("{}", account.display_name);
                for property in account.property_summaries {
                    println!("  {}  {}", property.property, property.display_name);
                }
            }
            Ok(())
        }

        Commands::Audit {
            property,
            out,
            json,
        } => {
            let token = require_token(&cli)?;
            let reports = DataApiClient::new(token.clone(), property)?;
            let admin = AdminApiClient::new(token)?;
            let report = audit::run_audit(&reports, &admin, property)?;

            if *json {
                println!("{}", render::to_json(&report)?);
            } else {
                render::print_summary(&report);
            }

            if let Some(path) = out {
                let rows = export::export_rows(&report);
                export::write_csv(path, &rows)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("\nExport written to {}", path.display());
            }
            Ok(())
        }

        Commands::Login { code } => {
            let config = Config::load(cli.config.as_deref())?;
            match code {
                None => {
                    let url = auth::authorize_url(&config.oauth)?;
                    println!("Open this URL, authorize read-only Analytics access,");
                    println!("then re-run with --code <code from the redirect URL>:");
                    println!("\n{url}");
                }
                Some(code) => {
                    let token = auth::exchange_code(&config.oauth, code)?;
                    println!("{}", token.as_str());
                    eprintln!("(export GA_AUDIT_TOKEN=<token> to use it)");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn audit_requires_property() {
        let err = Cli::try_parse_from(["ga-audit", "audit"]).unwrap_err();
        assert!(err.to_string().contains("--property"));
    }

    #[test]
    fn token_flag_is_global() {
        let cli = Cli::try_parse_from([
            "ga-audit",
            "audit",
            "--property",
            "123",
            "--token",
            "tok",
        ])
        .expect("parse");
        assert_eq!(cli.token.as_deref(), Some("tok"));
    }
}
