// file: src/cli/commands.rs
// version: 1.1.0
// guid: 35ad5c4c-f431-47c5-a67e-27eaca21d461

//! Command implementations for the CLI

use super::args::Cli;
use crate::{
    config::{loader::ConfigLoader, DelegationConfig},
    delegation::{DelegationCommand, DelegationOutcome, DelegationRequest},
    directory::{
        AceApplier, AceStatus, DryRunAceApplier, DsaclsAceApplier, LdapNamingContextResolver,
        NamingContextResolver, StaticNamingContext,
    },
    logging::with_async_operation_span,
    Result,
};
use colored::Colorize;
use tracing::{debug, info};

/// Resolver and applier used by one delegation run
pub type Collaborators = (Box<dyn NamingContextResolver>, Box<dyn AceApplier>);

/// Grant or revoke the DFS delegation described by the parsed arguments
pub async fn delegate_command(cli: &Cli) -> Result<DelegationOutcome> {
    delegate_with(cli, |config| {
        let applier = build_applier(config, cli.dry_run)?;
        Ok((build_resolver(config), applier))
    })
    .await
}

/// Like [`delegate_command`], with the collaborators built by `build` from the loaded config.
///
/// `build` is only called once the request has been validated.
pub async fn delegate_with<F>(cli: &Cli, build: F) -> Result<DelegationOutcome>
where
    F: FnOnce(&DelegationConfig) -> Result<Collaborators>,
{
    // Reject bad input before touching the directory
    let request = DelegationRequest::new(cli.group_identity(), cli.remove_rule)?;
    debug!(
        group = request.group_identity(),
        remove_rule = request.remove(),
        config = ?cli.config,
        server = ?cli.server,
        naming_context = ?cli.naming_context,
        dry_run = cli.dry_run,
        "Resolved parameters"
    );

    let config = load_config(cli)?;
    let (resolver, applier) = build(&config)?;
    let command = DelegationCommand::new(resolver, applier);

    let outcome =
        with_async_operation_span("dfs-delegation", || command.execute(&request)).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !cli.quiet {
        print_summary(&outcome);
    }

    Ok(outcome)
}

/// Load the configuration and apply command line overrides
fn load_config(cli: &Cli) -> Result<DelegationConfig> {
    let loader = ConfigLoader::new();
    let mut config = loader.load(cli.config.as_deref())?;

    if let Some(server) = &cli.server {
        config.ldap.url = server.clone();
    }
    if let Some(nc) = &cli.naming_context {
        config.naming_context = Some(nc.clone());
    }
    config.validate()?;

    Ok(config)
}

fn build_resolver(config: &DelegationConfig) -> Box<dyn NamingContextResolver> {
    match &config.naming_context {
        Some(nc) => Box::new(StaticNamingContext::new(nc.clone())),
        None => {
            info!("Resolving default naming context from {}", config.ldap.url);
            Box::new(LdapNamingContextResolver::new(config.ldap.clone()))
        }
    }
}

fn build_applier(config: &DelegationConfig, dry_run: bool) -> Result<Box<dyn AceApplier>> {
    if dry_run {
        info!("DRY RUN: no ACL will be modified");
        return Ok(Box::new(DryRunAceApplier));
    }

    Ok(Box::new(DsaclsAceApplier::locate(
        config.dsacls_path.as_deref(),
        config.domain.clone(),
    )?))
}

fn print_summary(outcome: &DelegationOutcome) {
    for entry in &outcome.entries {
        let status = match entry.status {
            AceStatus::Changed => entry.status.to_string().green(),
            AceStatus::AlreadyInPlace | AceStatus::Planned => entry.status.to_string().cyan(),
            AceStatus::Failed => entry.status.to_string().red(),
        };
        println!("  {:<18} {}", status, entry.target_path);
    }

    let action = if outcome.remove { "removed" } else { "granted" };
    let summary = format!(
        "Full Control {} for {}: {}/{} ACE operations succeeded",
        action,
        outcome.group_identity,
        outcome.applied_count,
        outcome.entries.len()
    );
    if outcome.success {
        println!("{} {}", "✓".green(), summary);
    } else {
        println!("{} {}", "⚠".yellow(), summary);
    }
}
