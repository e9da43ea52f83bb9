// file: src/cli/args.rs
// version: 1.0.0
// guid: 2d8df0b3-75d3-41cf-8f24-283c19879610

//! Command line argument definitions

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(name = "dfs-delegate")]
#[command(about = "Grant or revoke Full Control delegation over DFS configuration objects")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(group(ArgGroup::new("identity").required(true).args(["group", "group_flag"])))]
pub struct Cli {
    /// SamAccountName of the group receiving or losing the delegation
    #[arg(value_name = "GROUP")]
    pub group: Option<String>,

    #[arg(short = 'g', long = "group", value_name = "GROUP", help = "Group identity (named form)")]
    pub group_flag: Option<String>,

    #[arg(short, long, help = "Remove the delegation ACEs instead of adding them")]
    pub remove_rule: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(short, long, env = "DFS_DELEGATION_CONFIG", help = "Path to a YAML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, help = "LDAP URL of the domain controller to query")]
    pub server: Option<String>,

    #[arg(long, help = "Use this naming context instead of querying the RootDSE")]
    pub naming_context: Option<String>,

    #[arg(long, help = "Show what would be done without changing any ACL")]
    pub dry_run: bool,

    #[arg(long, help = "Print the outcome as JSON")]
    pub json: bool,
}

impl Cli {
    /// Group identity from either the positional or the named form
    pub fn group_identity(&self) -> &str {
        self.group
            .as_deref()
            .or(self.group_flag.as_deref())
            .unwrap_or_default()
    }
}
