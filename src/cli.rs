//! Command-line interface of the gateway binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::policy::PolicyTable;

#[derive(Parser, Debug)]
#[command(name = "api-gateway")]
#[command(about = "HTTP/JSON gateway for the admin, student and task services", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Validate an authorization policy file and print the resulting table
    CheckPolicies {
        /// Policy file; defaults to POLICY_FILE, then the built-in table
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// One line per protected operation: `resource.action  role, role  denial`.
pub fn render_policies(table: &PolicyTable) -> String {
    table
        .iter()
        .map(|policy| {
            let roles: Vec<&str> = policy.allowed_roles.iter().map(|r| r.as_str()).collect();
            format!(
                "{:<28} {:<44} {}",
                policy.operation.to_string(),
                roles.join(", "),
                policy.denial
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
