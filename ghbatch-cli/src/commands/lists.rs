//! `ghbatch lists`: show the parsed account and project lists.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ghbatch_core::{Flag, ProjectSpec};
use ghbatch_reconcile::{load_inputs, Inputs};

use crate::commands::load_config;

/// Arguments for `ghbatch lists`.
#[derive(Args, Debug)]
pub struct ListsArgs {
    /// Directory holding the list files.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListsArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.workspace, None)?;
        let inputs = load_inputs(&config).context("failed to load list files")?;
        let primary = config.primary_account(&inputs.accounts);

        if self.json {
            print_json(&inputs, primary.map(|a| a.0))?;
        } else {
            print_table(&inputs, primary.map(|a| a.0));
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "flags")]
    flags: String,
    #[tabled(rename = "marker")]
    marker: String,
    #[tabled(rename = "description")]
    description: String,
}

#[derive(Serialize)]
struct ListsJson {
    primary: Option<String>,
    accounts: Vec<String>,
    projects: Vec<ProjectJson>,
    rejected: Vec<RejectedJson>,
}

#[derive(Serialize)]
struct ProjectJson {
    name: String,
    flags: Vec<String>,
    marker: String,
    description: Option<String>,
}

#[derive(Serialize)]
struct RejectedJson {
    line: String,
    reason: String,
}

fn flags_of(project: &ProjectSpec) -> Vec<String> {
    project.flags.iter().map(Flag::to_string).collect()
}

fn marker_of(project: &ProjectSpec) -> String {
    project
        .description
        .as_ref()
        .map(|d| d.marker.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_json(inputs: &Inputs, primary: Option<String>) -> Result<()> {
    let payload = ListsJson {
        primary,
        accounts: inputs.accounts.iter().map(|a| a.0.clone()).collect(),
        projects: inputs
            .projects
            .projects
            .iter()
            .map(|p| ProjectJson {
                name: p.name.clone(),
                flags: flags_of(p),
                marker: marker_of(p),
                description: p.description.as_ref().map(|d| d.text.clone()),
            })
            .collect(),
        rejected: inputs
            .projects
            .rejected
            .iter()
            .map(|r| RejectedJson {
                line: r.line.clone(),
                reason: r.reason.to_string(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize lists JSON")?
    );
    Ok(())
}

fn print_table(inputs: &Inputs, primary: Option<String>) {
    let accounts: Vec<String> = inputs.accounts.iter().map(|a| a.0.clone()).collect();
    println!(
        "{} account(s): {}",
        accounts.len(),
        if accounts.is_empty() { "-".to_string() } else { accounts.join(", ") }
    );
    println!(
        "Primary: {}",
        primary.unwrap_or_else(|| "-".to_string()).bold()
    );

    if inputs.projects.projects.is_empty() {
        println!("No projects listed.");
    } else {
        let rows: Vec<ProjectRow> = inputs
            .projects
            .projects
            .iter()
            .map(|p| ProjectRow {
                name: p.name.clone(),
                flags: flags_of(p).join(" "),
                marker: marker_of(p),
                description: p
                    .description
                    .as_ref()
                    .map(|d| d.text.clone())
                    .unwrap_or_default(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    for rejected in &inputs.projects.rejected {
        println!(
            "{} {} ({})",
            "skipped:".yellow(),
            rejected.line,
            rejected.reason
        );
    }
}
