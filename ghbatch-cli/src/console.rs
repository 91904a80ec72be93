//! Terminal output: the live echo of run-log entries and the closing summary.

use std::collections::BTreeMap;

use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use ghbatch_reconcile::{LogEntry, Reporter, Tag};

/// Prints each run-log entry to stdout as it is recorded.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, entry: &LogEntry) {
        println!(
            "{} {} {}",
            entry.at.format("%H:%M:%S").to_string().bright_black(),
            paint(entry.tag),
            entry.message
        );
    }
}

fn paint(tag: Tag) -> ColoredString {
    let label = format!("{:<7}", tag.label());
    match tag {
        Tag::Error => label.red().bold(),
        Tag::Warn => label.yellow(),
        Tag::Success => label.green(),
        Tag::Update | Tag::Commit => label.cyan(),
        Tag::Sync => label.blue(),
        Tag::Exist | Tag::Skip => label.bright_black(),
        Tag::Info => label.normal(),
    }
}

#[derive(Tabled)]
struct TagCountRow {
    #[tabled(rename = "outcome")]
    tag: String,
    #[tabled(rename = "count")]
    count: usize,
}

/// Table of non-zero outcome counts per tag.
pub fn print_tag_counts(counts: &BTreeMap<Tag, usize>) {
    if counts.is_empty() {
        println!("Nothing was logged.");
        return;
    }
    let rows: Vec<TagCountRow> = Tag::ALL
        .iter()
        .filter_map(|tag| {
            counts.get(tag).map(|&count| TagCountRow {
                tag: tag.label().to_string(),
                count,
            })
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
