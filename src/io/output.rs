use crate::core::{DebtMarker, VersionRecord};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_records(&mut self, records: &[VersionRecord]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_records(&mut self, records: &[VersionRecord]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_records(&mut self, records: &[VersionRecord]) -> anyhow::Result<()> {
        self.write_header()?;
        self.write_metrics_table(records)?;
        self.write_debt_table(records)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "# Lineage Maintainability Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_metrics_table(&mut self, records: &[VersionRecord]) -> anyhow::Result<()> {
        writeln!(self.writer, "## Metrics by Version")?;
        writeln!(self.writer)?;
        if records.is_empty() {
            writeln!(self.writer, "No versions were analyzed.")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "| Library | Version | MI | Avg CC | Max CC | SLOC | Comment % | Files | Skipped |"
        )?;
        writeln!(
            self.writer,
            "|---------|---------|----|--------|--------|------|-----------|-------|---------|"
        )?;
        for r in records {
            writeln!(
                self.writer,
                "| {} | {} | {:.2} | {:.2} | {} | {} | {:.2} | {} | {} |",
                r.library,
                r.version,
                r.avg_maintainability,
                r.avg_complexity,
                r.max_complexity,
                r.total_sloc,
                r.comment_ratio,
                r.files_analyzed,
                r.files_skipped
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_debt_table(&mut self, records: &[VersionRecord]) -> anyhow::Result<()> {
        if records.iter().all(|r| r.total_markers == 0) {
            return Ok(());
        }

        writeln!(self.writer, "## Technical Debt Markers")?;
        writeln!(self.writer)?;
        let labels: Vec<&str> = DebtMarker::ALL.iter().map(|m| m.label()).collect();
        writeln!(self.writer, "| Library | Version | {} | Total |", labels.join(" | "))?;
        writeln!(
            self.writer,
            "|---------|---------|{}-------|",
            "-----|".repeat(labels.len())
        )?;
        for r in records.iter().filter(|r| r.total_markers > 0) {
            let counts: Vec<String> = r
                .tech_debt_markers
                .iter()
                .map(|(_, count)| count.to_string())
                .collect();
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                r.library,
                r.version,
                counts.join(" | "),
                r.total_markers
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl Default for TerminalWriter<std::io::Stdout> {
    fn default() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_records(&mut self, records: &[VersionRecord]) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Lineage Maintainability Report".bold().blue())?;
        writeln!(self.writer, "{}", "==============================".blue())?;
        writeln!(self.writer)?;

        if records.is_empty() {
            writeln!(self.writer, "{}", "No versions were analyzed.".yellow())?;
            return Ok(());
        }

        writeln!(self.writer, "{}", summary_table(records))?;
        writeln!(self.writer)?;

        let analyzed: usize = records.iter().map(|r| r.files_analyzed).sum();
        let skipped: usize = records.iter().map(|r| r.files_skipped).sum();
        writeln!(
            self.writer,
            "{} versions, {} files analyzed, {} skipped",
            records.len().to_string().bold(),
            analyzed.to_string().green(),
            if skipped > 0 {
                skipped.to_string().yellow()
            } else {
                skipped.to_string().normal()
            }
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

/// One row per record with the headline metrics
pub fn summary_table(records: &[VersionRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Library", "Version", "MI", "Avg CC", "Max CC", "SLOC", "Comment %", "Markers",
            "Files", "Skipped",
        ]);

    for r in records {
        table.add_row(vec![
            r.library.clone(),
            r.version.clone(),
            format!("{:.2}", r.avg_maintainability),
            format!("{:.2}", r.avg_complexity),
            r.max_complexity.to_string(),
            r.total_sloc.to_string(),
            format!("{:.2}", r.comment_ratio),
            r.total_markers.to_string(),
            r.files_analyzed.to_string(),
            r.files_skipped.to_string(),
        ]);
    }
    table
}

pub fn create_writer(format: OutputFormat, destination: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination)),
    }
}
