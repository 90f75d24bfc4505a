pub mod report;

use colored::Colorize;
use serde::Serialize;

use crate::query::QuerySpec;
use crate::record::{Record, RecordKind};
use crate::view::{RecordStats, ResultView};

const MAX_CELL_WIDTH: usize = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Everything a renderer needs for one screen.
#[derive(Debug, Serialize)]
pub struct Report<'a, R: Record> {
    pub kind: RecordKind,
    pub query: &'a QuerySpec<R>,
    pub view: &'a ResultView<R>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<&'a RecordStats>,
}

impl<'a, R: Record> Report<'a, R> {
    pub fn new(
        query: &'a QuerySpec<R>,
        view: &'a ResultView<R>,
        stats: Option<&'a RecordStats>,
    ) -> Self {
        Self {
            kind: R::KIND,
            query,
            view,
            stats,
        }
    }

    pub(crate) fn summary_line(&self) -> String {
        let view = self.view;
        match view.range() {
            Some((first, last)) => format!(
                "page {}/{} :: showing {}-{} of {} {} records",
                view.page,
                view.total_pages,
                first,
                last,
                view.total_matched,
                self.kind
            ),
            None if self.query.search_term().trim().is_empty() => {
                format!("no {} records", self.kind)
            }
            None => format!(
                "no {} records match '{}'",
                self.kind,
                self.query.search_term().trim()
            ),
        }
    }
}

pub fn render<R: Record + Serialize>(format: OutputFormat, report: &Report<'_, R>) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
        OutputFormat::Xml => render_xml(report),
        OutputFormat::Html => report::render_html(report),
    }
}

fn truncate_cell(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        return value.to_string();
    }
    let mut out: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut out = value.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

pub fn render_text<R: Record>(report: &Report<'_, R>) -> Vec<u8> {
    let columns = R::columns();
    let rows: Vec<Vec<String>> = report
        .view
        .items
        .iter()
        .map(|r| r.cells().into_iter().map(truncate_cell).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows.iter() {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    if !rows.is_empty() {
        let header: Vec<String> = columns
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| pad(c, *w))
            .collect();
        out.push_str(&header.join("  ").trim_end().bold().to_string());
        out.push('\n');
        for row in rows.iter() {
            let line: Vec<String> = row
                .iter()
                .zip(widths.iter())
                .map(|(c, w)| pad(c, *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&format!(":: {}", report.summary_line()).dimmed().to_string());
    out.push('\n');
    let mut nav: Vec<String> = Vec::new();
    if report.view.has_previous() {
        nav.push(format!("prev: --page {}", report.view.page - 1));
    }
    if report.view.has_next() {
        nav.push(format!("next: --page {}", report.view.page + 1));
    }
    if !nav.is_empty() {
        out.push_str(&format!(":: {}", nav.join(", ")).dimmed().to_string());
        out.push('\n');
    }

    if let Some(stats) = report.stats {
        out.push('\n');
        out.push_str(&render_stats_text(stats));
    }
    out.into_bytes()
}

fn render_stats_text(stats: &RecordStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Statistics".bold()));
    out.push_str(&format!("  matched: {}\n", stats.total));
    if let (Some(first), Some(last)) = (stats.earliest.as_deref(), stats.latest.as_deref()) {
        out.push_str(&format!("  span:    {first} to {last}\n"));
    }
    if stats.undated > 0 {
        out.push_str(&format!("  undated: {}\n", stats.undated));
    }
    if !stats.by_facet.is_empty() {
        out.push_str("  by court/type:\n");
        for (label, count) in stats.by_facet.iter() {
            out.push_str(&format!("    {:<32} {}\n", label, count));
        }
    }
    if !stats.by_outcome.is_empty() {
        out.push_str("  by outcome:\n");
        for (label, count) in stats.by_outcome.iter() {
            out.push_str(&format!("    {:<32} {}\n", label, count));
        }
    }
    out
}

pub fn render_json<R: Record + Serialize>(report: &Report<'_, R>) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub(crate) fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml<R: Record>(report: &Report<'_, R>) -> Vec<u8> {
    let view = report.view;
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        "<results kind=\"{}\" page=\"{}\" page_size=\"{}\" total_matched=\"{}\" total_pages=\"{}\">\n",
        report.kind, view.page, view.page_size, view.total_matched, view.total_pages
    ));
    out.push_str(&format!(
        "  <query search_term=\"{}\" sort_key=\"{}\" sort_order=\"{}\"/>\n",
        escape_xml(report.query.search_term()),
        report.query.sort_key(),
        report.query.sort_order()
    ));
    for record in view.items.iter() {
        out.push_str(&format!("  <record id=\"{}\">\n", escape_xml(record.id())));
        for (name, value) in R::columns().iter().zip(record.cells()) {
            out.push_str(&format!(
                "    <field name=\"{}\">{}</field>\n",
                escape_xml(name),
                escape_xml(value)
            ));
        }
        out.push_str("  </record>\n");
    }
    if let Some(stats) = report.stats {
        out.push_str(&format!("  <stats total=\"{}\" undated=\"{}\">\n", stats.total, stats.undated));
        for (label, count) in stats.by_facet.iter() {
            out.push_str(&format!(
                "    <facet name=\"{}\">{}</facet>\n",
                escape_xml(label),
                count
            ));
        }
        for (label, count) in stats.by_outcome.iter() {
            out.push_str(&format!(
                "    <outcome name=\"{}\">{}</outcome>\n",
                escape_xml(label),
                count
            ));
        }
        out.push_str("  </stats>\n");
    }
    out.push_str("</results>\n");
    out.into_bytes()
}
