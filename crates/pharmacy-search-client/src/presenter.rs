//! Plain-text presentation of search outcomes.

use std::io::{self, Write};

use pharmacy_search_core::models::{SearchHistoryEntry, SearchResultSet};
use pharmacy_search_core::search::{
    HighlightMarker, QuickSearch, Rejection, SearchError, SearchPresenter, SynthesisReport,
};

/// Shown in place of results when a search matches nothing.
pub const NO_RESULTS_LINES: [&str; 2] = [
    "No patients found",
    "Try adjusting your search criteria or use broader terms.",
];

/// Highlight marker for ANSI terminals (bold on, attributes off).
pub fn terminal_marker() -> HighlightMarker {
    HighlightMarker {
        open: "\x1b[1m".into(),
        close: "\x1b[0m".into(),
    }
}

/// Writes search outcomes as text lines.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, lines: &[String]) {
        let result = lines.iter().try_for_each(|line| writeln!(self.out, "{line}"));
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write search output");
        }
    }

    /// Print past searches, most recent first.
    pub fn show_history(&mut self, entries: &[SearchHistoryEntry]) {
        if entries.is_empty() {
            self.emit(&["No recent searches".to_string()]);
            return;
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| format!("{:>15}  {}  {}", e.id, e.recorded_at, e.label))
            .collect();
        self.emit(&lines);
    }

    /// Print the built-in quick searches.
    pub fn show_presets(&mut self, presets: &[QuickSearch]) {
        let lines: Vec<String> = presets
            .iter()
            .map(|q| format!("{:<18} {}={}", q.label, q.field, q.value))
            .collect();
        self.emit(&lines);
    }

    /// Report a file written by an export.
    pub fn show_export(&mut self, path: &std::path::Path, rows: usize) {
        self.emit(&[format!("Exported {rows} patients to {}", path.display())]);
    }
}

impl<W: Write> SearchPresenter for TerminalPresenter<W> {
    fn show_results(&mut self, _results: &SearchResultSet, report: &SynthesisReport) {
        if report.views.is_empty() {
            self.emit(&NO_RESULTS_LINES.map(String::from));
            return;
        }

        let stats = report.stats;
        let mut lines = vec![format!(
            "Found {} patients across {} stores in {} provinces",
            stats.result_count, stats.distinct_store_count, stats.distinct_province_count
        )];

        for view in &report.views {
            let name = match &view.preferred_name {
                Some(pref) => format!("{} {} ({})", view.first_name, view.last_name, pref),
                None => format!("{} {}", view.first_name, view.last_name),
            };
            lines.push(format!(
                "  [{}] {}  Store {}  {}, {}  {}  HN {}  {}",
                view.display_key,
                name,
                view.store_id,
                view.city,
                view.province,
                view.phone_number,
                view.health_number,
                view.language,
            ));
        }
        self.emit(&lines);
    }

    fn show_rejection(&mut self, rejection: &Rejection) {
        self.emit(&rejection.messages());
    }

    fn show_error(&mut self, error: &SearchError) {
        self.emit(&[format!("Search failed: {error}")]);
    }

    fn clear_results(&mut self) {}
}
