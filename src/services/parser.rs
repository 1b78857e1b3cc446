// src/services/parser.rs

//! Standings table parser.
//!
//! Extracts accepted-submission candidates from the judge's standings page.
//! The page mixes decorative markup with data and its layout is not
//! contractually stable, so the parser degrades to an empty candidate list
//! on anything it cannot recognize. It never errors on malformed input.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{StandingsSelectors, SubmissionCandidate};

/// Body cells skipped before problem columns begin.
///
/// On the supported judge every body row starts with rank, team, solved
/// count, and a spacer cell, in that order. The page format is not
/// self-describing, so the offset is fixed here rather than inferred.
pub const SKIPPED_LEADING_CELLS: usize = 4;

/// Parser for the judge's standings markup.
///
/// Selectors and text patterns are compiled once at construction; `parse`
/// itself is infallible.
pub struct StandingsParser {
    table_sel: Selector,
    row_sel: Selector,
    header_cell_sel: Selector,
    cell_sel: Selector,
    team_sel: Selector,
    label_sel: Selector,
    code_re: Regex,
    accepted_re: Regex,
}

impl StandingsParser {
    /// Build a parser from the configured markup hooks.
    pub fn new(selectors: &StandingsSelectors) -> Result<Self> {
        Ok(Self {
            table_sel: Self::parse_selector(&selectors.table_selector)?,
            row_sel: Self::parse_selector("tr")?,
            header_cell_sel: Self::parse_selector("th, td")?,
            cell_sel: Self::parse_selector("td")?,
            team_sel: Self::parse_selector(&selectors.team_selector)?,
            label_sel: Self::parse_selector(&selectors.label_selector)?,
            // Problem header cells lead with the letter, e.g. "A 100pts"
            code_re: Regex::new(r"^([A-Z])\s").expect("valid code pattern"),
            // Accepted cells read "<attempts> (<minutes>)", e.g. "1 (42)"
            accepted_re: Regex::new(r"^(\d+)\s*\((\d+)\)").expect("valid accepted pattern"),
        })
    }

    /// Parse raw markup into submission candidates.
    ///
    /// Returns an empty vector when no standings table or no problem header
    /// is recognizable. Candidates are emitted in row order, column order
    /// within a row.
    pub fn parse(&self, markup: &str) -> Vec<SubmissionCandidate> {
        let document = Html::parse_document(markup);

        let Some(table) = document.select(&self.table_sel).next() else {
            return Vec::new();
        };

        let mut rows = table.select(&self.row_sel);
        let Some(header) = rows.next() else {
            return Vec::new();
        };

        let codes = self.header_codes(&header);
        if codes.is_empty() {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for row in rows {
            self.parse_team_row(&row, &codes, &mut candidates);
        }
        candidates
    }

    /// Extract problem codes from the header row, preserving column order.
    ///
    /// Cells that do not lead with a problem letter (rank, team, score,
    /// spacer columns) are skipped; the survivors align positionally with
    /// body cells past [`SKIPPED_LEADING_CELLS`].
    fn header_codes(&self, header: &ElementRef) -> Vec<String> {
        header
            .select(&self.header_cell_sel)
            .filter_map(|cell| {
                let text: String = cell.text().collect();
                self.code_re
                    .captures(text.trim_start())
                    .map(|caps| caps[1].to_string())
            })
            .collect()
    }

    /// Parse one body row, appending a candidate per accepted cell.
    fn parse_team_row(
        &self,
        row: &ElementRef,
        codes: &[String],
        candidates: &mut Vec<SubmissionCandidate>,
    ) {
        let team_name = row
            .select(&self.team_sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        // Header and placeholder rows carry no team-name container.
        if team_name.is_empty() {
            return;
        }

        for (index, cell) in row.select(&self.cell_sel).skip(SKIPPED_LEADING_CELLS).enumerate() {
            // Trailing decorative cells have no matching header column.
            let Some(code) = codes.get(index) else {
                break;
            };

            if let Some(time) = self.accepted_time(&cell) {
                candidates.push(SubmissionCandidate::new(team_name.clone(), code, time));
            }
        }
    }

    /// Acceptance minutes from a problem cell, if its label marks a solve.
    fn accepted_time(&self, cell: &ElementRef) -> Option<String> {
        let label = cell.select(&self.label_sel).next()?;
        let text: String = label.text().collect();
        self.accepted_re
            .captures(text.trim())
            .map(|caps| caps[2].to_string())
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
