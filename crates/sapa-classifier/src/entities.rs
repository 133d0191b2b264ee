// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based entity extraction, run on every message alongside the
//! statistical model. Entities are best-effort hints for responders (a
//! schedule request naming a day, a grade request naming a period).

use std::sync::LazyLock;

use regex::Regex;
use sapa_core::types::Entity;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap_or_else(|e| panic!("date regex: {e}"))
});

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\b").unwrap_or_else(|e| panic!("number regex: {e}"))
});

const DAY_NAMES: &[&str] = &[
    "senin",
    "selasa",
    "rabu",
    "kamis",
    "jumat",
    "sabtu",
    "minggu",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const PERIOD_NAMES: &[&str] = &["uts", "uas", "semester"];

/// Extract day, date, number, and exam-period entities from `text`.
///
/// Tokens matched as part of a date are not re-reported as numbers.
pub fn extract_entities(text: &str) -> Vec<Entity> {
    let lowered = text.to_lowercase();
    let mut entities = Vec::new();

    for token in lowered.split(|c: char| !c.is_alphanumeric()) {
        if DAY_NAMES.contains(&token) {
            entities.push(Entity {
                kind: "day".to_string(),
                value: token.to_string(),
            });
        } else if PERIOD_NAMES.contains(&token) {
            entities.push(Entity {
                kind: "period".to_string(),
                value: token.to_string(),
            });
        }
    }

    let mut date_spans: Vec<(usize, usize)> = Vec::new();
    for m in DATE_RE.find_iter(&lowered) {
        date_spans.push((m.start(), m.end()));
        entities.push(Entity {
            kind: "date".to_string(),
            value: m.as_str().to_string(),
        });
    }

    for m in NUMBER_RE.find_iter(&lowered) {
        let inside_date = date_spans
            .iter()
            .any(|(start, end)| m.start() >= *start && m.end() <= *end);
        if !inside_date {
            entities.push(Entity {
                kind: "number".to_string(),
                value: m.as_str().to_string(),
            });
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_values(text: &str) -> Vec<(String, String)> {
        extract_entities(text)
            .into_iter()
            .map(|e| (e.kind, e.value))
            .collect()
    }

    #[test]
    fn extracts_day_names_case_insensitively() {
        let found = kinds_and_values("Jadwal hari Senin dong");
        assert!(found.contains(&("day".to_string(), "senin".to_string())));
    }

    #[test]
    fn extracts_iso_dates_without_duplicating_numbers() {
        let found = kinds_and_values("pengumuman tanggal 2026-06-01");
        assert!(found.contains(&("date".to_string(), "2026-06-01".to_string())));
        assert!(
            !found.iter().any(|(kind, _)| kind == "number"),
            "date components must not leak as numbers: {found:?}"
        );
    }

    #[test]
    fn extracts_standalone_numbers_and_periods() {
        let found = kinds_and_values("nilai uts kelas 7");
        assert!(found.contains(&("period".to_string(), "uts".to_string())));
        assert!(found.contains(&("number".to_string(), "7".to_string())));
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert!(extract_entities("halo apa kabar").is_empty());
    }
}
