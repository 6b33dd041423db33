//! Distribution plan parser.
//!
//! The plan is produced by an external generator before day 1. Blocks look like:
//!
//! ```text
//! Day 5 (3 files):
//!   index.html
//!   scripts/app.js
//!   - styles/main.css
//! ```
//!
//! Headers are matched case-insensitively and may carry markdown heading
//! marks (`## Day 5 - 3 files`). A declared count may also appear on its own
//! line (`Files: 3`). Everything before the first header is ignored.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::PlanError;
use crate::types::{DayEntry, DayNumber, DistributionPlan};

/// Entries the generator writes for days with nothing to publish.
const PLACEHOLDERS: &[&str] = &[
    "none",
    "(none)",
    "n/a",
    "-",
    "...",
    "(empty)",
    "(no files)",
    "no files",
];

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:#+\s*)?(?:\*\*)?day\s+(\d+)(?:$|[\s:(\-*])(.*)$")
            .expect("valid header regex")
    })
}

fn header_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*files?\b").expect("valid count regex"))
}

fn count_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:files|file\s+count|count)\s*[:=]\s*(\d+)\s*$")
            .expect("valid count line regex")
    })
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+").expect("valid marker regex"))
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

struct Block {
    day: DayNumber,
    declared: Option<usize>,
    files: Vec<String>,
}

/// Parse a plan document. Pure: the same text always yields the same plan.
pub fn parse(text: &str) -> DistributionPlan {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if let Some(caps) = header_re().captures(line) {
            let Ok(n) = caps[1].parse::<u32>() else {
                continue;
            };
            let day = DayNumber(n);
            let declared = caps
                .get(2)
                .and_then(|rest| header_count_re().captures(rest.as_str()))
                .and_then(|c| c[1].parse::<usize>().ok());

            // A repeated header continues the existing block.
            let idx = match blocks.iter().position(|b| b.day == day) {
                Some(idx) => idx,
                None => {
                    blocks.push(Block {
                        day,
                        declared: None,
                        files: Vec::new(),
                    });
                    blocks.len() - 1
                }
            };
            if let Some(count) = declared {
                let block = &mut blocks[idx];
                block.declared = Some(block.declared.unwrap_or(0).saturating_add(count));
            }
            current = Some(idx);
            continue;
        }

        let Some(idx) = current else {
            continue;
        };

        if let Some(caps) = count_line_re().captures(line) {
            if let Ok(count) = caps[1].parse::<usize>() {
                let block = &mut blocks[idx];
                block.declared = Some(block.declared.unwrap_or(0).saturating_add(count));
            }
            continue;
        }

        if let Some(path) = normalize_entry(line) {
            blocks[idx].files.push(path);
        }
    }

    DistributionPlan {
        days: blocks
            .into_iter()
            .map(|b| DayEntry {
                day: b.day,
                declared_count: b.declared.unwrap_or(b.files.len()),
                files: b.files,
            })
            .collect(),
    }
}

/// Turn a raw plan line into a repository-relative path, or `None` when the
/// line carries no file.
fn normalize_entry(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_separator(trimmed) {
        return None;
    }
    if trimmed.starts_with('#') {
        return None;
    }
    if is_placeholder(trimmed) {
        return None;
    }

    let entry = list_marker_re().replace(trimmed, "");
    let entry = entry.trim();
    if entry.is_empty() || is_placeholder(entry) {
        return None;
    }

    let mut path = entry.replace('\\', "/");
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.to_string();
    }
    if path.is_empty() {
        return None;
    }
    Some(path)
}

fn is_placeholder(entry: &str) -> bool {
    let lower = entry.to_ascii_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '=' | '*' | '_'))
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read and parse the plan at `path`.
///
/// Returns [`PlanError::NotFound`] if the generator has not produced it yet.
pub fn load_at(path: &Path) -> Result<DistributionPlan, PlanError> {
    if !path.exists() {
        return Err(PlanError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
