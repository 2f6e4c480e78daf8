use crate::collections::Direction;
use crate::i18n::Langpath;
use anyhow::{anyhow, Context, Result};

/// Separator between langpaths in `LANGPATHS` (`"fr;de:fr:en;en"`).
const LANGPATH_LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone)]
pub struct Config {
    // Input
    pub records_file: String,

    // Ordering
    pub langpaths: Vec<Langpath>,
    pub sort_field: String,
    pub direction: Direction,
    pub case_insensitive: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Input
            records_file: std::env::var("RECORDS_FILE").context("RECORDS_FILE not set")?,

            // Ordering
            langpaths: parse_langpaths(
                &std::env::var("LANGPATHS").unwrap_or_else(|_| "en".to_string()),
            )?,
            sort_field: std::env::var("SORT_FIELD").unwrap_or_else(|_| "label".to_string()),
            direction: match std::env::var("SORT_DIRECTION") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e: String| anyhow!(e))
                    .context("Invalid SORT_DIRECTION")?,
                Err(_) => Direction::Ascending,
            },
            case_insensitive: std::env::var("CASE_INSENSITIVE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }
}

/// Parse a `;`-separated list of colon-separated langpaths.
pub fn parse_langpaths(raw: &str) -> Result<Vec<Langpath>> {
    let langpaths = raw
        .split(LANGPATH_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            Langpath::parse(segment).with_context(|| format!("Invalid langpath '{}'", segment))
        })
        .collect::<Result<Vec<_>>>()?;

    if langpaths.is_empty() {
        anyhow::bail!("LANGPATHS contains no langpath");
    }
    Ok(langpaths)
}
