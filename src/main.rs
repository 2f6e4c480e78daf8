//! Preview binary: load node records and print their order under each
//! configured langpath.
//!
//! Required environment variables:
//! - RECORDS_FILE
//!
//! Optional:
//! - LANGPATHS (defaults to "en"; e.g. "fr;de:fr:en;en")
//! - SORT_FIELD (defaults to "label")
//! - SORT_DIRECTION (asc/desc, defaults to asc)
//! - CASE_INSENSITIVE (defaults to false)

use anyhow::Result;
use langpath_sort::collections::OrderedKeyedSet;
use langpath_sort::config::Config;
use langpath_sort::i18n::{set_active_langpath, ResolutionMetrics};
use langpath_sort::records::{self, Node};
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langpath_sort=info".parse()?),
        )
        .init();

    info!("Starting langpath preview");

    let config = Config::from_env()?;

    let nodes = records::load_nodes(Path::new(&config.records_file))?;
    info!("Loaded {} nodes from {}", nodes.len(), config.records_file);

    let mut set = OrderedKeyedSet::new(records::by_field(config.sort_field.as_str()))
        .with_direction(config.direction);
    if config.case_insensitive {
        set = set.case_insensitive();
    }

    let added = set.extend(nodes.into_iter().map(Rc::new));
    let missing = set
        .iter()
        .filter(|node| node.field(&config.sort_field).is_none())
        .count();
    if missing > 0 {
        warn!(
            "{} of {} nodes have no '{}' field and sort {}",
            missing,
            added,
            config.sort_field,
            config.direction.smallest_end()
        );
    }

    for langpath in &config.langpaths {
        set_active_langpath(langpath.tags().iter().cloned());
        set.resort();

        let labels = set
            .iter()
            .map(|node| display_label(node, &config.sort_field))
            .collect::<Result<Vec<_>>>()?;
        println!("{}: {}", langpath, labels.join(", "));
    }

    let report = ResolutionMetrics::global().report();
    info!("Resolution metrics: {}", serde_json::to_string(&report)?);

    Ok(())
}

fn display_label(node: &Node, field: &str) -> Result<String> {
    match node.field(field) {
        Some(label) => Ok(label.resolve_active()?.to_string()),
        None => Ok(format!("<{}>", node.id)),
    }
}
