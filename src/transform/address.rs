//! Street address and town extraction.
//!
//! DatexII carries both as ordered `addressLine` entries under the facility
//! location. Feeds often prefix each line with a locale label ("de: ...") and
//! repeat the town at the end of the street line; both artifacts are removed.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{Node, to_sequence};

static LOCALE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^:]+:\s*").unwrap());

const ADDRESS_LINE_PATH: &[&str] = &[
    "locationReference",
    "_locationReferenceExtension",
    "facilityLocation",
    "address",
    "addressLine",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressInfo {
    pub town: String,
    pub address: String,
}

/// Resolves the cleaned `{town, address}` pair of a namespace-stripped site.
///
/// Line 0 is the street address and line 1 the town, after ordering by
/// `@order`. Missing pieces resolve to empty strings.
pub fn resolve_address(site: &Node) -> AddressInfo {
    let lines = match site.path(ADDRESS_LINE_PATH) {
        Some(node) => sort_by_order(to_sequence(node)),
        None => Vec::new(),
    };

    let raw_address = lines.first().map(|line| line_text(line)).unwrap_or_default();
    let raw_town = lines.get(1).map(|line| line_text(line)).unwrap_or_default();

    let town = strip_locale_prefix(raw_town);
    let mut address = strip_locale_prefix(raw_address);

    if !town.is_empty() {
        address = remove_trailing_town(&address, &town);
    }

    AddressInfo {
        town: clean_tail(&town),
        address: clean_tail(&address),
    }
}

/// Stable sort on the integer `@order` attribute; a missing attribute counts
/// as 0. If any line carries an order that is not an integer the original
/// order is kept.
fn sort_by_order(lines: Vec<&Node>) -> Vec<&Node> {
    let keys: Option<Vec<i64>> = lines.iter().map(|line| order_key(line)).collect();
    match keys {
        Some(keys) => {
            let mut keyed: Vec<(i64, &Node)> = keys.into_iter().zip(lines).collect();
            keyed.sort_by_key(|(key, _)| *key);
            keyed.into_iter().map(|(_, line)| line).collect()
        }
        None => lines,
    }
}

fn order_key(line: &Node) -> Option<i64> {
    match line.get("@order") {
        None => Some(0),
        Some(order) => order.as_str()?.trim().parse().ok(),
    }
}

fn line_text(line: &Node) -> &str {
    line.path(&["text", "values", "value"])
        .and_then(Node::text)
        .unwrap_or_default()
}

fn strip_locale_prefix(raw: &str) -> String {
    LOCALE_PREFIX_RE.replace(raw, "").trim_start().to_string()
}

/// Cuts the address at the first place the town appears as a word after a
/// comma or whitespace, case-insensitively.
fn remove_trailing_town(address: &str, town: &str) -> String {
    let pattern = format!(r"(?i)(?:,\s*|\s+){}\b.*$", regex::escape(town));
    match Regex::new(&pattern) {
        Ok(re) => re.replace(address, "").into_owned(),
        Err(_) => address.to_string(),
    }
}

fn clean_tail(value: &str) -> String {
    value
        .trim_end_matches([',', ' '])
        .trim()
        .to_string()
}
