use thiserror::Error;

// ---------------------------------------------------------------------------
// Schema – resolved column layout of the source table
// ---------------------------------------------------------------------------

/// Canonical column labels as they appear in the reference dataset. Raw
/// headers are matched against these case-insensitively after trimming.
const CITY: &str = "City";
const CUISINES: &str = "Cuisines";
const PRICE_RANGE: &str = "Price range";
const RATING: &str = "Aggregate rating";
const VOTES: &str = "Votes";
const ONLINE_DELIVERY: &str = "Has Online delivery";

/// Structural problems with the source table. Data-quality issues never land
/// here; only a table that is missing a required column does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dataset has no '{0}' column")]
    MissingColumn(&'static str),
}

/// The column layout of a loaded table: trimmed headers in source order plus
/// the resolved labels of the canonical columns. Resolution happens once, at
/// load time; everything downstream looks fields up through this.
#[derive(Debug, Clone)]
pub struct Schema {
    /// All column labels, whitespace-trimmed, in source order.
    pub columns: Vec<String>,
    /// Restaurant-name column, if the heuristic found one.
    pub name: Option<String>,
    pub city: String,
    pub cuisines: Option<String>,
    pub price_range: Option<String>,
    pub rating: Option<String>,
    pub votes: Option<String>,
    pub online_delivery: Option<String>,
}

impl Schema {
    /// Resolve the canonical columns from raw headers. `City` is the one
    /// structural requirement; any other canonical column may be absent, in
    /// which case the field is simply missing on every record.
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let city = find_column(&columns, CITY).ok_or(SchemaError::MissingColumn(CITY))?;

        let cuisines = find_column(&columns, CUISINES);
        let price_range = find_column(&columns, PRICE_RANGE);
        let rating = find_column(&columns, RATING);
        let votes = find_column(&columns, VOTES);
        let online_delivery = find_column(&columns, ONLINE_DELIVERY);

        for (label, resolved) in [
            (CUISINES, &cuisines),
            (PRICE_RANGE, &price_range),
            (RATING, &rating),
            (VOTES, &votes),
            (ONLINE_DELIVERY, &online_delivery),
        ] {
            if resolved.is_none() {
                log::warn!("no '{label}' column; the field will be missing on every record");
            }
        }

        let name = resolve_name_column(&columns);
        if name.is_none() {
            log::warn!("no restaurant-name column resolved; name-dependent views will degrade");
        }

        Ok(Schema {
            columns,
            name,
            city,
            cuisines,
            price_range,
            rating,
            votes,
            online_delivery,
        })
    }
}

/// Case-insensitive exact match against the trimmed column labels.
fn find_column(columns: &[String], label: &str) -> Option<String> {
    columns
        .iter()
        .find(|c| c.eq_ignore_ascii_case(label))
        .cloned()
}

/// Best-effort restaurant-name column lookup: first column containing
/// `name`, falling back to `restaurant`, then `hotel` (case-insensitive).
/// `name` is tried first so an ID column like `Restaurant ID` cannot shadow
/// `Restaurant Name`. `None` means the name column is unresolved.
pub fn resolve_name_column(columns: &[String]) -> Option<String> {
    for needle in ["name", "restaurant", "hotel"] {
        if let Some(col) = columns
            .iter()
            .find(|c| c.to_lowercase().contains(needle))
        {
            return Some(col.clone());
        }
    }
    None
}
