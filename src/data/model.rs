use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::schema::{Schema, SchemaError};

// ---------------------------------------------------------------------------
// FieldValue – a single cell in the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what a delimited-text loader can
/// produce. Using `BTreeMap` / `BTreeSet` downstream so `FieldValue` must be
/// `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Null => write!(f, "<missing>"),
        }
    }
}

impl FieldValue {
    /// Numeric coercion in the "errors become missing" sense: numeric text
    /// parses, anything else is `None`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Null => None,
        }
    }

    /// Integer coercion with the same missing-on-failure policy. Fractional
    /// values truncate (counts occasionally arrive as `"415.0"`).
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Float(v) => Some(*v as i64),
            FieldValue::Text(s) => {
                let t = s.trim();
                t.parse::<i64>()
                    .ok()
                    .or_else(|| t.parse::<f64>().ok().map(|v| v as i64))
            }
            FieldValue::Null => None,
        }
    }

    /// Take the value as plain text; `Null` becomes `None`.
    fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
            FieldValue::Null => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RatingCategory – three-tier bucketing of the aggregate rating
// ---------------------------------------------------------------------------

/// Rating tier derived from the numeric aggregate rating. Pure function of
/// the rating; records without a rating carry no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RatingCategory {
    Excellent,
    Good,
    Average,
}

impl RatingCategory {
    /// Chart display order (best tier first).
    pub const DISPLAY_ORDER: [RatingCategory; 3] = [
        RatingCategory::Excellent,
        RatingCategory::Good,
        RatingCategory::Average,
    ];

    /// Bucket a rating, first match wins: `>= 4.5` Excellent, `>= 3.5` Good,
    /// everything else Average.
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            RatingCategory::Excellent
        } else if rating >= 3.5 {
            RatingCategory::Good
        } else {
            RatingCategory::Average
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RatingCategory::Excellent => "Excellent",
            RatingCategory::Good => "Good",
            RatingCategory::Average => "Average",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// Record – one restaurant row
// ---------------------------------------------------------------------------

/// A single restaurant (one row of the source table). Canonical fields are
/// extracted and coerced once at load time; every column the schema does not
/// recognize is kept verbatim in `extra` so exports can reproduce the full
/// input shape.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Option<String>,
    pub city: Option<String>,
    /// Raw comma-joined cuisine list, e.g. `"North Indian, Chinese"`.
    pub cuisines: Option<String>,
    pub price_range: Option<i64>,
    /// Aggregate rating in [0.0, 5.0]; missing if absent or non-numeric.
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    /// Raw online-delivery flag, case and whitespace as in the source.
    pub online_delivery: Option<String>,
    /// Derived from `rating`; `None` when the rating is missing.
    pub rating_category: Option<RatingCategory>,
    /// Unrecognized columns: column_name → value.
    pub extra: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Individual cuisine tokens, trimmed, empty tokens dropped.
    pub fn cuisine_tokens(&self) -> impl Iterator<Item = &str> {
        self.cuisines
            .as_deref()
            .into_iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Interpret the delivery flag, trimmed and case-insensitive.
    pub fn delivers_online(&self) -> Option<bool> {
        match self
            .online_delivery
            .as_deref()?
            .trim()
            .to_lowercase()
            .as_str()
        {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed facet indexes. Built once
/// per load and never mutated; every filter invocation reads from it and
/// produces a fresh view.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records (rows), in source order.
    pub records: Vec<Record>,
    /// Resolved column layout of the source table.
    pub schema: Schema,
    /// Sorted unique cities, for sidebar option lists.
    pub cities: BTreeSet<String>,
    /// Sorted unique price ranges present in the data.
    pub price_ranges: BTreeSet<i64>,
    /// Sorted unique cuisine tokens across all records.
    pub cuisines: BTreeSet<String>,
}

impl Dataset {
    /// Normalize raw rows into a dataset: resolve the schema from the
    /// headers, extract and coerce the canonical fields, derive the rating
    /// category, and build the facet indexes.
    pub fn from_rows(
        headers: &[String],
        rows: Vec<BTreeMap<String, FieldValue>>,
    ) -> Result<Self, SchemaError> {
        let schema = Schema::resolve(headers)?;

        let records: Vec<Record> = rows
            .into_iter()
            .map(|row| Self::extract_record(&schema, row))
            .collect();

        let mut cities = BTreeSet::new();
        let mut price_ranges = BTreeSet::new();
        let mut cuisines = BTreeSet::new();
        for rec in &records {
            if let Some(city) = &rec.city {
                cities.insert(city.clone());
            }
            if let Some(price) = rec.price_range {
                price_ranges.insert(price);
            }
            for token in rec.cuisine_tokens() {
                cuisines.insert(token.to_string());
            }
        }

        Ok(Dataset {
            records,
            schema,
            cities,
            price_ranges,
            cuisines,
        })
    }

    fn extract_record(schema: &Schema, mut fields: BTreeMap<String, FieldValue>) -> Record {
        fn take(fields: &mut BTreeMap<String, FieldValue>, col: Option<&str>) -> FieldValue {
            col.and_then(|c| fields.remove(c))
                .unwrap_or(FieldValue::Null)
        }

        let name = take(&mut fields, schema.name.as_deref()).into_text();
        let city = take(&mut fields, Some(&schema.city)).into_text();
        let cuisines = take(&mut fields, schema.cuisines.as_deref()).into_text();
        let price_range = take(&mut fields, schema.price_range.as_deref()).coerce_i64();
        let rating = take(&mut fields, schema.rating.as_deref()).coerce_f64();
        let votes = take(&mut fields, schema.votes.as_deref()).coerce_i64();
        let online_delivery = take(&mut fields, schema.online_delivery.as_deref()).into_text();

        Record {
            name,
            city,
            cuisines,
            price_range,
            rating,
            votes,
            online_delivery,
            rating_category: rating.map(RatingCategory::from_rating),
            extra: fields,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
