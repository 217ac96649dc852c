//! Grouped aggregates over a filtered view.
//!
//! Every function here takes the immutable dataset plus the view's index
//! list and returns plain values ready for metric tiles and charts. Nothing
//! is cached and nothing is mutated; recompute after every filter change.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::sort_by_rating_desc;
use crate::data::model::{Dataset, RatingCategory};

// ---------------------------------------------------------------------------
// Summary – the KPI metric row
// ---------------------------------------------------------------------------

/// Headline metrics for a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records in the view.
    pub total: usize,
    /// Mean aggregate rating across rated records; `None` if none are rated.
    pub mean_rating: Option<f64>,
    /// Sum of votes across records that have a vote count.
    pub total_votes: i64,
    /// Records whose delivery flag reads as Yes.
    pub online_delivery_count: usize,
}

/// Compute the KPI row. Missing ratings and votes are skipped, not treated
/// as zero.
pub fn summarize(dataset: &Dataset, indices: &[usize]) -> Summary {
    let mut rating_sum = 0.0;
    let mut rated = 0usize;
    let mut total_votes = 0i64;
    let mut online_delivery_count = 0usize;

    for &idx in indices {
        let rec = &dataset.records[idx];
        if let Some(rating) = rec.rating {
            rating_sum += rating;
            rated += 1;
        }
        if let Some(votes) = rec.votes {
            total_votes += votes;
        }
        if rec.delivers_online() == Some(true) {
            online_delivery_count += 1;
        }
    }

    Summary {
        total: indices.len(),
        mean_rating: (rated > 0).then(|| rating_sum / rated as f64),
        total_votes,
        online_delivery_count,
    }
}

// ---------------------------------------------------------------------------
// Rating-category breakdown
// ---------------------------------------------------------------------------

/// Per-tier record counts. Records without a rating are reported in the
/// explicit `unrated` bucket rather than being folded into `average`, so
/// `excellent + good + average + unrated` always equals the view size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub unrated: usize,
}

impl CategoryCounts {
    /// Rated tiers in chart display order (best first).
    pub fn in_display_order(&self) -> [(RatingCategory, usize); 3] {
        [
            (RatingCategory::Excellent, self.excellent),
            (RatingCategory::Good, self.good),
            (RatingCategory::Average, self.average),
        ]
    }
}

/// Count records per rating tier.
pub fn rating_category_counts(dataset: &Dataset, indices: &[usize]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for &idx in indices {
        match dataset.records[idx].rating_category {
            Some(RatingCategory::Excellent) => counts.excellent += 1,
            Some(RatingCategory::Good) => counts.good += 1,
            Some(RatingCategory::Average) => counts.average += 1,
            None => counts.unrated += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Price-range groupings
// ---------------------------------------------------------------------------

/// Record counts per price range, ascending by price range. Records without
/// a price range are left out.
pub fn price_range_counts(dataset: &Dataset, indices: &[usize]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &idx in indices {
        if let Some(price) = dataset.records[idx].price_range {
            *counts.entry(price).or_insert(0) += 1;
        }
    }
    counts
}

/// Mean rating per price range; rows missing either field are skipped.
pub fn mean_rating_by_price(dataset: &Dataset, indices: &[usize]) -> BTreeMap<i64, f64> {
    let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for &idx in indices {
        let rec = &dataset.records[idx];
        if let (Some(price), Some(rating)) = (rec.price_range, rec.rating) {
            let entry = sums.entry(price).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(price, (sum, n))| (price, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Cuisine and top-restaurant rankings
// ---------------------------------------------------------------------------

/// The most common cuisine tokens in the view: count descending, then
/// alphabetical, truncated to `limit`.
pub fn top_cuisines(dataset: &Dataset, indices: &[usize], limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for &idx in indices {
        for token in dataset.records[idx].cuisine_tokens() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // BTreeMap iteration is alphabetical; the stable sort keeps that as the
    // tie-break.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Indices of the best-rated records in the view, best first, capped at
/// `limit`. Unrated records never rank.
pub fn top_rated(dataset: &Dataset, indices: &[usize], limit: usize) -> Vec<usize> {
    let mut rated: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&idx| dataset.records[idx].rating.is_some())
        .collect();
    sort_by_rating_desc(dataset, &mut rated);
    rated.truncate(limit);
    rated
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::FieldValue;

    fn headers() -> Vec<String> {
        [
            "Restaurant Name",
            "City",
            "Cuisines",
            "Price range",
            "Aggregate rating",
            "Votes",
            "Has Online delivery",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    fn row(
        name: &str,
        cuisines: &str,
        price: i64,
        rating: Option<f64>,
        votes: Option<i64>,
        delivery: &str,
    ) -> BTreeMap<String, FieldValue> {
        let mut fields = BTreeMap::new();
        fields.insert("Restaurant Name".into(), FieldValue::Text(name.into()));
        fields.insert("City".into(), FieldValue::Text("Pune".into()));
        fields.insert("Cuisines".into(), FieldValue::Text(cuisines.into()));
        fields.insert("Price range".into(), FieldValue::Integer(price));
        fields.insert(
            "Aggregate rating".into(),
            rating.map_or(FieldValue::Null, FieldValue::Float),
        );
        fields.insert(
            "Votes".into(),
            votes.map_or(FieldValue::Null, FieldValue::Integer),
        );
        fields.insert(
            "Has Online delivery".into(),
            FieldValue::Text(delivery.into()),
        );
        fields
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_rows(
            &headers(),
            vec![
                row("A", "North Indian, Chinese", 2, Some(4.8), Some(100), "Yes"),
                row("B", "Chinese", 1, Some(4.0), Some(50), "No"),
                row("C", "Cafe", 2, Some(3.0), Some(10), "Yes"),
                row("D", "Chinese, Thai", 1, None, None, "No"),
            ],
        )
        .unwrap()
    }

    fn all_indices(ds: &Dataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn summary_skips_missing_values() {
        let ds = sample_dataset();
        let summary = summarize(&ds, &all_indices(&ds));

        assert_eq!(summary.total, 4);
        // Mean over the three rated records only.
        let mean = summary.mean_rating.unwrap();
        assert!((mean - (4.8 + 4.0 + 3.0) / 3.0).abs() < 1e-9);
        assert_eq!(summary.total_votes, 160);
        assert_eq!(summary.online_delivery_count, 2);
    }

    #[test]
    fn summary_of_empty_view() {
        let ds = sample_dataset();
        let summary = summarize(&ds, &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_rating, None);
        assert_eq!(summary.total_votes, 0);
    }

    #[test]
    fn category_counts_use_an_explicit_unrated_bucket() {
        let ds = sample_dataset();
        let counts = rating_category_counts(&ds, &all_indices(&ds));

        assert_eq!(counts.excellent, 1);
        assert_eq!(counts.good, 1);
        assert_eq!(counts.average, 1);
        assert_eq!(counts.unrated, 1);
        assert_eq!(
            counts.in_display_order().map(|(_, n)| n),
            [1, 1, 1],
        );
    }

    #[test]
    fn price_groupings() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);

        let counts = price_range_counts(&ds, &idx);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&2));

        let means = mean_rating_by_price(&ds, &idx);
        // Price 1 has one rated record (B); D is unrated and skipped.
        assert!((means[&1] - 4.0).abs() < 1e-9);
        assert!((means[&2] - 3.9).abs() < 1e-9);
    }

    #[test]
    fn cuisine_ranking_counts_tokens() {
        let ds = sample_dataset();
        let ranked = top_cuisines(&ds, &all_indices(&ds), 2);
        assert_eq!(ranked[0], ("Chinese".to_string(), 3));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn top_rated_excludes_unrated_records() {
        let ds = sample_dataset();
        let top = top_rated(&ds, &all_indices(&ds), 10);
        assert_eq!(top, vec![0, 1, 2]);
    }
}
