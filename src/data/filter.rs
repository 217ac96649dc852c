use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter specification: the constraints for one dashboard view
// ---------------------------------------------------------------------------

/// Online-delivery constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryFilter {
    #[default]
    Any,
    Yes,
    No,
}

/// The rating interval that means "no constraint": the whole rating scale.
pub const FULL_RATING_RANGE: (f64, f64) = (0.0, 5.0);

/// Immutable set of user-chosen constraints for one view. All constraints
/// are optional and AND-combined; `Default` applies no constraint at all.
///
/// A record passes when:
/// * `city` is `None`, or its city matches exactly
/// * `price_ranges` is empty (no constraint), or its price range is in the set
/// * `cuisines` is empty, or any of its cuisine tokens is in the set
/// * its rating falls inside `rating_range` (inclusive); the full interval
///   counts as no constraint and lets records without a rating through
/// * the delivery flag matches (`Any` always passes)
/// * its votes reach `min_votes`; `0` means no constraint
///
/// Records missing a field fail any active constraint on that field.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub city: Option<String>,
    pub price_ranges: BTreeSet<i64>,
    pub cuisines: BTreeSet<String>,
    /// Inclusive `(lo, hi)` bounds on the aggregate rating.
    pub rating_range: (f64, f64),
    pub online_delivery: DeliveryFilter,
    pub min_votes: i64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            city: None,
            price_ranges: BTreeSet::new(),
            cuisines: BTreeSet::new(),
            rating_range: FULL_RATING_RANGE,
            online_delivery: DeliveryFilter::Any,
            min_votes: 0,
        }
    }
}

impl FilterSpec {
    /// Whether the rating constraint is narrower than the full scale.
    fn rating_constraint_active(&self) -> bool {
        self.rating_range.0 > FULL_RATING_RANGE.0 || self.rating_range.1 < FULL_RATING_RANGE.1
    }

    /// The AND-combined predicate over one record.
    pub fn matches(&self, rec: &Record) -> bool {
        if let Some(city) = &self.city {
            if rec.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }

        if !self.price_ranges.is_empty() {
            match rec.price_range {
                Some(price) if self.price_ranges.contains(&price) => {}
                _ => return false,
            }
        }

        if !self.cuisines.is_empty()
            && !rec.cuisine_tokens().any(|t| self.cuisines.contains(t))
        {
            return false;
        }

        if self.rating_constraint_active() {
            let (lo, hi) = self.rating_range;
            match rec.rating {
                Some(r) if r >= lo && r <= hi => {}
                _ => return false,
            }
        }

        match self.online_delivery {
            DeliveryFilter::Any => {}
            DeliveryFilter::Yes => {
                if rec.delivers_online() != Some(true) {
                    return false;
                }
            }
            DeliveryFilter::No => {
                if rec.delivers_online() != Some(false) {
                    return false;
                }
            }
        }

        if self.min_votes > 0 {
            match rec.votes {
                Some(v) if v >= self.min_votes => {}
                _ => return false,
            }
        }

        true
    }
}

/// Return indices of records that pass all active constraints, in source
/// order. The dataset itself is never touched; an empty result is a valid
/// outcome, not an error.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Sort view indices by rating, best first, records without a rating last.
/// A separate, composable step: filtering itself always preserves source
/// order.
pub fn sort_by_rating_desc(dataset: &Dataset, indices: &mut [usize]) {
    indices.sort_by(|&a, &b| {
        match (dataset.records[a].rating, dataset.records[b].rating) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
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
        city: &str,
        cuisines: &str,
        price: i64,
        rating: Option<f64>,
        votes: Option<i64>,
        delivery: &str,
    ) -> BTreeMap<String, FieldValue> {
        let mut fields = BTreeMap::new();
        fields.insert("Restaurant Name".into(), FieldValue::Text(name.into()));
        fields.insert("City".into(), FieldValue::Text(city.into()));
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
                row("Spice Route", "Pune", "North Indian, Chinese", 2, Some(4.6), Some(520), "Yes"),
                row("Corner Cafe", "Pune", "Cafe, Continental", 1, Some(3.0), Some(80), "No"),
                row("Bay Leaf", "Mumbai", "Chinese, Thai, Seafood", 3, Some(4.0), Some(240), " yes "),
                row("New Spot", "Mumbai", "Mexican", 2, None, None, "No"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn default_spec_keeps_everything() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterSpec::default());
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_price_set_means_no_constraint() {
        let ds = sample_dataset();

        let none_selected = FilterSpec::default();
        let all_selected = FilterSpec {
            price_ranges: ds.price_ranges.clone(),
            ..FilterSpec::default()
        };

        assert_eq!(
            filtered_indices(&ds, &none_selected).len(),
            filtered_indices(&ds, &all_selected).len(),
        );
    }

    #[test]
    fn city_and_rating_constraints_combine_with_and() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            city: Some("Pune".into()),
            rating_range: (4.0, 5.0),
            ..FilterSpec::default()
        };
        let idx = filtered_indices(&ds, &spec);
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn cuisine_matching_is_per_token() {
        let ds = sample_dataset();

        let thai = FilterSpec {
            cuisines: BTreeSet::from(["Thai".to_string()]),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&ds, &thai), vec![2]);

        let mexican = FilterSpec {
            cuisines: BTreeSet::from(["Mexican".to_string()]),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&ds, &mexican), vec![3]);

        // Token-exact: "Sea" is not a cuisine even though "Seafood" contains it.
        let sea = FilterSpec {
            cuisines: BTreeSet::from(["Sea".to_string()]),
            ..FilterSpec::default()
        };
        assert!(filtered_indices(&ds, &sea).is_empty());
    }

    #[test]
    fn missing_votes_fail_only_active_bounds() {
        let ds = sample_dataset();

        let no_bound = FilterSpec::default();
        assert!(filtered_indices(&ds, &no_bound).contains(&3));

        let min_one = FilterSpec {
            min_votes: 1,
            ..FilterSpec::default()
        };
        assert!(!filtered_indices(&ds, &min_one).contains(&3));
    }

    #[test]
    fn missing_rating_fails_only_narrowed_ranges() {
        let ds = sample_dataset();

        let full = FilterSpec::default();
        assert!(filtered_indices(&ds, &full).contains(&3));

        let narrowed = FilterSpec {
            rating_range: (0.0, 4.9),
            ..FilterSpec::default()
        };
        assert!(!filtered_indices(&ds, &narrowed).contains(&3));
    }

    #[test]
    fn delivery_filter_ignores_case_and_whitespace() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            online_delivery: DeliveryFilter::Yes,
            ..FilterSpec::default()
        };
        // Record 2 says " yes " in the raw data.
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 2]);
    }

    #[test]
    fn sorting_is_separate_and_puts_unrated_last() {
        let ds = sample_dataset();
        let mut idx = filtered_indices(&ds, &FilterSpec::default());
        sort_by_rating_desc(&ds, &mut idx);
        assert_eq!(idx, vec![0, 2, 1, 3]);
    }

    #[test]
    fn filtering_never_mutates_the_dataset() {
        let ds = sample_dataset();
        let before = ds.len();
        let city_before = ds.records[3].city.clone();

        for spec in [
            FilterSpec::default(),
            FilterSpec {
                city: Some("Pune".into()),
                min_votes: 100,
                ..FilterSpec::default()
            },
        ] {
            let _ = filtered_indices(&ds, &spec);
        }

        assert_eq!(ds.len(), before);
        assert_eq!(ds.records[3].city, city_before);
    }
}
