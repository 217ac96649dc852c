use crate::data::filter::{filtered_indices, DeliveryFilter, FilterSpec};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The dashboard's data state, independent of rendering: the immutable
/// loaded dataset, the current filter specification, and the cached view.
/// Sidebar widgets call the mutators; each one updates the spec and
/// recomputes the view from the untouched source.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Current filter specification.
    pub filter: FilterSpec,

    /// Indices of records passing the current filter (cached).
    pub visible_indices: Vec<usize>,
}

impl DashboardState {
    /// Ingest a newly loaded dataset and reset the view to "everything".
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filter = FilterSpec::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
        }
    }

    /// Constrain to one city, or `None` for all cities.
    pub fn set_city(&mut self, city: Option<String>) {
        self.filter.city = city;
        self.refilter();
    }

    /// Toggle a price range in the selection set.
    pub fn toggle_price_range(&mut self, price: i64) {
        if !self.filter.price_ranges.remove(&price) {
            self.filter.price_ranges.insert(price);
        }
        self.refilter();
    }

    /// Toggle a cuisine token in the selection set.
    pub fn toggle_cuisine(&mut self, cuisine: &str) {
        if !self.filter.cuisines.remove(cuisine) {
            self.filter.cuisines.insert(cuisine.to_string());
        }
        self.refilter();
    }

    /// Set the inclusive rating bounds.
    pub fn set_rating_range(&mut self, lo: f64, hi: f64) {
        self.filter.rating_range = (lo, hi);
        self.refilter();
    }

    /// Set the online-delivery constraint.
    pub fn set_delivery(&mut self, delivery: DeliveryFilter) {
        self.filter.online_delivery = delivery;
        self.refilter();
    }

    /// Set the minimum-votes bound.
    pub fn set_min_votes(&mut self, min_votes: i64) {
        self.filter.min_votes = min_votes;
        self.refilter();
    }

    /// Drop every constraint and show the full dataset again.
    pub fn reset_filters(&mut self) {
        self.filter = FilterSpec::default();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::FieldValue;

    fn sample_dataset() -> Dataset {
        let headers: Vec<String> = ["City", "Aggregate rating"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        let row = |city: &str, rating: f64| {
            let mut fields = BTreeMap::new();
            fields.insert("City".to_string(), FieldValue::Text(city.into()));
            fields.insert("Aggregate rating".to_string(), FieldValue::Float(rating));
            fields
        };

        Dataset::from_rows(
            &headers,
            vec![row("Pune", 4.6), row("Pune", 3.0), row("Mumbai", 4.9)],
        )
        .unwrap()
    }

    #[test]
    fn view_recomputes_on_each_change() {
        let mut state = DashboardState::default();
        state.set_dataset(sample_dataset());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);

        state.set_city(Some("Pune".into()));
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.set_rating_range(4.0, 5.0);
        assert_eq!(state.visible_indices, vec![0]);

        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn toggles_flip_selection_sets() {
        let mut state = DashboardState::default();
        state.set_dataset(sample_dataset());

        state.toggle_price_range(2);
        assert!(state.filter.price_ranges.contains(&2));
        state.toggle_price_range(2);
        assert!(state.filter.price_ranges.is_empty());

        state.toggle_cuisine("Thai");
        assert!(state.filter.cuisines.contains("Thai"));
        state.toggle_cuisine("Thai");
        assert!(state.filter.cuisines.is_empty());
    }
}
