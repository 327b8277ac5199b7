use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use fleetline_catalog::{contains_folded, eq_folded, CatalogIndex};
use fleetline_shared::{FuelType, Transmission, Vehicle};

/// Exact-match filter with an "Any" sentinel meaning no constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    Any,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Any
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::Any => true,
            Selection::Only(expected) => expected == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Selection::Any)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") {
            Ok(Selection::Any)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    YearDesc,
    YearAsc,
    RatingDesc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" => Ok(SortKey::Default),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "year-desc" => Ok(SortKey::YearDesc),
            "year-asc" => Ok(SortKey::YearAsc),
            "rating-desc" => Ok(SortKey::RatingDesc),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::RatingDesc => "rating-desc",
        };
        f.write_str(name)
    }
}

/// User-selected filter and sort parameters.
///
/// `make` and `model` are not independently settable: the model choice
/// only exists under a selected make and is dropped when the make changes
/// to one it cannot match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    make: Option<String>,
    model: Option<String>,
    pub price_range: Option<Bounds<f64>>,
    pub year_range: Option<Bounds<i32>>,
    pub transmission: Selection<Transmission>,
    pub fuel_type: Selection<FuelType>,
    pub seats: Selection<u32>,
    pub sort: SortKey,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl FilterCriteria {
    pub fn make(&self) -> Option<&str> {
        self.make.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Selects a make. Clearing the make clears the model; a new make keeps
    /// the model only if it still matches one of that make's models.
    pub fn set_make(&mut self, make: Option<&str>, index: &CatalogIndex) {
        self.make = non_blank(make);
        if self.make.is_none() {
            self.model = None;
        }
        self.reconcile(index);
    }

    /// Selects a model under the current make. Ignored while no make is set.
    pub fn set_model(&mut self, model: Option<&str>) {
        if self.make.is_none() {
            self.model = None;
            return;
        }
        self.model = non_blank(model);
    }

    /// Drops a model selection the current make cannot satisfy
    pub fn reconcile(&mut self, index: &CatalogIndex) {
        if let (Some(make), Some(model)) = (&self.make, &self.model) {
            if !index.accepts_model(make, model) {
                debug!("Dropping model '{}': not offered under make '{}'", model, make);
                self.model = None;
            }
        }
    }

    /// True when no constraint is active. Sort order does not count.
    pub fn is_unconstrained(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.price_range.is_none()
            && self.year_range.is_none()
            && self.transmission.is_any()
            && self.fuel_type.is_any()
            && self.seats.is_any()
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(make) = &self.make {
            if !eq_folded(&vehicle.make, make) {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if !contains_folded(&vehicle.model, model) {
                return false;
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(&vehicle.price_per_day) {
                return false;
            }
        }
        if let Some(range) = &self.year_range {
            if !range.contains(&vehicle.year) {
                return false;
            }
        }

        self.transmission.admits(&vehicle.transmission)
            && self.fuel_type.admits(&vehicle.fuel_type)
            && self.seats.admits(&vehicle.seats)
    }
}

fn compare(sort: SortKey, a: &Vehicle, b: &Vehicle) -> Ordering {
    match sort {
        SortKey::Default => Ordering::Equal,
        SortKey::PriceAsc => a.price_per_day.total_cmp(&b.price_per_day),
        SortKey::PriceDesc => b.price_per_day.total_cmp(&a.price_per_day),
        SortKey::YearAsc => a.year.cmp(&b.year),
        SortKey::YearDesc => b.year.cmp(&a.year),
        SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
    }
}

/// Filters the catalog and orders the matches. Ties (and `SortKey::Default`)
/// keep catalog order.
pub fn filter_fleet<'a>(catalog: &'a [Vehicle], criteria: &FilterCriteria) -> Vec<&'a Vehicle> {
    let mut matches: Vec<&Vehicle> = catalog.iter().filter(|v| criteria.matches(v)).collect();
    if criteria.sort != SortKey::Default {
        matches.sort_by(|a, b| compare(criteria.sort, a, b));
    }
    matches
}

/// Which empty-list message the listing should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyState {
    /// Nothing filtered yet and the catalog itself is empty
    NoFiltersApplied,
    /// Filters are active and nothing matches
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct FleetSearch<'a> {
    pub vehicles: Vec<&'a Vehicle>,
    pub filters_applied: bool,
    pub empty_state: Option<EmptyState>,
}

pub fn search<'a>(catalog: &'a [Vehicle], criteria: &FilterCriteria) -> FleetSearch<'a> {
    let vehicles = filter_fleet(catalog, criteria);
    let filters_applied = !criteria.is_unconstrained();

    let empty_state = match (vehicles.is_empty(), filters_applied) {
        (false, _) => None,
        (true, true) => Some(EmptyState::NoMatches),
        (true, false) => Some(EmptyState::NoFiltersApplied),
    };

    debug!(
        "Fleet search: {} of {} vehicles (sort={}, filters_applied={})",
        vehicles.len(),
        catalog.len(),
        criteria.sort,
        filters_applied
    );

    FleetSearch {
        vehicles,
        filters_applied,
        empty_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: i64, make: &str, model: &str, year: i32, price: f64, rating: f64) -> Vehicle {
        Vehicle {
            id,
            make: make.to_string(),
            model: model.to_string(),
            year,
            price_per_day: price,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Gasoline,
            seats: 5,
            rating,
            category: "luxury".to_string(),
            photo_gallery: vec![],
            availability: None,
        }
    }

    fn fleet() -> Vec<Vehicle> {
        let mut golf = vehicle(4, "Volkswagen", "Golf", 2019, 45.0, 4.1);
        golf.transmission = Transmission::Manual;
        golf.category = "compact".to_string();

        let mut tesla = vehicle(5, "Tesla", "Model 3", 2023, 120.0, 4.9);
        tesla.fuel_type = FuelType::Electric;

        let mut q7 = vehicle(3, "Audi", "Q7", 2022, 140.0, 4.5);
        q7.seats = 7;
        q7.fuel_type = FuelType::Diesel;

        vec![
            vehicle(1, "Mercedes", "GLE 450", 2022, 180.0, 4.8),
            vehicle(2, "Mercedes", "C-Class", 2021, 110.0, 4.5),
            q7,
            golf,
            tesla,
            vehicle(6, "Audi", "A4", 2020, 90.0, 4.2),
        ]
    }

    fn ids(vehicles: &[&Vehicle]) -> Vec<i64> {
        vehicles.iter().map(|v| v.id).collect()
    }

    #[test]
    fn test_unconstrained_passes_through() {
        let catalog = fleet();
        let criteria = FilterCriteria::default();

        let result = search(&catalog, &criteria);
        assert_eq!(ids(&result.vehicles), vec![1, 2, 3, 4, 5, 6]);
        assert!(!result.filters_applied);
        assert_eq!(result.empty_state, None);
    }

    #[test]
    fn test_idempotent() {
        let catalog = fleet();
        let mut criteria = FilterCriteria::default();
        criteria.sort = SortKey::RatingDesc;
        criteria.price_range = Some(Bounds::new(50.0, 200.0));

        let first = ids(&filter_fleet(&catalog, &criteria));
        let second = ids(&filter_fleet(&catalog, &criteria));
        assert_eq!(first, second);
    }

    #[test]
    fn test_make_equality_and_model_substring() {
        let catalog = fleet();
        let index = CatalogIndex::build(&catalog);
        let mut criteria = FilterCriteria::default();

        criteria.set_make(Some("mercedes"), &index);
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![1, 2]);

        criteria.set_model(Some("gle"));
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![1]);
    }

    #[test]
    fn test_non_ascii_make_matches_case_insensitively() {
        let catalog = vec![
            vehicle(1, "Škoda", "Octavia", 2021, 60.0, 4.2),
            vehicle(2, "Citroën", "C5 Aircross", 2022, 70.0, 4.0),
        ];
        let index = CatalogIndex::build(&catalog);
        let mut criteria = FilterCriteria::default();

        criteria.set_make(Some("škoda"), &index);
        criteria.set_model(Some("octavia"));
        criteria.reconcile(&index);
        assert_eq!(criteria.model(), Some("octavia"));
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![1]);

        criteria.set_make(Some("CITROËN"), &index);
        assert_eq!(criteria.model(), None);
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![2]);
    }

    #[test]
    fn test_make_change_clears_incompatible_model() {
        let catalog = fleet();
        let index = CatalogIndex::build(&catalog);
        let mut criteria = FilterCriteria::default();

        criteria.set_make(Some("Mercedes"), &index);
        criteria.set_model(Some("GLE"));
        assert_eq!(criteria.model(), Some("GLE"));

        criteria.set_make(Some("Audi"), &index);
        assert_eq!(criteria.make(), Some("Audi"));
        assert_eq!(criteria.model(), None);
    }

    #[test]
    fn test_clearing_make_clears_model() {
        let catalog = fleet();
        let index = CatalogIndex::build(&catalog);
        let mut criteria = FilterCriteria::default();

        criteria.set_make(Some("Audi"), &index);
        criteria.set_model(Some("Q7"));
        criteria.set_make(Some(""), &index);
        assert_eq!(criteria.make(), None);
        assert_eq!(criteria.model(), None);

        // No make, no model
        criteria.set_model(Some("Q7"));
        assert_eq!(criteria.model(), None);
    }

    #[test]
    fn test_monotonic_under_added_constraints() {
        let catalog = fleet();
        let index = CatalogIndex::build(&catalog);
        let mut criteria = FilterCriteria::default();
        let mut previous = ids(&filter_fleet(&catalog, &criteria));

        let steps: Vec<Box<dyn Fn(&mut FilterCriteria) + '_>> = vec![
            Box::new(|c: &mut FilterCriteria| c.price_range = Some(Bounds::new(80.0, 150.0))),
            Box::new(|c: &mut FilterCriteria| c.year_range = Some(Bounds::new(2020, 2023))),
            Box::new(|c: &mut FilterCriteria| c.transmission = Selection::Only(Transmission::Automatic)),
            Box::new(|c: &mut FilterCriteria| c.set_make(Some("Audi"), &index)),
            Box::new(|c: &mut FilterCriteria| c.seats = Selection::Only(7)),
            Box::new(|c: &mut FilterCriteria| c.fuel_type = Selection::Only(FuelType::Electric)),
        ];

        for step in steps {
            step(&mut criteria);
            let current = ids(&filter_fleet(&catalog, &criteria));
            assert!(current.len() <= previous.len());
            assert!(current.iter().all(|id| previous.contains(id)));
            previous = current;
        }

        assert!(previous.is_empty());
        assert_eq!(search(&catalog, &criteria).empty_state, Some(EmptyState::NoMatches));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let catalog = fleet();
        let mut criteria = FilterCriteria::default();
        criteria.price_range = Some(Bounds::new(90.0, 120.0));
        criteria.year_range = Some(Bounds::new(2020, 2021));

        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![2, 6]);
    }

    #[test]
    fn test_exact_match_selections() {
        let catalog = fleet();
        let mut criteria = FilterCriteria::default();

        criteria.transmission = Selection::Only(Transmission::Manual);
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![4]);

        criteria.transmission = Selection::Any;
        criteria.fuel_type = "Petrol".parse().unwrap();
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![1, 2, 4, 6]);

        criteria.fuel_type = "Any".parse().unwrap();
        criteria.seats = "7".parse().unwrap();
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![3]);
    }

    #[test]
    fn test_sort_orders() {
        let catalog = fleet();
        let mut criteria = FilterCriteria::default();

        criteria.sort = SortKey::PriceAsc;
        let sorted = filter_fleet(&catalog, &criteria);
        assert!(sorted.windows(2).all(|w| w[0].price_per_day <= w[1].price_per_day));

        criteria.sort = SortKey::PriceDesc;
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![1, 3, 5, 2, 6, 4]);

        criteria.sort = SortKey::YearAsc;
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![4, 6, 2, 1, 3, 5]);

        criteria.sort = SortKey::YearDesc;
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![5, 1, 3, 2, 6, 4]);

        // 2 and 3 tie on rating and keep catalog order
        criteria.sort = SortKey::RatingDesc;
        assert_eq!(ids(&filter_fleet(&catalog, &criteria)), vec![5, 1, 2, 3, 6, 4]);
    }

    #[test]
    fn test_empty_catalog_without_filters() {
        let result = search(&[], &FilterCriteria::default());
        assert!(result.vehicles.is_empty());
        assert_eq!(result.empty_state, Some(EmptyState::NoFiltersApplied));
    }

    #[test]
    fn test_sort_key_names() {
        assert_eq!("rating-desc".parse::<SortKey>().unwrap(), SortKey::RatingDesc);
        assert_eq!(SortKey::PriceAsc.to_string(), "price-asc");
        assert!("cheapest".parse::<SortKey>().is_err());
        let json = serde_json::to_string(&SortKey::YearDesc).unwrap();
        assert_eq!(json, "\"year-desc\"");
    }
}
