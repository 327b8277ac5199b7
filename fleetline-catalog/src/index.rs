use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use fleetline_shared::{Vehicle, VehicleId};

/// Case-insensitive equality. Unicode-aware so makes like Škoda or
/// Citroën fold the same way as ASCII ones.
pub fn eq_folded(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive substring test, folded the same way as [`eq_folded`]
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Lookup tables derived from a catalog: the make dropdown and the
/// models available under each make.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub unique_makes: Vec<String>,
    pub make_to_models: BTreeMap<String, Vec<String>>,
}

impl CatalogIndex {
    pub fn build(vehicles: &[Vehicle]) -> Self {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for vehicle in vehicles {
            let models = grouped.entry(vehicle.make.clone()).or_default();
            if !vehicle.model.is_empty() {
                models.insert(vehicle.model.clone());
            }
        }

        Self {
            unique_makes: grouped.keys().cloned().collect(),
            make_to_models: grouped
                .into_iter()
                .map(|(make, models)| (make, models.into_iter().collect()))
                .collect(),
        }
    }

    /// Models for a make, matched case-insensitively
    pub fn models_for(&self, make: &str) -> &[String] {
        self.make_to_models
            .iter()
            .find(|(m, _)| eq_folded(m, make))
            .map(|(_, models)| models.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a model criterion can still match something under `make`
    pub fn accepts_model(&self, make: &str, model: &str) -> bool {
        self.models_for(make)
            .iter()
            .any(|m| contains_folded(m, model))
    }
}

/// A loaded catalog. The index is derived once per load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    vehicles: Vec<Vehicle>,
    index: CatalogIndex,
}

impl Catalog {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        let index = CatalogIndex::build(&vehicles);
        Self { vehicles, index }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetline_shared::{FuelType, Transmission};

    fn vehicle(id: VehicleId, make: &str, model: &str) -> Vehicle {
        Vehicle {
            id,
            make: make.to_string(),
            model: model.to_string(),
            year: 2022,
            price_per_day: 100.0,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Gasoline,
            seats: 5,
            rating: 4.0,
            category: "suv".to_string(),
            photo_gallery: vec![],
            availability: None,
        }
    }

    #[test]
    fn test_index_groups_models() {
        let index = CatalogIndex::build(&[
            vehicle(1, "Mercedes", "GLE"),
            vehicle(2, "Audi", "Q7"),
            vehicle(3, "Mercedes", "C-Class"),
            vehicle(4, "Mercedes", "GLE"),
        ]);

        assert_eq!(index.unique_makes, vec!["Audi", "Mercedes"]);
        assert_eq!(index.models_for("mercedes"), ["C-Class", "GLE"]);
        assert!(index.models_for("Volvo").is_empty());
        assert!(index.accepts_model("Mercedes", "gl"));
        assert!(!index.accepts_model("Audi", "GLE"));
    }

    #[test]
    fn test_non_ascii_make_lookup() {
        let index = CatalogIndex::build(&[vehicle(1, "Škoda", "Octavia"), vehicle(2, "Citroën", "C5")]);

        assert_eq!(index.models_for("ŠKODA"), ["Octavia"]);
        assert_eq!(index.models_for("citroën"), ["C5"]);
        assert!(index.accepts_model("škoda", "octa"));
        assert!(!index.accepts_model("škoda", "C5"));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![vehicle(10, "Audi", "A4"), vehicle(11, "Audi", "Q7")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(11).map(|v| v.model.as_str()), Some("Q7"));
        assert!(catalog.get(99).is_none());
        assert_eq!(catalog.index().unique_makes, vec!["Audi"]);
    }
}
