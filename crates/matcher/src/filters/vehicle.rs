//! Filter for the vehicle dimensions: category, type, make and model.

use crate::dimension::Dimension;
use crate::filters::retain_matching;
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;

/// Keeps candidates whose vehicle predicates cover the query.
///
/// Make and model only constrain categories that collect them; the
/// excluded sub-types (flatbed GCV, PCV buses) skip both entirely.
pub struct VehicleFilter {
    snapshot: Arc<RateSnapshot>,
}

impl VehicleFilter {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl EligibilityFilter for VehicleFilter {
    fn name(&self) -> &str {
        "VehicleFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(retain_matching(
            &self.snapshot,
            candidates,
            &[
                Dimension::Category,
                Dimension::VehicleType,
                Dimension::Make,
                Dimension::Model,
            ],
            query,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::VehicleAge;
    use rate_store::{BusinessType, RateRow, RtoRule, VehicleCategory};
    use std::collections::BTreeMap;

    fn row(category: &str, vehicle_type: &str, make: &str, model: &str) -> RateRow {
        RateRow {
            row_id: 0,
            company: "Royal Sundaram".to_string(),
            state: "TN".to_string(),
            vehicle_category: category.to_string(),
            vehicle_type: vehicle_type.to_string(),
            make: make.to_string(),
            model: model.to_string(),
            fuel_type: String::new(),
            cc_slab: String::new(),
            watt_slab: String::new(),
            business_type: String::new(),
            policy_type: String::new(),
            rto: RtoRule::applies_to_all(),
            age_min: None,
            age_max: None,
            gvw_min: None,
            gvw_max: None,
            date_from: None,
            date_till: None,
            payout: 30.0,
            condition: String::new(),
            rank_override: None,
            extras: BTreeMap::new(),
        }
    }

    fn setup(rows: Vec<RateRow>) -> (Arc<RateSnapshot>, Vec<Candidate>) {
        let mut snapshot = RateSnapshot::new();
        for r in rows {
            snapshot.insert_row(r);
        }
        snapshot.finalize();
        let candidates = snapshot
            .rows()
            .iter()
            .map(|r| Candidate::new(r.row_id, r.payout))
            .collect();
        (Arc::new(snapshot), candidates)
    }

    #[test]
    fn test_category_and_type() {
        let (snapshot, candidates) = setup(vec![
            row("Private Car", "Sedan", "", ""),
            row("Private Car", "Hatchback", "", ""),
            row("GCV", "Sedan", "", ""),
        ]);

        let query = PayoutQuery::new(
            "TN",
            VehicleCategory::PrivateCar,
            "Sedan",
            BusinessType::Old,
            "Package",
        );

        let filter = VehicleFilter::new(snapshot);
        let kept = filter.apply(candidates, &query).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);
    }

    #[test]
    fn test_model_exclusion_list() {
        let (snapshot, candidates) = setup(vec![
            row("Private Car", "Sedan", "Mahindra", "Except Bolero,Scorpio"),
        ]);

        let mut query = PayoutQuery::new(
            "TN",
            VehicleCategory::PrivateCar,
            "Sedan",
            BusinessType::Old,
            "Package",
        );
        query.make = Some("Mahindra".to_string());
        query.age = VehicleAge::Years(2);

        let filter = VehicleFilter::new(snapshot);

        query.model = Some("XUV500".to_string());
        let kept = filter.apply(candidates.clone(), &query).unwrap();
        assert_eq!(kept.len(), 1);

        query.model = Some("scorpio".to_string());
        let kept = filter.apply(candidates, &query).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_make_ignored_for_pcv_buses() {
        // Row restricted to Tata: a bus query never reaches the make
        // predicate, so the restriction does not apply
        let (snapshot, candidates) =
            setup(vec![row("PCV", "Educational Bus", "Tata", "")]);

        let mut query = PayoutQuery::new(
            "TN",
            VehicleCategory::Pcv,
            "Educational Bus",
            BusinessType::Old,
            "SATP",
        );
        query.make = Some("Ashok Leyland".to_string());

        let filter = VehicleFilter::new(snapshot);
        let kept = filter.apply(candidates, &query).unwrap();
        assert_eq!(kept.len(), 1);
    }
}
