//! Filter for the policy dimensions: business type and policy type.

use crate::dimension::Dimension;
use crate::filters::retain_matching;
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;

/// Keeps candidates whose business-type and policy-type predicates
/// cover the query.
///
/// Business_Type carries the one exception to wildcard semantics: a
/// blank cell serves existing business only, never New.
pub struct PolicyFilter {
    snapshot: Arc<RateSnapshot>,
}

impl PolicyFilter {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl EligibilityFilter for PolicyFilter {
    fn name(&self) -> &str {
        "PolicyFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(retain_matching(
            &self.snapshot,
            candidates,
            &[Dimension::BusinessType, Dimension::PolicyType],
            query,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rate_store::{BusinessType, RateRow, RtoRule, VehicleCategory};
    use std::collections::BTreeMap;

    fn row(business: &str, policy: &str) -> RateRow {
        RateRow {
            row_id: 0,
            company: "United India".to_string(),
            state: "TN".to_string(),
            vehicle_category: String::new(),
            vehicle_type: String::new(),
            make: String::new(),
            model: String::new(),
            fuel_type: String::new(),
            cc_slab: String::new(),
            watt_slab: String::new(),
            business_type: business.to_string(),
            policy_type: policy.to_string(),
            rto: RtoRule::applies_to_all(),
            age_min: None,
            age_max: None,
            gvw_min: None,
            gvw_max: None,
            date_from: None,
            date_till: None,
            payout: 18.0,
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

    fn query(business: BusinessType, policy: &str) -> PayoutQuery {
        PayoutQuery::new(
            "TN",
            VehicleCategory::PrivateCar,
            "Sedan",
            business,
            policy,
        )
    }

    #[test]
    fn test_blank_business_excludes_new() {
        let (snapshot, candidates) = setup(vec![row("", "SATP"), row("New", "SATP")]);
        let filter = PolicyFilter::new(snapshot);

        let kept = filter
            .apply(candidates.clone(), &query(BusinessType::New, "SATP"))
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 1);

        let kept = filter
            .apply(candidates.clone(), &query(BusinessType::Rollover, "SATP"))
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);

        let kept = filter
            .apply(candidates, &query(BusinessType::Renewal, "SATP"))
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);
    }

    #[test]
    fn test_policy_comma_list() {
        let (snapshot, candidates) = setup(vec![
            row("", "SATP,SAOD"),
            row("", "Package"),
        ]);
        let filter = PolicyFilter::new(snapshot);

        let kept = filter
            .apply(candidates.clone(), &query(BusinessType::Old, "SAOD"))
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);

        let kept = filter
            .apply(candidates, &query(BusinessType::Old, "Bundle(1+3)"))
            .unwrap();
        assert!(kept.is_empty());
    }
}
