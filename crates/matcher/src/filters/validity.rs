//! Filter for the numeric and temporal dimensions: vehicle age, GVW
//! and the date-validity window.
//!
//! This filter runs last: range checks are the cheapest to skip when
//! geography has already emptied the set.

use crate::dimension::Dimension;
use crate::filters::retain_matching;
use crate::traits::EligibilityFilter;
use anyhow::Result;
use quote::{Candidate, PayoutQuery};
use rate_store::RateSnapshot;
use std::sync::Arc;

/// Keeps candidates whose age range, GVW range and validity window
/// cover the query.
///
/// ## Algorithm
/// 1. Age is point-in-range: `age_min <= query_age <= age_max`
/// 2. GVW is interval overlap, activated only for GCV 4-wheeler goods
/// 3. Date window: `date_from <= evaluation_date <= date_till`,
///    either end optionally open
pub struct ValidityFilter {
    snapshot: Arc<RateSnapshot>,
}

impl ValidityFilter {
    pub fn new(snapshot: Arc<RateSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl EligibilityFilter for ValidityFilter {
    fn name(&self) -> &str {
        "ValidityFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &PayoutQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(retain_matching(
            &self.snapshot,
            candidates,
            &[Dimension::Age, Dimension::Gvw, Dimension::Validity],
            query,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quote::{GvwRange, VehicleAge};
    use rate_store::{BusinessType, RateRow, RtoRule, VehicleCategory};
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row() -> RateRow {
        RateRow {
            row_id: 0,
            company: "New India".to_string(),
            state: "TN".to_string(),
            vehicle_category: "GCV".to_string(),
            vehicle_type: "4 Wheeler Goods".to_string(),
            make: String::new(),
            model: String::new(),
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
            payout: 35.0,
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

    fn gcv_query() -> PayoutQuery {
        let mut q = PayoutQuery::new(
            "TN",
            VehicleCategory::Gcv,
            "4 Wheeler Goods",
            BusinessType::Old,
            "SATP",
        );
        q.age = VehicleAge::Years(3);
        q
    }

    #[test]
    fn test_age_range() {
        let mut in_range = row();
        in_range.age_min = Some(1);
        in_range.age_max = Some(5);
        let mut out_of_range = row();
        out_of_range.age_min = Some(6);
        out_of_range.age_max = Some(10);

        let (snapshot, candidates) = setup(vec![in_range, out_of_range]);
        let filter = ValidityFilter::new(snapshot);

        let kept = filter.apply(candidates.clone(), &gcv_query()).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);

        let mut older = gcv_query();
        older.age = VehicleAge::Years(6);
        let kept = filter.apply(candidates, &older).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 1);
    }

    #[test]
    fn test_gvw_overlap_for_goods_carrier() {
        let mut r = row();
        r.gvw_min = Some(3.5);
        r.gvw_max = Some(7.5);
        let (snapshot, candidates) = setup(vec![r]);
        let filter = ValidityFilter::new(snapshot);

        let mut query = gcv_query();
        query.gvw = Some(GvwRange::new(7.0, 8.0));
        assert_eq!(filter.apply(candidates.clone(), &query).unwrap().len(), 1);

        query.gvw = Some(GvwRange::new(8.0, 12.0));
        assert!(filter.apply(candidates.clone(), &query).unwrap().is_empty());

        // The same interval poses no constraint outside GCV 4-wheeler
        query.vehicle_type = "3 Wheeler Goods".to_string();
        assert_eq!(filter.apply(candidates, &query).unwrap().len(), 1);
    }

    #[test]
    fn test_date_window() {
        let mut open_ended = row();
        open_ended.date_from = Some(date(2024, 1, 1));
        let mut closed = row();
        closed.date_from = Some(date(2024, 1, 1));
        closed.date_till = Some(date(2024, 6, 30));

        let (snapshot, candidates) = setup(vec![open_ended, closed]);
        let filter = ValidityFilter::new(snapshot);

        let mut query = gcv_query();
        query.evaluation_date = date(2023, 12, 31);
        assert!(filter.apply(candidates.clone(), &query).unwrap().is_empty());

        query.evaluation_date = date(2099, 1, 1);
        let kept = filter.apply(candidates, &query).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row_id, 0);
    }
}
