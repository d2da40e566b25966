//! OD/TP co-display pairing for the pan-India insurers.
//!
//! The four nationalized insurers publish their own-damage and
//! third-party commission as separate rows. When both survive
//! eligibility, the POSP must see them side by side under one rank
//! instead of the TP row sliding down the table on its lower payout.
//!
//! Pairing only ever joins rows into a shared unit; it never drops a
//! row, and it never applies to any company outside the allow-list.

use rate_store::RateRow;
use std::collections::{HashMap, HashSet};

/// The fixed allow-list subject to the OD/TP co-display rule.
pub const PAN_INDIA_INSURERS: [&str; 4] = [
    "National Insurance",
    "New India",
    "Oriental Insurance",
    "United India",
];

/// Commission basis read from the free-text condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionKind {
    OwnDamage,
    ThirdParty,
}

/// Classify a condition text; `None` for general conditions.
pub fn commission_kind(condition: &str) -> Option<CommissionKind> {
    let low = condition.to_lowercase();
    if low.contains("commission on od") {
        Some(CommissionKind::OwnDamage)
    } else if low.contains("commission on tp") {
        Some(CommissionKind::ThirdParty)
    } else {
        None
    }
}

/// One display unit: a single row, or a paired OD/TP couple.
///
/// The primary row (index 0) holds the unit's position in the sorted
/// sequence and supplies its rank.
#[derive(Debug)]
pub struct Unit<'a> {
    pub rows: Vec<&'a RateRow>,
}

impl<'a> Unit<'a> {
    pub fn primary(&self) -> &'a RateRow {
        self.rows[0]
    }
}

/// The pairing post-processing rule.
#[derive(Debug, Clone)]
pub struct PairingRule {
    /// Lower-cased company names the rule governs
    companies: Vec<String>,
}

impl Default for PairingRule {
    fn default() -> Self {
        Self::new(PAN_INDIA_INSURERS)
    }
}

impl PairingRule {
    pub fn new<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            companies: companies
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Is this company governed by the co-display rule?
    pub fn applies_to(&self, company: &str) -> bool {
        let key = company.trim().to_lowercase();
        self.companies.iter().any(|c| *c == key)
    }

    /// Fold a payout-sorted row sequence into display units.
    ///
    /// For each governed company with both an OD row and a distinct TP
    /// row, the best of each are joined into one unit at the better
    /// position. Everything else passes through one row per unit.
    pub fn pair<'a>(&self, sorted: &[&'a RateRow]) -> Vec<Unit<'a>> {
        // Best OD / best TP position per governed company. The input is
        // payout-descending, so the first hit is the best one.
        let mut best_od: HashMap<String, usize> = HashMap::new();
        let mut best_tp: HashMap<String, usize> = HashMap::new();
        for (pos, row) in sorted.iter().enumerate() {
            if !self.applies_to(&row.company) {
                continue;
            }
            let key = row.company.trim().to_lowercase();
            match commission_kind(&row.condition) {
                Some(CommissionKind::OwnDamage) => {
                    best_od.entry(key).or_insert(pos);
                }
                Some(CommissionKind::ThirdParty) => {
                    best_tp.entry(key).or_insert(pos);
                }
                None => {}
            }
        }

        let mut partner_of: HashMap<usize, usize> = HashMap::new();
        let mut consumed: HashSet<usize> = HashSet::new();
        for (company, &od) in &best_od {
            if let Some(&tp) = best_tp.get(company) {
                if od != tp {
                    let (keep, partner) = if od < tp { (od, tp) } else { (tp, od) };
                    partner_of.insert(keep, partner);
                    consumed.insert(partner);
                }
            }
        }

        let mut units = Vec::new();
        for (pos, row) in sorted.iter().enumerate() {
            if consumed.contains(&pos) {
                continue;
            }
            let mut rows = vec![*row];
            if let Some(&partner) = partner_of.get(&pos) {
                rows.push(sorted[partner]);
            }
            units.push(Unit { rows });
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rate_store::RtoRule;
    use std::collections::BTreeMap;

    fn row(id: u32, company: &str, condition: &str, payout: f64) -> RateRow {
        RateRow {
            row_id: id,
            company: company.to_string(),
            state: String::new(),
            vehicle_category: String::new(),
            vehicle_type: String::new(),
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
            payout,
            condition: condition.to_string(),
            rank_override: None,
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn test_commission_kind() {
        assert_eq!(
            commission_kind("Commission on OD"),
            Some(CommissionKind::OwnDamage)
        );
        assert_eq!(
            commission_kind("commission on tp only"),
            Some(CommissionKind::ThirdParty)
        );
        assert_eq!(commission_kind("Excluding NCB"), None);
        assert_eq!(commission_kind(""), None);
    }

    #[test]
    fn test_pan_india_pair_shares_one_unit() {
        let od = row(0, "National Insurance", "Commission on OD", 30.0);
        let tp = row(1, "National Insurance", "Commission on TP", 10.0);
        let other = row(2, "Shriram", "", 20.0);
        let sorted = vec![&od, &other, &tp]; // payout desc

        let units = PairingRule::default().pair(&sorted);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].rows.len(), 2);
        assert_eq!(units[0].primary().row_id, 0);
        assert_eq!(units[0].rows[1].row_id, 1);
        assert_eq!(units[1].primary().row_id, 2);
    }

    #[test]
    fn test_rule_is_allow_list_only() {
        let od = row(0, "Shriram", "Commission on OD", 30.0);
        let tp = row(1, "Shriram", "Commission on TP", 10.0);
        let sorted = vec![&od, &tp];

        let units = PairingRule::default().pair(&sorted);
        // Both rows still shown, just as separate units
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].rows.len(), 1);
        assert_eq!(units[1].rows.len(), 1);
    }

    #[test]
    fn test_best_of_each_kind_is_paired() {
        let od_best = row(0, "United India", "Commission on OD", 32.0);
        let od_worse = row(1, "United India", "Commission on OD", 28.0);
        let tp_best = row(2, "United India", "Commission on TP", 12.0);
        let tp_worse = row(3, "United India", "Commission on TP", 8.0);
        let sorted = vec![&od_best, &od_worse, &tp_best, &tp_worse];

        let units = PairingRule::default().pair(&sorted);
        // Pair = best OD + best TP; the rest keep their own units
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].rows.len(), 2);
        assert_eq!(units[0].rows[0].row_id, 0);
        assert_eq!(units[0].rows[1].row_id, 2);
        assert_eq!(units[1].primary().row_id, 1);
        assert_eq!(units[2].primary().row_id, 3);
    }

    #[test]
    fn test_single_kind_is_not_paired() {
        let od = row(0, "Oriental Insurance", "Commission on OD", 30.0);
        let general = row(1, "Oriental Insurance", "Flat", 20.0);
        let sorted = vec![&od, &general];

        let units = PairingRule::default().pair(&sorted);
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.rows.len() == 1));
    }
}
