//! # Tax-Slab Aggregator
//!
//! Groups computed lines into tax slabs for the summary block of the
//! document.
//!
//! ```text
//! lines (entry order)                    TaxSlabSummary (first-seen order)
//! ┌──────────────────────────┐           ┌──────────────────────────────────┐
//! │ 7216  9%/9%   200.00     │ ────┐     │ 7216 9/9   count 2   amt 350.00  │
//! │ 9983  2.5/2.5 100.00     │ ──┐ └───► │ 9983 2.5/2.5 count 1 amt 100.00  │
//! │ 7216  9%/9%   150.00     │ ──┼─────► └──────────────────────────────────┘
//! └──────────────────────────┘   └─(second key seen second)
//! ```
//!
//! Two grouping keys are supported:
//! - [`SlabGrouping::HsnAndRate`]: `(hsn_code, cgst%, sgst%)`
//! - [`SlabGrouping::RateOnly`]: `(cgst%, sgst%)`; the slab lists every
//!   distinct HSN code it absorbed

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{InvoiceLine, TaxRate};

/// How lines are keyed into slabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SlabGrouping {
    #[default]
    HsnAndRate,
    RateOnly,
}

/// Grouping key of a slab. `hsn_code` is `None` in rate-only grouping and
/// for lines without a classification code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SlabKey {
    pub hsn_code: Option<String>,
    pub cgst: TaxRate,
    pub sgst: TaxRate,
}

/// Accumulated figures of one slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlab {
    pub key: SlabKey,
    /// Number of lines in the slab.
    pub count: usize,
    pub amount_total: Money,
    pub cgst_total: Money,
    pub sgst_total: Money,
    /// Distinct HSN codes absorbed, first-seen order.
    pub hsn_codes: Vec<String>,
}

impl TaxSlab {
    fn empty(key: SlabKey) -> Self {
        TaxSlab {
            key,
            count: 0,
            amount_total: Money::zero(),
            cgst_total: Money::zero(),
            sgst_total: Money::zero(),
            hsn_codes: Vec::new(),
        }
    }

    fn absorb(&mut self, line: &InvoiceLine) -> CoreResult<()> {
        self.count += 1;
        self.amount_total = self.amount_total.checked_add(line.amount)?;
        self.cgst_total = self.cgst_total.checked_add(line.cgst_amount)?;
        self.sgst_total = self.sgst_total.checked_add(line.sgst_amount)?;
        if let Some(code) = &line.hsn_code {
            if !self.hsn_codes.contains(code) {
                self.hsn_codes.push(code.clone());
            }
        }
        Ok(())
    }

    /// CGST + SGST of the slab.
    pub fn tax_total(&self) -> CoreResult<Money> {
        self.cgst_total.checked_add(self.sgst_total)
    }

    /// Combined rate of the slab.
    pub fn tax_percent(&self) -> TaxRate {
        TaxRate::from_percent(self.key.cgst.percent() + self.key.sgst.percent())
    }
}

/// Ordered slab mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlabSummary {
    pub grouping: SlabGrouping,
    pub slabs: Vec<TaxSlab>,
}

impl TaxSlabSummary {
    /// Aggregates lines in order. Lines are never re-sorted.
    ///
    /// ## Errors
    /// [`crate::CoreError::AmountOverflow`] if a slab sum leaves the `i64`
    /// paise range.
    pub fn aggregate(lines: &[InvoiceLine], grouping: SlabGrouping) -> CoreResult<Self> {
        let mut slabs: Vec<TaxSlab> = Vec::new();
        let mut index: HashMap<SlabKey, usize> = HashMap::new();

        for line in lines {
            let key = SlabKey {
                hsn_code: match grouping {
                    SlabGrouping::HsnAndRate => line.hsn_code.clone(),
                    SlabGrouping::RateOnly => None,
                },
                cgst: line.cgst_percent,
                sgst: line.sgst_percent,
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                slabs.push(TaxSlab::empty(key));
                slabs.len() - 1
            });
            slabs[slot].absorb(line)?;
        }

        Ok(TaxSlabSummary { grouping, slabs })
    }

    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxSlab> {
        self.slabs.iter()
    }

    /// Looks a slab up by key.
    pub fn get(&self, key: &SlabKey) -> Option<&TaxSlab> {
        self.slabs.iter().find(|s| &s.key == key)
    }

    /// Σ amount over all slabs; equals the invoice subtotal.
    pub fn amount_total(&self) -> CoreResult<Money> {
        Money::checked_sum(self.slabs.iter().map(|s| s.amount_total))
    }

    /// Σ CGST + SGST over all slabs.
    pub fn tax_total(&self) -> CoreResult<Money> {
        self.slabs
            .iter()
            .try_fold(Money::zero(), |acc, s| acc.checked_add(s.tax_total()?))
    }
}

impl<'a> IntoIterator for &'a TaxSlabSummary {
    type Item = &'a TaxSlab;
    type IntoIter = std::slice::Iter<'a, TaxSlab>;

    fn into_iter(self) -> Self::IntoIter {
        self.slabs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::tax::compute_line;
    use crate::types::DraftLine;
    use rust_decimal::Decimal;

    fn line(hsn: Option<&str>, rate: i64, pct: i64) -> InvoiceLine {
        let mut draft = DraftLine::new("item", Decimal::from(rate), Decimal::ONE)
            .with_tax_percent(Decimal::from(pct));
        if let Some(code) = hsn {
            draft = draft.with_hsn(code);
        }
        compute_line(&draft).unwrap()
    }

    fn sample() -> Vec<InvoiceLine> {
        vec![
            line(Some("7216"), 200, 18),
            line(Some("9983"), 100, 5),
            line(Some("7217"), 150, 18),
            line(Some("7216"), 50, 18),
        ]
    }

    #[test]
    fn test_hsn_and_rate_keeps_first_seen_order() {
        let summary = TaxSlabSummary::aggregate(&sample(), SlabGrouping::HsnAndRate).unwrap();
        let codes: Vec<_> = summary
            .iter()
            .map(|s| s.key.hsn_code.clone().unwrap())
            .collect();
        assert_eq!(codes, vec!["7216", "9983", "7217"]);

        let first = &summary.slabs[0];
        assert_eq!(first.count, 2);
        assert_eq!(first.amount_total, Money::from_paise(25_000));
        assert_eq!(first.cgst_total, Money::from_paise(2_250));
    }

    #[test]
    fn test_rate_only_merges_codes() {
        let summary = TaxSlabSummary::aggregate(&sample(), SlabGrouping::RateOnly).unwrap();
        assert_eq!(summary.len(), 2);

        let eighteen = &summary.slabs[0];
        assert_eq!(eighteen.tax_percent().to_string(), "18");
        assert_eq!(eighteen.count, 3);
        assert_eq!(eighteen.hsn_codes, vec!["7216", "7217"]);
        assert!(eighteen.key.hsn_code.is_none());
    }

    #[test]
    fn test_sums_match_lines_and_are_idempotent() {
        let lines = sample();
        let subtotal: Money = lines.iter().map(|l| l.amount).sum();
        let tax: Money = lines.iter().map(|l| l.tax_amount().unwrap()).sum();

        for grouping in [SlabGrouping::HsnAndRate, SlabGrouping::RateOnly] {
            let a = TaxSlabSummary::aggregate(&lines, grouping).unwrap();
            let b = TaxSlabSummary::aggregate(&lines, grouping).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.amount_total().unwrap(), subtotal);
            assert_eq!(a.tax_total().unwrap(), tax);
        }
    }

    #[test]
    fn test_lines_without_hsn_share_a_slab() {
        let lines = vec![line(None, 10, 12), line(None, 20, 12)];
        let summary = TaxSlabSummary::aggregate(&lines, SlabGrouping::HsnAndRate).unwrap();
        assert_eq!(summary.len(), 1);
        assert!(summary.slabs[0].hsn_codes.is_empty());
    }

    #[test]
    fn test_empty_lines() {
        let summary = TaxSlabSummary::aggregate(&[], SlabGrouping::default()).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.amount_total().unwrap(), Money::zero());
    }

    #[test]
    fn test_slab_sum_overflow_is_an_error() {
        let mut lines = vec![line(Some("7216"), 200, 18), line(Some("7216"), 50, 18)];
        lines[0].amount = Money::from_paise(i64::MAX);

        let err = TaxSlabSummary::aggregate(&lines, SlabGrouping::HsnAndRate).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));

        let mut lines = vec![line(Some("7216"), 200, 18)];
        lines[0].cgst_amount = Money::from_paise(i64::MAX);
        let summary = TaxSlabSummary::aggregate(&lines, SlabGrouping::HsnAndRate).unwrap();
        assert!(matches!(summary.tax_total(), Err(CoreError::AmountOverflow)));
    }

    #[test]
    fn test_grouping_serde_names() {
        assert_eq!(
            serde_json::to_string(&SlabGrouping::RateOnly).unwrap(),
            "\"rate_only\""
        );
        let g: SlabGrouping = serde_json::from_str("\"hsn_and_rate\"").unwrap();
        assert_eq!(g, SlabGrouping::HsnAndRate);
    }
}
