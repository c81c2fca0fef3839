//! Site and branch aggregation of substitution counts.
//!
//! This module joins the per-node records of [`crate::labeler`] with the
//! pairwise counter of [`crate::pairwise`]:
//! - per-branch/per-site synonymous and non-synonymous tallies
//! - cross-site sums under caller-supplied site filters
//! - evidence-window site selection across several statistical models
//! - codon-to-codon transition flows with cumulative spans, feeding
//!   proportional-span (chord) layouts downstream
//!
//! Evidence values are opaque numbers produced upstream; they are only
//! ever compared against acceptance windows here.

use std::collections::{BTreeMap, HashMap};

use crate::ambiguity::AmbiguityResult;
use crate::genetic_code::GeneticCode;
use crate::labeler::SubstitutionRecord;
use crate::pairwise::{pairwise_counts, PairwiseCounts};

/// Synonymous/non-synonymous tallies for one branch at one site,
/// together with the branch's nucleotide hit count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BranchSiteTally {
    pub synonymous: f64,
    pub non_synonymous: f64,
    pub hit_count: u8,
}

/// Synonymous/non-synonymous totals for one branch across sites.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BranchTotals {
    pub synonymous: f64,
    pub non_synonymous: f64,
}

/// Inclusive acceptance window on a per-site evidence value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvidenceWindow {
    pub lower: f64,
    pub upper: f64,
}

impl EvidenceWindow {
    /// True if `value` lies within the window (bounds included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Per-site evidence values of one statistical model, with the window a
/// site must fall in to be accepted.
#[derive(Debug, Clone)]
pub struct ModelSeries {
    pub values: Vec<f64>,
    pub window: EvidenceWindow,
}

/// Tallies every branch of one labeled site.
///
/// Each non-root record is fed through the pairwise counter as
/// `(parent_codon, codon)` and paired with the branch's hit count.
/// Branches are keyed by child node name.
pub fn tally_branch_site(
    code: &GeneticCode,
    records: &BTreeMap<String, SubstitutionRecord>,
) -> AmbiguityResult<BTreeMap<String, BranchSiteTally>> {
    let mut tallies = BTreeMap::new();

    for (name, record) in records {
        // The root has no branch above it
        if record.parent_codon.is_empty() {
            continue;
        }

        let PairwiseCounts {
            synonymous,
            non_synonymous,
        } = pairwise_counts(code, &record.parent_codon, &record.codon)?;

        tallies.insert(
            name.clone(),
            BranchSiteTally {
                synonymous,
                non_synonymous,
                hit_count: record.hit_count,
            },
        );
    }

    Ok(tallies)
}

/// Sums per-branch tallies over the sites accepted by `filter`.
///
/// `filter` receives the site's index in `per_site`; rejected sites
/// contribute nothing. Branch keys missing from some sites simply skip
/// those sites.
pub fn aggregate_across_sites<F>(
    per_site: &[BTreeMap<String, BranchSiteTally>],
    filter: F,
) -> BTreeMap<String, BranchTotals>
where
    F: Fn(usize) -> bool,
{
    let mut totals: BTreeMap<String, BranchTotals> = BTreeMap::new();

    for (site, tallies) in per_site.iter().enumerate() {
        if !filter(site) {
            continue;
        }

        for (branch, tally) in tallies {
            let entry = totals.entry(branch.clone()).or_default();
            entry.synonymous += tally.synonymous;
            entry.non_synonymous += tally.non_synonymous;
        }
    }

    totals
}

/// Intersects the acceptance windows of several models.
///
/// A site survives only if every model's value at that site lies within
/// that model's window. Sites beyond the shortest series are never
/// accepted, and no models means no selection basis, so the result is
/// empty.
pub fn sites_within_windows(models: &[ModelSeries]) -> Vec<usize> {
    let Some(n_sites) = models.iter().map(|m| m.values.len()).min() else {
        return Vec::new();
    };

    (0..n_sites)
        .filter(|&site| models.iter().all(|m| m.window.contains(m.values[site])))
        .collect()
}

/// Codon-to-codon transition counts with codons kept in the order they
/// were first encountered.
///
/// The encounter order is what downstream proportional-span layouts key
/// on: [`TransitionFlows::spans`] lays the codons out consecutively,
/// each span proportional to the transitions the codon participates in.
#[derive(Debug, Clone, Default)]
pub struct TransitionFlows {
    codons: Vec<String>,
    index_by_codon: HashMap<String, usize>,
    counts: BTreeMap<(usize, usize), u32>,
}

/// One codon's slot in a proportional-span layout: `start..end` in
/// cumulative transition-count units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonSpan {
    pub codon: String,
    pub start: u32,
    pub end: u32,
}

impl TransitionFlows {
    /// Records one observed `source -> target` transition.
    pub fn record(&mut self, source: &str, target: &str) {
        let source = self.register(source);
        let target = self.register(target);
        *self.counts.entry((source, target)).or_insert(0) += 1;
    }

    fn register(&mut self, codon: &str) -> usize {
        if let Some(&index) = self.index_by_codon.get(codon) {
            return index;
        }
        let index = self.codons.len();
        self.codons.push(codon.to_string());
        self.index_by_codon.insert(codon.to_string(), index);
        index
    }

    /// Codons in first-encounter order.
    pub fn codons(&self) -> &[String] {
        &self.codons
    }

    /// Count of `source -> target` transitions.
    pub fn count(&self, source: &str, target: &str) -> u32 {
        let (Some(&s), Some(&t)) = (
            self.index_by_codon.get(source),
            self.index_by_codon.get(target),
        ) else {
            return 0;
        };
        self.counts.get(&(s, t)).copied().unwrap_or(0)
    }

    /// All transitions as `(source, target, count)`.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.counts.iter().map(|(&(s, t), &count)| {
            (self.codons[s].as_str(), self.codons[t].as_str(), count)
        })
    }

    /// Transitions the codon participates in, as source or as target.
    pub fn codon_weight(&self, codon: &str) -> u32 {
        let Some(&index) = self.index_by_codon.get(codon) else {
            return 0;
        };
        self.counts
            .iter()
            .filter(|(&(s, t), _)| s == index || t == index)
            .map(|(_, &count)| count)
            .sum()
    }

    /// Cumulative start/end offsets per codon, in first-encounter order.
    pub fn spans(&self) -> Vec<CodonSpan> {
        let mut start = 0u32;
        self.codons
            .iter()
            .map(|codon| {
                let width = self.codon_weight(codon);
                let span = CodonSpan {
                    codon: codon.clone(),
                    start,
                    end: start + width,
                };
                start += width;
                span
            })
            .collect()
    }

    /// True if no transition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Collects `(parent_codon, codon)` transitions over labeled sites.
///
/// Only branches with `hit_count >= min_hits` contribute; with
/// `min_hits >= 2` this keeps exactly the multi-hit events. Sites and,
/// within a site, branches are visited in deterministic order, so the
/// first-encounter codon order is stable.
pub fn transition_flows<'a, I>(sites: I, min_hits: u8) -> TransitionFlows
where
    I: IntoIterator<Item = &'a BTreeMap<String, SubstitutionRecord>>,
{
    let mut flows = TransitionFlows::default();

    for records in sites {
        for record in records.values() {
            if record.parent_codon.is_empty() {
                continue;
            }
            if record.hit_count >= min_hits {
                flows.record(&record.parent_codon, &record.codon);
            }
        }
    }

    flows
}

/// The network/chord pipeline in one call: keep the sites every model's
/// window accepts, then collect transition flows over branches with at
/// least `min_hits` nucleotide changes.
pub fn chord_flows(
    sites: &[BTreeMap<String, SubstitutionRecord>],
    models: &[ModelSeries],
    min_hits: u8,
) -> TransitionFlows {
    let selected = sites_within_windows(models);
    transition_flows(selected.into_iter().map(|site| &sites[site]), min_hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_code::{GeneticCode, GeneticCodes};
    use crate::labeler::label_site;
    use crate::tree::Tree;
    use std::collections::HashMap;

    fn standard() -> GeneticCode {
        GeneticCodes::new().default_code().clone()
    }

    fn two_leaf_tree() -> Tree {
        let mut tree = Tree::new("root");
        tree.add_child(tree.root(), "A").unwrap();
        tree.add_child(tree.root(), "B").unwrap();
        tree
    }

    fn site_map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn labeled_site(
        tree: &Tree,
        code: &GeneticCode,
        entries: &[(&str, &str)],
    ) -> BTreeMap<String, SubstitutionRecord> {
        label_site(tree, code, &site_map(entries)).unwrap()
    }

    #[test]
    fn test_tally_branch_site_excludes_root() {
        let tree = two_leaf_tree();
        let code = standard();
        let records =
            labeled_site(&tree, &code, &[("root", "TTT"), ("A", "TTC"), ("B", "CTT")]);

        let tallies = tally_branch_site(&code, &records).unwrap();
        assert_eq!(tallies.len(), 2);
        assert!(!tallies.contains_key("root"));

        // TTT -> TTC is synonymous (Phe), TTT -> CTT is not (Phe -> Leu)
        let a = &tallies["A"];
        assert_eq!(a.synonymous, 1.0);
        assert_eq!(a.non_synonymous, 0.0);
        assert_eq!(a.hit_count, 1);

        let b = &tallies["B"];
        assert_eq!(b.synonymous, 0.0);
        assert_eq!(b.non_synonymous, 1.0);
        assert_eq!(b.hit_count, 1);
    }

    #[test]
    fn test_inherited_branches_tally_to_zero() {
        let tree = two_leaf_tree();
        let code = standard();
        let records = labeled_site(&tree, &code, &[("root", "TTT"), ("A", "TTC")]);

        let tallies = tally_branch_site(&code, &records).unwrap();
        assert_eq!(tallies["B"], BranchSiteTally::default());
    }

    #[test]
    fn test_aggregate_across_sites_applies_filter() {
        let tree = two_leaf_tree();
        let code = standard();
        let sites = vec![
            labeled_site(&tree, &code, &[("root", "TTT"), ("A", "TTC")]),
            labeled_site(&tree, &code, &[("root", "TTT"), ("A", "CTT")]),
            labeled_site(&tree, &code, &[("root", "TTT"), ("A", "TTA")]),
        ];
        let per_site: Vec<_> = sites
            .iter()
            .map(|records| tally_branch_site(&code, records).unwrap())
            .collect();

        let all = aggregate_across_sites(&per_site, |_| true);
        assert_eq!(all["A"].synonymous, 1.0);
        assert_eq!(all["A"].non_synonymous, 2.0);

        // Drop the middle site
        let filtered = aggregate_across_sites(&per_site, |site| site != 1);
        assert_eq!(filtered["A"].synonymous, 1.0);
        assert_eq!(filtered["A"].non_synonymous, 1.0);
    }

    #[test]
    fn test_sites_within_windows_intersects_models() {
        let models = [
            ModelSeries {
                values: vec![0.1, 0.9, 0.5, 0.8],
                window: EvidenceWindow {
                    lower: 0.4,
                    upper: 1.0,
                },
            },
            ModelSeries {
                values: vec![1.0, 1.0, 0.0, 1.0],
                window: EvidenceWindow {
                    lower: 0.5,
                    upper: 1.0,
                },
            },
        ];

        // Site 0 fails model 0, site 2 fails model 1
        assert_eq!(sites_within_windows(&models), vec![1, 3]);
    }

    #[test]
    fn test_sites_within_windows_empty_models() {
        assert!(sites_within_windows(&[]).is_empty());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = EvidenceWindow {
            lower: 0.0,
            upper: 1.0,
        };
        assert!(window.contains(0.0));
        assert!(window.contains(1.0));
        assert!(!window.contains(1.0001));
    }

    #[test]
    fn test_transition_flows_respect_min_hits() {
        let tree = two_leaf_tree();
        let code = standard();
        let sites = vec![
            // A: 2 hits, B: 1 hit
            labeled_site(&tree, &code, &[("root", "AAA"), ("A", "AGG"), ("B", "AAG")]),
        ];

        let flows = transition_flows(&sites, 2);
        assert_eq!(flows.count("AAA", "AGG"), 1);
        assert_eq!(flows.count("AAA", "AAG"), 0);
        assert_eq!(flows.codons(), &["AAA".to_string(), "AGG".to_string()]);

        let flows = transition_flows(&sites, 1);
        assert_eq!(flows.count("AAA", "AAG"), 1);
    }

    #[test]
    fn test_transition_flow_counts_accumulate_across_sites() {
        let tree = two_leaf_tree();
        let code = standard();
        let sites = vec![
            labeled_site(&tree, &code, &[("root", "AAA"), ("A", "AGG")]),
            labeled_site(&tree, &code, &[("root", "AAA"), ("A", "AGG")]),
        ];

        let flows = transition_flows(&sites, 2);
        assert_eq!(flows.count("AAA", "AGG"), 2);
    }

    #[test]
    fn test_spans_are_cumulative_in_encounter_order() {
        let mut flows = TransitionFlows::default();
        flows.record("AAA", "AGG");
        flows.record("AAA", "CCC");
        flows.record("AGG", "CCC");

        let spans = flows.spans();
        assert_eq!(spans.len(), 3);
        // First-encounter order: AAA, AGG, CCC
        assert_eq!(spans[0].codon, "AAA");
        assert_eq!(spans[1].codon, "AGG");
        assert_eq!(spans[2].codon, "CCC");

        // AAA participates in 2 transitions, AGG and CCC in 2 each
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 2);
        assert_eq!(spans[1].start, 2);
        assert_eq!(spans[1].end, 4);
        assert_eq!(spans[2].start, 4);
        assert_eq!(spans[2].end, 6);

        // Consecutive spans tile the total
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_chord_flows_pipeline() {
        let tree = two_leaf_tree();
        let code = standard();
        let sites = vec![
            labeled_site(&tree, &code, &[("root", "AAA"), ("A", "AGG")]),
            labeled_site(&tree, &code, &[("root", "AAA"), ("A", "CCA")]),
        ];
        let models = [ModelSeries {
            values: vec![0.9, 0.1],
            window: EvidenceWindow {
                lower: 0.5,
                upper: 1.0,
            },
        }];

        // Site 1 is rejected by the window, so only AAA -> AGG remains
        let flows = chord_flows(&sites, &models, 2);
        assert_eq!(flows.count("AAA", "AGG"), 1);
        assert_eq!(flows.count("AAA", "CCA"), 0);
    }
}
