//! Pairwise codon substitution counting.
//!
//! Given an ancestral and a descendant codon, this module enumerates
//! every ordering in which the differing nucleotide positions could have
//! mutated, classifies each single-position step as synonymous or
//! non-synonymous, and averages the per-step classifications over all
//! orderings. Every ordering is treated as equally likely, giving an
//! unweighted path-averaging approximation of the expected
//! synonymous/non-synonymous split along the unknown true path.
//!
//! Synonymy of a step is tested by string equality of the canonical
//! ambiguous translations of the codons before and after the edit, so
//! ambiguous intermediate states are handled the same way as observed
//! ones.

use crate::ambiguity::{self, AmbiguityError, AmbiguityResult, MISSING_CODON};
use crate::genetic_code::GeneticCode;

/// Expected synonymous and non-synonymous substitution counts for one
/// branch at one site.
///
/// Both counts are integer per-ordering sums divided by the number of
/// orderings, so they are exact rationals with denominator 1, 2, or 6;
/// callers accumulate them as floating-point sums across sites and
/// branches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairwiseCounts {
    /// Expected number of synonymous single-nucleotide substitutions
    pub synonymous: f64,
    /// Expected number of non-synonymous single-nucleotide substitutions
    pub non_synonymous: f64,
}

// Codons have exactly 3 positions, so the orderings of 2 or 3 differing
// positions are enumerated explicitly instead of through a generic
// permutation utility. Entries index into the differing-position list.
const ORDERINGS_TWO: [[usize; 2]; 2] = [[0, 1], [1, 0]];
const ORDERINGS_THREE: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Computes expected synonymous/non-synonymous counts between two codons.
///
/// - Either codon equal to `"NNN"` contributes nothing: missing data is
///   never classified.
/// - Identical codons yield `(0, 0)`.
/// - A single differing position is classified directly from the two
///   translations, short-circuiting the ordering machinery.
/// - Two or three differing positions are averaged over all 2 or 6
///   mutational orderings.
///
/// The counts always sum to the number of differing positions.
pub fn pairwise_counts(
    code: &GeneticCode,
    from: &str,
    to: &str,
) -> AmbiguityResult<PairwiseCounts> {
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    if from == MISSING_CODON || to == MISSING_CODON {
        return Ok(PairwiseCounts::default());
    }

    let source = codon_chars(&from)?;
    let target = codon_chars(&to)?;

    let mut diffs = [0usize; 3];
    let mut n_diffs = 0;
    for i in 0..3 {
        if source[i] != target[i] {
            diffs[n_diffs] = i;
            n_diffs += 1;
        }
    }

    match n_diffs {
        0 => Ok(PairwiseCounts::default()),
        1 => {
            let before = ambiguity::translate(code, &from)?;
            let after = ambiguity::translate(code, &to)?;
            if before == after {
                Ok(PairwiseCounts {
                    synonymous: 1.0,
                    non_synonymous: 0.0,
                })
            } else {
                Ok(PairwiseCounts {
                    synonymous: 0.0,
                    non_synonymous: 1.0,
                })
            }
        }
        2 => average_over_orderings(
            code,
            source,
            target,
            &diffs[..2],
            ORDERINGS_TWO.iter().map(|o| o.as_slice()),
        ),
        _ => average_over_orderings(
            code,
            source,
            target,
            &diffs[..3],
            ORDERINGS_THREE.iter().map(|o| o.as_slice()),
        ),
    }
}

/// Walks every ordering of the differing positions, classifying each
/// single-position edit, and divides the summed step counts by the
/// ordering count.
fn average_over_orderings<'a>(
    code: &GeneticCode,
    source: [char; 3],
    target: [char; 3],
    diffs: &[usize],
    orderings: impl Iterator<Item = &'a [usize]>,
) -> AmbiguityResult<PairwiseCounts> {
    let mut syn_sum = 0u32;
    let mut nonsyn_sum = 0u32;
    let mut n_orderings = 0u32;

    for ordering in orderings {
        n_orderings += 1;
        let mut current = source;
        let mut before = ambiguity::translate(code, &String::from_iter(current))?;

        for &step in ordering {
            let pos = diffs[step];
            current[pos] = target[pos];
            let after = ambiguity::translate(code, &String::from_iter(current))?;

            if before == after {
                syn_sum += 1;
            } else {
                nonsyn_sum += 1;
            }
            before = after;
        }
    }

    Ok(PairwiseCounts {
        synonymous: f64::from(syn_sum) / f64::from(n_orderings),
        non_synonymous: f64::from(nonsyn_sum) / f64::from(n_orderings),
    })
}

fn codon_chars(codon: &str) -> AmbiguityResult<[char; 3]> {
    let mut chars = codon.chars();
    let (Some(c1), Some(c2), Some(c3), None) =
        (chars.next(), chars.next(), chars.next(), chars.next())
    else {
        return Err(AmbiguityError::MalformedCodon(codon.to_string()));
    };

    Ok([c1, c2, c3])
}
