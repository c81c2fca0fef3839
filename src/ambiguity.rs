//! IUPAC ambiguity resolution and canonical codon translation.
//!
//! This module handles everything between raw codon strings and the
//! concrete-codon lookup of [`crate::genetic_code`]:
//! - IUPAC nucleotide symbol to concrete-base set resolution
//! - Canonical translation of possibly ambiguous codons
//! - Hamming distance ignoring gap/missing positions
//!
//! ## Canonical translation
//!
//! An ambiguous codon translates to the sorted, de-duplicated
//! concatenation of every amino acid reachable by resolving each position
//! independently. The canonical form makes synonymy testing plain string
//! equality regardless of the order resolutions are enumerated in.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::genetic_code::{GeneticCode, TranslationError};

/// Codon sentinel for fully missing data, excluded from analysis.
pub const MISSING_CODON: &str = "NNN";

/// Codon sentinel for an alignment gap.
pub const GAP_CODON: &str = "---";

/// Translation of the gap codon.
pub const GAP_LABEL: &str = "-";

/// Translation of a codon with an empty resolution set.
pub const INDETERMINATE_LABEL: &str = "?";

/// Errors that can occur during ambiguity resolution and translation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmbiguityError {
    #[error("Unrecognized nucleotide symbol '{0}'")]
    InvalidSymbol(char),

    #[error("Codon '{0}' does not have exactly 3 positions")]
    MalformedCodon(String),

    #[error("Translation table error: {0}")]
    Table(#[from] TranslationError),
}

/// Result type for ambiguity operations.
pub type AmbiguityResult<T> = Result<T, AmbiguityError>;

/// Resolves one IUPAC nucleotide symbol to its concrete-base set.
///
/// Case-insensitive; `U` is an alias of `T`, `?` of `N`. The gap symbol
/// `-` resolves to the empty set, so gapped positions never translate
/// definitively.
///
/// # Errors
///
/// Returns [`AmbiguityError::InvalidSymbol`] for any character outside
/// the 15 recognized IUPAC codes (plus `U`, `?`, and `-`); nothing is
/// ever defaulted to an arbitrary base.
pub fn resolve(symbol: char) -> AmbiguityResult<&'static str> {
    match symbol.to_ascii_uppercase() {
        'A' => Ok("A"),
        'C' => Ok("C"),
        'G' => Ok("G"),
        'T' | 'U' => Ok("T"),
        'R' => Ok("AG"),
        'Y' => Ok("CT"),
        'S' => Ok("CG"),
        'W' => Ok("AT"),
        'K' => Ok("GT"),
        'M' => Ok("AC"),
        'B' => Ok("CGT"),
        'D' => Ok("AGT"),
        'H' => Ok("ACT"),
        'V' => Ok("ACG"),
        'N' | '?' => Ok("ACGT"),
        '-' => Ok(""),
        _ => Err(AmbiguityError::InvalidSymbol(symbol)),
    }
}

/// Translates a codon to its canonical amino-acid label.
///
/// # Rules
///
/// - `"---"` translates to the gap label `"-"`
/// - A fully unambiguous codon translates to its single amino acid
/// - An ambiguous codon translates to the sorted, de-duplicated
///   concatenation of all reachable amino acids
/// - Any position with an empty resolution set (a gap mixed into the
///   codon) yields the indeterminate label `"?"`
///
/// The result depends only on the codon and the table, never on
/// enumeration order.
pub fn translate(code: &GeneticCode, codon: &str) -> AmbiguityResult<String> {
    if codon == GAP_CODON {
        return Ok(GAP_LABEL.to_string());
    }

    let sets = position_sets(codon)?;
    if sets.iter().any(|s| s.is_empty()) {
        return Ok(INDETERMINATE_LABEL.to_string());
    }

    if sets.iter().all(|s| s.len() == 1) {
        let concrete: String = sets.iter().flat_map(|s| s.chars()).collect();
        let aa = code.amino_acid(&concrete)?;
        return Ok(aa.to_string());
    }

    // BTreeSet gives the sorted, de-duplicated canonical form directly
    let mut reachable = BTreeSet::new();
    for b1 in sets[0].chars() {
        for b2 in sets[1].chars() {
            for b3 in sets[2].chars() {
                let concrete: String = [b1, b2, b3].iter().collect();
                reachable.insert(code.amino_acid(&concrete)?);
            }
        }
    }

    Ok(reachable.into_iter().collect())
}

/// Counts positions at which two codons differ, ignoring any position
/// where either side is a gap or missing symbol.
///
/// Comparison is case-insensitive. Used for per-branch nucleotide
/// "hit" counts, so gap and missing data never register as changes.
pub fn hamming(a: &str, b: &str) -> AmbiguityResult<u8> {
    if a.chars().count() != 3 {
        return Err(AmbiguityError::MalformedCodon(a.to_string()));
    }
    if b.chars().count() != 3 {
        return Err(AmbiguityError::MalformedCodon(b.to_string()));
    }

    let count = a
        .chars()
        .zip(b.chars())
        .filter(|&(x, y)| {
            !x.eq_ignore_ascii_case(&y) && !is_gap_or_missing(x) && !is_gap_or_missing(y)
        })
        .count();

    Ok(count as u8)
}

/// True for symbols that never count as an observed nucleotide change.
pub fn is_gap_or_missing(symbol: char) -> bool {
    matches!(symbol.to_ascii_uppercase(), '-' | 'N' | '?')
}

/// Resolves all three positions of a codon.
fn position_sets(codon: &str) -> AmbiguityResult<[&'static str; 3]> {
    let mut chars = codon.chars();
    let (Some(c1), Some(c2), Some(c3), None) =
        (chars.next(), chars.next(), chars.next(), chars.next())
    else {
        return Err(AmbiguityError::MalformedCodon(codon.to_string()));
    };

    Ok([resolve(c1)?, resolve(c2)?, resolve(c3)?])
}
