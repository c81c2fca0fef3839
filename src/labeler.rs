//! Per-site substitution labeling over a tree.
//!
//! One pre-order pass assigns every node its codon for the chosen site,
//! the codon's canonical amino-acid label, the parent's codon, and the
//! number of nucleotide positions that changed on the branch above it
//! (the "hit" count). A hit count of 2 or 3 marks a multi-hit event: more
//! than one nucleotide changing on a single branch at one codon.
//!
//! Records are written into a node-name-keyed map, never onto the tree
//! itself, so any number of site passes can run over one shared topology.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::ambiguity::{self, AmbiguityError, INDETERMINATE_LABEL, MISSING_CODON};
use crate::genetic_code::GeneticCode;
use crate::tree::Tree;

/// Errors that can occur while labeling a site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Site map has no entry for the root node '{0}'")]
    MissingRootLabel(String),

    #[error(transparent)]
    Ambiguity(#[from] AmbiguityError),
}

/// Result type for labeling operations.
pub type LabelResult<T> = Result<T, LabelError>;

/// Everything known about one node at one alignment site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRecord {
    /// The node's codon at this site
    pub codon: String,
    /// Canonical amino-acid label of `codon`
    pub amino_acid: String,
    /// The parent's codon; empty for the root
    pub parent_codon: String,
    /// Nucleotide positions changed on the branch above, 0 to 3
    pub hit_count: u8,
    /// True if the node has at least one child
    pub is_internal: bool,
}

/// Labels every node of `tree` for one site.
///
/// `site_map` gives the reconstructed codon for some (not necessarily
/// all) node names. The root's entry is required; its absence would
/// silently corrupt every child's hit count, so it is a contract
/// violation rather than a default. A non-root node absent from the map
/// inherits its parent's codon verbatim with a hit count of 0: no
/// substitution is reconstructed on that branch for this site.
///
/// The returned map holds exactly one record per node, keyed by node
/// name. The tree is not touched.
pub fn label_site(
    tree: &Tree,
    code: &GeneticCode,
    site_map: &HashMap<String, String>,
) -> LabelResult<BTreeMap<String, SubstitutionRecord>> {
    let mut records = BTreeMap::new();
    // Codons addressed by arena index; filled in pre-order, so a node's
    // parent entry always exists when the node is visited.
    let mut codon_by_index: Vec<String> = vec![String::new(); tree.len()];

    for (index, node) in tree.preorder() {
        let observed = site_map.get(node.name()).map(|c| c.to_uppercase());

        let record = match node.parent() {
            None => {
                let codon = observed
                    .ok_or_else(|| LabelError::MissingRootLabel(node.name().to_string()))?;
                SubstitutionRecord {
                    amino_acid: amino_acid_label(code, &codon)?,
                    codon,
                    parent_codon: String::new(),
                    hit_count: 0,
                    is_internal: node.is_internal(),
                }
            }
            Some(parent) => {
                let parent_codon = codon_by_index[parent].clone();
                match observed {
                    Some(codon) => SubstitutionRecord {
                        amino_acid: amino_acid_label(code, &codon)?,
                        hit_count: ambiguity::hamming(&codon, &parent_codon)?,
                        codon,
                        parent_codon,
                        is_internal: node.is_internal(),
                    },
                    // No reconstructed state: inherit the parent codon,
                    // no event on this branch for this site
                    None => SubstitutionRecord {
                        amino_acid: amino_acid_label(code, &parent_codon)?,
                        codon: parent_codon.clone(),
                        parent_codon,
                        hit_count: 0,
                        is_internal: node.is_internal(),
                    },
                }
            }
        };

        codon_by_index[index] = record.codon.clone();
        records.insert(node.name().to_string(), record);
    }

    Ok(records)
}

/// Canonical amino-acid label with the fully-missing codon special-cased
/// upstream of `translate`, as the translation contract requires.
fn amino_acid_label(code: &GeneticCode, codon: &str) -> LabelResult<String> {
    if codon == MISSING_CODON {
        return Ok(INDETERMINATE_LABEL.to_string());
    }
    Ok(ambiguity::translate(code, codon)?)
}
