//! # codonmap - Codon Substitution Mapping
//!
//! A pure-computation engine for mapping and classifying codon
//! substitutions on phylogenetic trees. Given reconstructed codon states
//! at the nodes of a tree, one alignment site at a time, it detects how
//! many nucleotide positions changed on each branch, splits each change
//! (including simultaneous multi-nucleotide events) into expected
//! synonymous vs. non-synonymous counts, and aggregates those counts
//! across sites and branches under evidence-based filters.
//!
//! ## Architecture
//!
//! Data flows one way through the modules:
//! - `genetic_code`: NCBI genetic code tables, total over concrete codons
//! - `ambiguity`: IUPAC symbol resolution and canonical codon translation
//! - `pairwise`: mutational-path enumeration and synonymous vs.
//!   non-synonymous classification between two codons
//! - `tree`: immutable arena-based tree topology with stable node names
//! - `labeler`: one pre-order pass labeling every node for one site
//! - `aggregate`: per-branch tallies, cross-site sums, evidence-window
//!   site selection, and codon-transition flows
//!
//! Everything is a pure function of its inputs: no I/O, no shared
//! mutable state, no per-node scratch fields on the tree. Model fitting,
//! ancestral-state reconstruction, and all chart/tree rendering live
//! outside this crate; it consumes reconstructed states and opaque
//! evidence values, and produces the maps the rendering layers draw.

pub mod aggregate;
pub mod ambiguity;
pub mod genetic_code;
pub mod labeler;
pub mod pairwise;
pub mod tree;
