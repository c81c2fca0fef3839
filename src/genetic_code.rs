//! Genetic code tables.
//!
//! This module provides:
//! - NCBI genetic code tables (1-33)
//! - Total codon to amino acid lookup for the 64 concrete codons
//!
//! The tables are the engine's configuration surface: callers pick a code
//! by NCBI id and pass it to the translation and classification layers.
//! Lookup is total over concrete codons by construction; a miss is a
//! configuration error and fails loudly rather than defaulting.

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by genetic code construction and lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Codon '{0}' is absent from genetic code table")]
    IncompleteTable(String),

    #[error("Genetic code table '{name}' has {len} amino acids, expected 64")]
    MalformedTable { name: String, len: usize },
}

/// Result type for translation table operations.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// A genetic code table mapping each concrete codon to one amino acid.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: String,
    /// Codon to amino acid mapping (64 entries)
    codon_table: HashMap<String, char>,
}

impl GeneticCode {
    /// Builds a genetic code from an NCBI `ncbieaa` string.
    ///
    /// The string lists one amino acid per codon in NCBI order
    /// (TTT, TTC, TTA, TTG, TCT, ...) and must cover all 64 codons.
    fn new(id: u8, name: &str, ncbieaa: &str) -> TranslationResult<Self> {
        if ncbieaa.chars().count() != 64 {
            return Err(TranslationError::MalformedTable {
                name: name.to_string(),
                len: ncbieaa.chars().count(),
            });
        }

        let bases = ['T', 'C', 'A', 'G'];
        let mut codon_table = HashMap::with_capacity(64);
        let mut amino_acids = ncbieaa.chars();

        for &b1 in &bases {
            for &b2 in &bases {
                for &b3 in &bases {
                    let codon: String = [b1, b2, b3].iter().collect();
                    // `amino_acids` yields exactly 64 items, checked above
                    let aa = amino_acids.next().unwrap_or('*');
                    codon_table.insert(codon, aa);
                }
            }
        }

        Ok(Self {
            id,
            name: name.to_string(),
            codon_table,
        })
    }

    /// Looks up the amino acid for one concrete uppercase codon.
    ///
    /// The codon must consist of A/C/G/T only; ambiguity resolution and
    /// gap handling happen upstream (see [`crate::ambiguity`]).
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::IncompleteTable`] if the codon is not
    /// in the table. A missing concrete codon means a misconfigured
    /// table, not ambiguous data, and is never masked with a placeholder.
    pub fn amino_acid(&self, codon: &str) -> TranslationResult<char> {
        self.codon_table
            .get(codon)
            .copied()
            .ok_or_else(|| TranslationError::IncompleteTable(codon.to_string()))
    }
}

/// NCBI genetic codes as (id, name, ncbieaa) triples.
const NCBI_CODES: &[(u8, &str, &str)] = &[
    (
        1,
        "Standard",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        2,
        "Vertebrate Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
    ),
    (
        3,
        "Yeast Mitochondrial",
        "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        4,
        "Mold/Protozoan/Coelenterate Mito...",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        5,
        "Invertebrate Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        6,
        "Ciliate/Dasycladacean/Hexamita Nuclear",
        "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        9,
        "Echinoderm/Flatworm Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        10,
        "Euplotid Nuclear",
        "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        11,
        "Bacterial/Archaeal/Plant Plastid",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        12,
        "Alternative Yeast Nuclear",
        "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        13,
        "Ascidian Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG",
    ),
    (
        14,
        "Alternative Flatworm Mitochondrial",
        "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        15,
        "Blepharisma Macronuclear",
        "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        16,
        "Chlorophycean Mitochondrial",
        "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        21,
        "Trematode Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        22,
        "Scenedesmus obliquus Mitochondrial",
        "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        23,
        "Thraustochytrium Mitochondrial",
        "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        24,
        "Rhabdopleuridae Mitochondrial",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG",
    ),
    (
        25,
        "Candidate Division SR1/Gracilibacteria",
        "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        26,
        "Pachysolen tannophilus Nuclear",
        "FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        27,
        "Karyorelict Nuclear",
        "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        28,
        "Condylostoma Nuclear",
        "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        29,
        "Mesodinium Nuclear",
        "FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        30,
        "Peritrich Nuclear",
        "FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        31,
        "Blastocrithidia Nuclear",
        "FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        32,
        "Balanophoraceae Plastid",
        "FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        33,
        "Cephalodiscidae Mitochondrial",
        "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG",
    ),
];

/// All available genetic codes from NCBI.
pub struct GeneticCodes {
    codes: Vec<GeneticCode>,
}

impl GeneticCodes {
    /// Creates the complete set of NCBI genetic codes.
    pub fn new() -> Self {
        let codes = NCBI_CODES
            .iter()
            .map(|&(id, name, ncbieaa)| {
                GeneticCode::new(id, name, ncbieaa)
                    .expect("built-in NCBI tables cover all 64 codons")
            })
            .collect();

        Self { codes }
    }

    /// Returns all genetic codes.
    pub fn all(&self) -> &[GeneticCode] {
        &self.codes
    }

    /// Gets a genetic code by NCBI ID.
    pub fn get(&self, id: u8) -> Option<&GeneticCode> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// Gets the default (Standard) genetic code.
    pub fn default_code(&self) -> &GeneticCode {
        self.get(1).expect("Standard genetic code should always exist")
    }
}

impl Default for GeneticCodes {
    fn default() -> Self {
        Self::new()
    }
}
