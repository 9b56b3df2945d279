//! Word bank catalog
//!
//! Display names and declared sizes for the banks the game ships with. The
//! counts are maintained by hand and are not derived from the bank files.

use serde::Serialize;

/// Identifier of the bank selected on first run
pub const DEFAULT_BANK_ID: &str = "words.txt";

/// Catalog metadata for one word bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankInfo {
    /// Identifier stored in configuration (usually the bank file name)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Declared number of words
    pub count: usize,
}

/// Returned for identifiers missing from the catalog
pub const UNKNOWN_BANK: BankInfo = BankInfo { id: "", name: "Unknown bank", count: 0 };

const CATALOG: &[BankInfo] = &[
    BankInfo { id: "words.txt", name: "My word bank (3500 words)", count: 3500 },
    BankInfo { id: "words_basic.txt", name: "Basic vocabulary", count: 100 },
    BankInfo { id: "words_intermediate.txt", name: "Intermediate vocabulary", count: 200 },
    BankInfo { id: "words_advanced.txt", name: "Advanced vocabulary", count: 300 },
    BankInfo { id: "words_exam.txt", name: "Exam essentials", count: 500 },
    BankInfo { id: "words_custom.txt", name: "Custom bank", count: 0 },
    BankInfo { id: "all", name: "All words", count: 4100 },
];

/// All known banks
pub fn catalog() -> &'static [BankInfo] {
    CATALOG
}

/// Resolve a bank identifier, falling back to [`UNKNOWN_BANK`]
pub fn lookup(id: &str) -> BankInfo {
    CATALOG.iter().copied().find(|bank| bank.id == id).unwrap_or(UNKNOWN_BANK)
}
