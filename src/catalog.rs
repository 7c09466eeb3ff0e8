//! Fixed catalog of work-function names.
//!
//! The catalog is the domain for `work_logs.function` and the key set for
//! every aggregation table. It is not extensible at runtime.

pub const FUNCTIONS: [&str; 17] = [
    "VI 3D Scan Pro",
    "VI 3D Desktop Pro",
    "Full Review",
    "Full Revision",
    "Short Review",
    "Short Revision",
    "VI Second Review",
    "Digital Operations - Sourcing",
    "Full Reports",
    "QCF (Underwriter Queue)",
    "Full Review (CI Abridged)",
    "CMP Client Import",
    "Text Followup",
    "ACR",
    "DNU Checklist Update",
    "PDC Compliance",
    "Meetings/Training",
];

/// Chart column kept for output-shape compatibility; never incremented.
pub const TOTAL_HOURS_COLUMN: &str = "Total Hours";

#[must_use]
pub fn contains(function: &str) -> bool {
    FUNCTIONS.contains(&function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_uniqueness() {
        let unique: std::collections::BTreeSet<_> = FUNCTIONS.iter().collect();
        assert_eq!(FUNCTIONS.len(), 17);
        assert_eq!(unique.len(), FUNCTIONS.len());
    }

    #[test]
    fn test_membership() {
        assert!(contains("Full Review"));
        assert!(contains("Meetings/Training"));
        assert!(!contains("full review"));
        assert!(!contains(TOTAL_HOURS_COLUMN));
        assert!(!contains(""));
    }
}
