//! Occupational risk classes and job-title classification

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Occupational risk class, 1 (office) to 4 (hazardous)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OccupationClass {
    Class1,
    Class2,
    Class3,
    Class4,
}

impl OccupationClass {
    pub const ALL: [OccupationClass; 4] = [
        OccupationClass::Class1,
        OccupationClass::Class2,
        OccupationClass::Class3,
        OccupationClass::Class4,
    ];

    /// Zero-based position, used to index loading tables
    pub fn index(&self) -> usize {
        match self {
            OccupationClass::Class1 => 0,
            OccupationClass::Class2 => 1,
            OccupationClass::Class3 => 2,
            OccupationClass::Class4 => 3,
        }
    }

    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Keyword sets per class, scanned in class order
///
/// The first class with any keyword contained in the title wins. Titles
/// matching nothing fall back to class 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OccupationSchemeRaw")]
pub struct OccupationScheme {
    classes: Vec<(OccupationClass, Vec<String>)>,
}

#[derive(Deserialize)]
struct OccupationSchemeRaw {
    classes: Vec<(OccupationClass, Vec<String>)>,
}

impl TryFrom<OccupationSchemeRaw> for OccupationScheme {
    type Error = RatingError;

    fn try_from(raw: OccupationSchemeRaw) -> Result<Self> {
        Self::new(raw.classes)
    }
}

impl OccupationScheme {
    pub fn new(mut classes: Vec<(OccupationClass, Vec<String>)>) -> Result<Self> {
        classes.sort_by_key(|(class, _)| *class);
        for window in classes.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(RatingError::InvalidTable {
                    table: "occupation",
                    reason: format!("class {} listed twice", window[0].0.number()),
                });
            }
        }
        let classes = classes
            .into_iter()
            .map(|(class, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (class, keywords)
            })
            .collect();
        Ok(Self { classes })
    }

    pub fn default_keywords() -> Self {
        fn class(class: OccupationClass, words: &[&str]) -> (OccupationClass, Vec<String>) {
            (class, words.iter().map(|w| w.to_string()).collect())
        }
        Self {
            classes: vec![
                class(OccupationClass::Class1, &[
                    "clerk", "admin", "accountant", "secretary", "receptionist", "cashier",
                    "manager", "analyst", "teacher", "lawyer", "consultant", "banker",
                ]),
                class(OccupationClass::Class2, &[
                    "sales", "supervisor", "technician", "nurse", "pharmacist", "chef",
                    "cook", "storekeeper", "inspector",
                ]),
                class(OccupationClass::Class3, &[
                    "mechanic", "driver", "electrician", "plumber", "carpenter", "welder",
                    "security", "guard", "farmer", "machine operator",
                ]),
                class(OccupationClass::Class4, &[
                    "miner", "construction", "scaffolder", "fisherman", "pilot",
                    "firefighter", "soldier", "police", "blaster", "offshore",
                ]),
            ],
        }
    }

    /// Classify a free-text job title
    pub fn classify(&self, job_title: &str) -> OccupationClass {
        let title = job_title.trim().to_lowercase();
        if title.is_empty() {
            return OccupationClass::Class1;
        }
        self.classes
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| title.contains(k.as_str())))
            .map(|(class, _)| *class)
            .unwrap_or(OccupationClass::Class1)
    }
}

impl Default for OccupationScheme {
    fn default() -> Self {
        Self::default_keywords()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classification() {
        let scheme = OccupationScheme::default_keywords();

        assert_eq!(scheme.classify("Senior Mechanic"), OccupationClass::Class3);
        assert_eq!(scheme.classify("  ACCOUNTS CLERK "), OccupationClass::Class1);
        assert_eq!(scheme.classify("Registered Nurse"), OccupationClass::Class2);
        assert_eq!(scheme.classify("Underground Miner"), OccupationClass::Class4);
    }

    #[test]
    fn test_unmatched_and_empty_default_to_class1() {
        let scheme = OccupationScheme::default_keywords();

        assert_eq!(scheme.classify("Astronaut"), OccupationClass::Class1);
        assert_eq!(scheme.classify(""), OccupationClass::Class1);
        assert_eq!(scheme.classify("   "), OccupationClass::Class1);
    }

    #[test]
    fn test_first_class_wins() {
        // "sales" is class 2 and "driver" class 3; class 2 is scanned first
        let scheme = OccupationScheme::default_keywords();
        assert_eq!(scheme.classify("Sales Driver"), OccupationClass::Class2);
        // manager is class 1 even on a construction site
        assert_eq!(scheme.classify("Construction Manager"), OccupationClass::Class1);
    }

    #[test]
    fn test_custom_scheme_order_is_by_class() {
        let scheme = OccupationScheme::new(vec![
            (OccupationClass::Class4, vec!["diver".to_string()]),
            (OccupationClass::Class2, vec!["Diver".to_string(), "".to_string()]),
        ])
        .unwrap();
        assert_eq!(scheme.classify("Commercial Diver"), OccupationClass::Class2);

        let dup = OccupationScheme::new(vec![
            (OccupationClass::Class2, vec![]),
            (OccupationClass::Class2, vec![]),
        ]);
        assert!(dup.is_err());
    }

    #[test]
    fn test_deserialize_normalises_keywords() {
        let json = r#"{"classes": [["Class4", ["  DIVER "]], ["Class1", ["Clerk"]]]}"#;
        let scheme: OccupationScheme = serde_json::from_str(json).unwrap();
        assert_eq!(scheme.classify("Commercial Diver"), OccupationClass::Class4);
        assert_eq!(scheme.classify("Filing clerk"), OccupationClass::Class1);

        let dup = r#"{"classes": [["Class2", []], ["Class2", ["cook"]]]}"#;
        assert!(serde_json::from_str::<OccupationScheme>(dup).is_err());
    }
}
