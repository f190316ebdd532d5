use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A geographic market the board operates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metro {
    pub slug: String,
    pub city: String,
    pub state: String,
    pub title: String,
}

/// Lookup of live metros, injected into the intake path rather than held as
/// process-wide state. A slug that is not in the directory means the region
/// is not live: drafts for it are refused and listing reads return not-found.
#[derive(Debug, Clone, Default)]
pub struct MetroDirectory {
    metros: BTreeMap<String, Metro>,
}

impl MetroDirectory {
    pub fn new(metros: impl IntoIterator<Item = Metro>) -> Self {
        Self {
            metros: metros
                .into_iter()
                .map(|metro| (metro.slug.clone(), metro))
                .collect(),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&Metro> {
        self.metros.get(slug)
    }

    pub fn is_live(&self, slug: &str) -> bool {
        self.metros.contains_key(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portland() -> Metro {
        Metro {
            slug: "portland-or".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            title: "Portland Coffee Jobs".to_string(),
        }
    }

    #[test]
    fn lookup_by_slug() {
        let directory = MetroDirectory::new([portland()]);
        assert!(directory.is_live("portland-or"));
        assert_eq!(directory.get("portland-or").map(|m| m.city.as_str()), Some("Portland"));
    }

    #[test]
    fn unknown_slug_is_not_live() {
        let directory = MetroDirectory::new([portland()]);
        assert!(!directory.is_live("seattle-wa"));
        assert!(directory.get("seattle-wa").is_none());
    }
}
