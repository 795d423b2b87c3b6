//! Conditioning-label catalog for the joint-strength (CIRM) variant.
//!
//! Maps each effect label to an ordered list of candidate conditioning
//! labels (typically the effect's causal parents, loaded from a JSON file)
//! and derives the enumeration of every non-empty subset of that list.
//! The subset count grows as `2^len - 1`, so long lists multiply the
//! construction grid dramatically; loading warns past a threshold.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::errors::CatalogError;

/// Conditioning lists longer than this trigger a warning: the subset
/// enumeration past this point multiplies the parameter grid by >1000x.
const SUBSET_WARN_LEN: usize = 10;

/// Effect label -> ordered conditioning-label list, plus the derived subset
/// enumeration. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ConditioningCatalog {
    lists: FxHashMap<String, Vec<String>>,
    subsets: FxHashMap<String, Vec<Vec<String>>>,
}

impl ConditioningCatalog {
    /// Build from explicit per-effect lists.
    pub fn new(lists: FxHashMap<String, Vec<String>>) -> Self {
        for (effect, list) in &lists {
            if list.len() > SUBSET_WARN_LEN {
                tracing::warn!(
                    effect = effect.as_str(),
                    len = list.len(),
                    subsets = (1u64 << list.len()) - 1,
                    "conditioning list is large; subset enumeration grows exponentially"
                );
            }
        }
        let subsets = lists
            .iter()
            .map(|(effect, list)| (effect.clone(), enumerate_subsets(list)))
            .collect();
        Self { lists, subsets }
    }

    /// Load a JSON object of the shape `{"effect": ["z1", "z2", ...], ...}`.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lists: FxHashMap<String, Vec<String>> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CatalogError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(lists))
    }

    /// The ordered conditioning list for an effect; absent keys behave as an
    /// empty list.
    pub fn list(&self, effect: &str) -> &[String] {
        self.lists.get(effect).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every non-empty subset of the effect's conditioning list, smallest
    /// sizes first, combination order within a size.
    pub fn subsets(&self, effect: &str) -> &[Vec<String>] {
        self.subsets.get(effect).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Effects with a configured list.
    pub fn effects(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Every distinct conditioning label across all lists.
    pub fn all_labels(&self) -> impl Iterator<Item = &str> {
        let mut seen: Vec<&str> = self
            .lists
            .values()
            .flat_map(|list| list.iter().map(String::as_str))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.into_iter()
    }
}

/// All non-empty subsets of `list`, sizes 1..=len, combinations in the order
/// induced by the input list.
fn enumerate_subsets(list: &[String]) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for size in 1..=list.len() {
        combinations(list, size, &mut out);
    }
    out
}

fn combinations(list: &[String], size: usize, out: &mut Vec<Vec<String>>) {
    let n = list.len();
    if size == 0 || size > n {
        return;
    }
    let mut indices: Vec<usize> = (0..size).collect();
    loop {
        out.push(indices.iter().map(|&i| list[i].clone()).collect());

        // Rightmost index that has room to advance.
        let mut i = size;
        while i > 0 && indices[i - 1] == i - 1 + n - size {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        indices[i - 1] += 1;
        for j in i..size {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn catalog(effect: &str, list: &[&str]) -> ConditioningCatalog {
        let mut lists = FxHashMap::default();
        lists.insert(
            effect.to_string(),
            list.iter().map(|s| s.to_string()).collect(),
        );
        ConditioningCatalog::new(lists)
    }

    #[test]
    fn test_subset_enumeration() {
        let cat = catalog("y", &["a", "b", "c"]);
        let subsets = cat.subsets("y");
        assert_eq!(
            subsets,
            &[
                vec!["a".to_string()],
                vec!["b".to_string()],
                vec!["c".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["a".to_string(), "c".to_string()],
                vec!["b".to_string(), "c".to_string()],
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ]
        );
    }

    #[test]
    fn test_subset_count_is_exponential() {
        let cat = catalog("y", &["a", "b", "c", "d", "e"]);
        assert_eq!(cat.subsets("y").len(), 31);
    }

    #[test]
    fn test_missing_effect_is_empty() {
        let cat = catalog("y", &["a"]);
        assert!(cat.list("z").is_empty());
        assert!(cat.subsets("z").is_empty());
    }

    #[test]
    fn test_single_label_list() {
        let cat = catalog("y", &["a"]);
        assert_eq!(cat.subsets("y"), &[vec!["a".to_string()]]);
    }

    #[test]
    fn test_from_json_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"y": ["a", "b"], "z": []}"#).unwrap();
        file.flush().unwrap();

        let cat = ConditioningCatalog::from_json_path(file.path()).unwrap();
        assert_eq!(cat.list("y"), &["a".to_string(), "b".to_string()]);
        assert!(cat.subsets("z").is_empty());
        assert_eq!(cat.subsets("y").len(), 3);
    }

    #[test]
    fn test_malformed_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        let err = ConditioningCatalog::from_json_path(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }
}
