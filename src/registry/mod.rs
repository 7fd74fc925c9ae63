//! Function registry
//!
//! Deduplicated, categorized index of the expression language's functions.
//! It is built once from the engine's environment ([`FunctionRegistry::load`])
//! and may be grown at runtime from plain-text suggestions
//! ([`FunctionRegistry::supplement`]). Every operation is total.

mod metadata;

use std::collections::BTreeMap;

use tracing::{debug, trace};

pub use metadata::{DEFAULT_CATEGORY, FunctionMetadata};

/// Fixed display order of the well-known categories
pub const CATEGORY_ORDER: [&str; 9] = [
    "conversion",
    "string",
    "list",
    "map",
    "math",
    "encoding",
    "datetime",
    "regex",
    "general",
];

/// Registry of function metadata, unique by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    /// Entries keyed by name
    entries: BTreeMap<String, FunctionMetadata>,
    /// Categories outside [`CATEGORY_ORDER`], in first-seen order
    extra_categories: Vec<String>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry loaded with `functions`
    pub fn with_functions(functions: impl IntoIterator<Item = FunctionMetadata>) -> Self {
        let mut registry = Self::new();
        registry.load(functions);
        registry
    }

    /// Rebuild the registry from scratch.
    ///
    /// Duplicate names keep the richer entry: more examples wins, then the
    /// longer description, then the first one seen.
    pub fn load(&mut self, functions: impl IntoIterator<Item = FunctionMetadata>) {
        self.entries.clear();
        self.extra_categories.clear();

        let mut seen = 0usize;
        for mut function in functions {
            seen += 1;
            if function.category.trim().is_empty() {
                function.category = DEFAULT_CATEGORY.to_string();
            }

            let replace = match self.entries.get(&function.name) {
                Some(existing) => function.is_richer_than(existing),
                None => true,
            };
            if replace {
                self.note_category(&function.category);
                self.entries.insert(function.name.clone(), function);
            } else {
                trace!(name = %function.name, "keeping richer duplicate");
            }
        }
        // a replaced entry may have been the only user of an extra category
        self.prune_categories();

        debug!(
            loaded = seen,
            unique = self.entries.len(),
            "function registry rebuilt"
        );
    }

    /// Merge plain-text suggestions of the form `"name(args) - description"`.
    ///
    /// Entries that already carry a non-empty description are never touched.
    /// New names are added to the `general` category.
    pub fn supplement<S: AsRef<str>>(&mut self, suggestions: &[S]) {
        for suggestion in suggestions {
            let Some((name, signature, description)) = parse_suggestion(suggestion.as_ref())
            else {
                continue;
            };

            match self.entries.get_mut(&name) {
                Some(existing) if !existing.description.trim().is_empty() => {
                    trace!(%name, "suggestion skipped, richer entry exists");
                }
                Some(existing) => {
                    existing.description = description;
                    if existing.signature.trim().is_empty() {
                        existing.signature = signature;
                    }
                }
                None => {
                    let function = FunctionMetadata::new(name.clone(), signature, description)
                        .category(DEFAULT_CATEGORY);
                    self.entries.insert(name, function);
                }
            }
        }
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionMetadata> {
        self.entries.get(name)
    }

    /// Number of unique functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All functions, alphabetical
    pub fn all(&self) -> impl Iterator<Item = &FunctionMetadata> {
        self.entries.values()
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// An empty query returns every function. Results are alphabetical.
    pub fn search(&self, query: &str) -> Vec<&FunctionMetadata> {
        let needle = query.trim().to_lowercase();
        self.entries
            .values()
            .filter(|f| {
                needle.is_empty()
                    || f.name.to_lowercase().contains(&needle)
                    || f.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Functions called with receiver syntax
    pub fn methods(&self) -> Vec<&FunctionMetadata> {
        self.entries.values().filter(|f| f.is_method).collect()
    }

    /// Functions called with global syntax
    pub fn globals(&self) -> Vec<&FunctionMetadata> {
        self.entries.values().filter(|f| !f.is_method).collect()
    }

    /// Category names in display order, only those with at least one entry
    pub fn category_names(&self) -> Vec<String> {
        let present = |name: &str| {
            self.entries
                .values()
                .any(|f| f.category_or_default() == name)
        };

        let mut names: Vec<String> = CATEGORY_ORDER
            .iter()
            .filter(|c| present(c))
            .map(|c| c.to_string())
            .collect();
        for extra in &self.extra_categories {
            if present(extra) {
                names.push(extra.clone());
            }
        }
        // categories introduced only via direct edits are appended alphabetically
        let mut unseen: Vec<String> = self
            .entries
            .values()
            .map(|f| f.category_or_default().to_string())
            .filter(|c| !names.contains(c))
            .collect();
        unseen.sort();
        unseen.dedup();
        names.extend(unseen);
        names
    }

    /// Functions grouped by category, groups in display order
    pub fn categories(&self) -> Vec<(String, Vec<&FunctionMetadata>)> {
        self.category_names()
            .into_iter()
            .map(|category| {
                let functions = self
                    .entries
                    .values()
                    .filter(|f| f.category_or_default() == category)
                    .collect();
                (category, functions)
            })
            .collect()
    }

    fn note_category(&mut self, category: &str) {
        if !CATEGORY_ORDER.contains(&category)
            && !self.extra_categories.iter().any(|c| c == category)
        {
            self.extra_categories.push(category.to_string());
        }
    }

    fn prune_categories(&mut self) {
        let entries = &self.entries;
        self.extra_categories
            .retain(|c| entries.values().any(|f| &f.category == c));
    }
}

/// Split `"name(args) - description"` into (name, signature, description)
fn parse_suggestion(suggestion: &str) -> Option<(String, String, String)> {
    let (signature, description) = match suggestion.split_once(" - ") {
        Some((sig, desc)) => (sig.trim(), desc.trim()),
        None => (suggestion.trim(), ""),
    };
    let name = signature
        .split('(')
        .next()
        .unwrap_or(signature)
        .trim();
    if name.is_empty() {
        return None;
    }
    Some((
        name.to_string(),
        signature.to_string(),
        description.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_rich() -> FunctionMetadata {
        FunctionMetadata::new(
            "filter",
            "list.filter(x, pred) -> list",
            "Keep the elements for which the predicate holds",
        )
        .category("list")
        .method()
        .example("[1, 2, 3].filter(x, x > 1)")
    }

    fn sample() -> Vec<FunctionMetadata> {
        vec![
            filter_rich(),
            FunctionMetadata::new("size", "size(x) -> int", "Length of a container").category("list"),
            FunctionMetadata::new("int", "int(x) -> int", "Convert to int").category("conversion"),
            FunctionMetadata::new("sha", "sha(x) -> string", "Digest").category("crypto"),
            FunctionMetadata::new("misc", "misc()", "Uncategorized"),
        ]
    }

    #[test]
    fn test_load_defaults_category() {
        let registry = FunctionRegistry::with_functions(sample());
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("misc").unwrap().category, "general");
    }

    #[test]
    fn test_load_is_idempotent() {
        let mut registry = FunctionRegistry::with_functions(sample());
        let first: Vec<FunctionMetadata> = registry.all().cloned().collect();
        registry.load(sample());
        let second: Vec<FunctionMetadata> = registry.all().cloned().collect();
        assert_eq!(registry.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dedup_prefers_more_examples_then_longer_description() {
        let poor = FunctionMetadata::new("filter", "filter", "short");
        let registry = FunctionRegistry::with_functions(vec![poor.clone(), filter_rich()]);
        assert_eq!(registry.get("filter").unwrap().examples.len(), 1);

        let longer = FunctionMetadata::new("filter", "filter", "a much longer description");
        let registry = FunctionRegistry::with_functions(vec![poor, longer.clone()]);
        assert_eq!(registry.get("filter").unwrap(), &longer.category("general"));
    }

    #[test]
    fn test_supplement_never_downgrades() {
        let mut registry = FunctionRegistry::with_functions(sample());
        registry.supplement(&["filter(x, cond) - weak"]);
        assert_eq!(
            registry.get("filter").unwrap().description,
            "Keep the elements for which the predicate holds"
        );
    }

    #[test]
    fn test_supplement_adds_and_enriches() {
        let mut registry = FunctionRegistry::with_functions(vec![
            FunctionMetadata::new("blank", "", "").category("string"),
        ]);
        registry.supplement(&[
            "reverse(list) - Reverse a list",
            "blank(s) - Now documented",
            "noparens - Bare name",
        ]);

        let reverse = registry.get("reverse").unwrap();
        assert_eq!(reverse.signature, "reverse(list)");
        assert_eq!(reverse.category, "general");

        let blank = registry.get("blank").unwrap();
        assert_eq!(blank.description, "Now documented");
        assert_eq!(blank.category, "string");

        assert!(registry.get("noparens").is_some());
    }

    #[test]
    fn test_search() {
        let registry = FunctionRegistry::with_functions(sample());
        let names = |found: Vec<&FunctionMetadata>| {
            found.into_iter().map(|f| f.name.clone()).collect::<Vec<_>>()
        };

        assert_eq!(names(registry.search("")).len(), 5);
        assert_eq!(names(registry.search("SIZ")), vec!["size"]);
        assert_eq!(names(registry.search("convert")), vec!["int"]);
        assert!(registry.search("nothing-like-this").is_empty());
    }

    #[test]
    fn test_methods_and_globals_partition() {
        let registry = FunctionRegistry::with_functions(sample());
        assert_eq!(registry.methods().len(), 1);
        assert_eq!(registry.globals().len(), 4);
    }

    #[test]
    fn test_category_order() {
        let registry = FunctionRegistry::with_functions(sample());
        assert_eq!(
            registry.category_names(),
            vec!["conversion", "list", "general", "crypto"]
        );

        let groups = registry.categories();
        let list = &groups[1];
        assert_eq!(list.0, "list");
        assert_eq!(
            list.1.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["filter", "size"]
        );
    }
}
