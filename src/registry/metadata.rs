//! Function metadata records

use serde::{Deserialize, Serialize};

/// Category used when none is declared
pub const DEFAULT_CATEGORY: &str = "general";

/// Documentation for one expression-language function or macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name (e.g., "size")
    pub name: String,
    /// Human-readable signature (e.g., "list.size() -> int")
    pub signature: String,
    /// Description of what the function does
    #[serde(default)]
    pub description: String,
    /// Display category; empty means [`DEFAULT_CATEGORY`]
    #[serde(default)]
    pub category: String,
    /// Called with receiver syntax (`x.f()`) rather than `f(x)`
    #[serde(default)]
    pub is_method: bool,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub param_types: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl FunctionMetadata {
    /// Create metadata with a name, signature and description
    pub fn new(
        name: impl Into<String>,
        signature: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            description: description.into(),
            category: String::new(),
            is_method: false,
            return_type: String::new(),
            param_types: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn method(mut self) -> Self {
        self.is_method = true;
        self
    }

    pub fn returns(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn params(mut self, params: &[&str]) -> Self {
        self.param_types = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Category, falling back to [`DEFAULT_CATEGORY`]
    pub fn category_or_default(&self) -> &str {
        if self.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }

    /// True when `self` should replace `other` for the same name.
    ///
    /// More examples wins; on a tie the longer description wins.
    pub fn is_richer_than(&self, other: &FunctionMetadata) -> bool {
        match self.examples.len().cmp(&other.examples.len()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.description.len() > other.description.len(),
        }
    }
}
