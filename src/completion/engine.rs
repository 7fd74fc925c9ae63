//! Completion engine - orchestrates the completion flow
//!
//! input → (base, partial) → resolve base → shape/type → field, index,
//! function and keyword candidates → score → sort.

use tracing::{debug, trace};

use super::candidates::{
    Completion, CompletionKind, KEYWORDS, is_compatible, key_step, prefix_matches, rebuild_base,
};
use super::context::CompletionContext;
use super::split::{SplitInput, split_input};
use crate::config::CompletionConfig;
use crate::path::{ROOT_MARKER, is_root};
use crate::session::Session;
use crate::value::{Value, ValueType};

/// Resolved base of a completion request
struct Base {
    /// Live value, when resolution succeeded
    value: Option<Value>,
    ty: ValueType,
}

/// Main completion engine
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    /// Engine and registry shared with the rest of the application
    session: Session,
    config: CompletionConfig,
}

impl CompletionEngine {
    /// Create a completion engine with default scoring
    ///
    /// # Arguments
    /// * `session` - Session supplying the expression engine and registry
    pub fn new(session: Session) -> Self {
        Self::with_config(session, CompletionConfig::default())
    }

    pub fn with_config(session: Session, config: CompletionConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Complete `input` in the given context.
    ///
    /// Never fails: input that cannot be understood or a base that cannot be
    /// resolved yields fewer (possibly zero) candidates.
    ///
    /// # Arguments
    /// * `input` - Possibly incomplete path or expression
    /// * `ctx` - Per-call context
    ///
    /// # Returns
    /// * `Vec<Completion>` - Candidates sorted by score (desc) then display (asc)
    pub fn filter_completions(&self, input: &str, ctx: &CompletionContext<'_>) -> Vec<Completion> {
        let input = match ctx.cursor_position {
            Some(pos) if pos < input.len() && input.is_char_boundary(pos) => &input[..pos],
            _ => input,
        };

        if input.trim().is_empty() {
            return vec![Completion {
                text: ROOT_MARKER.to_string(),
                display: ROOT_MARKER.to_string(),
                kind: CompletionKind::Variable,
                detail: ctx
                    .current_node
                    .map(|v| v.type_name().to_string())
                    .unwrap_or_default(),
                description: "root value".to_string(),
                score: self.config.variable_score,
                function: None,
            }];
        }

        let engine = self.session.engine();
        let mut split = split_input(input, engine.as_ref(), ctx.is_after_dot);
        if let Some(partial) = &ctx.partial_token {
            split.partial = partial.clone();
        }
        trace!(base = %split.base, partial = %split.partial, "split completion input");

        let Some(base) = self.resolve_base(&split, ctx) else {
            debug!(base = %split.base, "base unresolved, no completions");
            return Vec::new();
        };

        let mut completions = Vec::new();
        if let Some(value) = &base.value {
            self.member_candidates(value, &split, &mut completions);
        }
        if !split.in_bracket {
            self.function_candidates(base.ty, &split, &mut completions);
            if !split.has_base() && !split.partial.is_empty() {
                self.keyword_candidates(&split.partial, &mut completions);
            }
        }

        completions.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.display.cmp(&b.display)));
        if self.config.max_results > 0 {
            completions.truncate(self.config.max_results);
        }
        completions
    }

    /// Resolve the base to a value and type, or `None` when nothing can be
    /// offered.
    fn resolve_base(&self, split: &SplitInput, ctx: &CompletionContext<'_>) -> Option<Base> {
        if let Some(value) = ctx.expression_result {
            return Some(Base {
                value: Some(value.clone()),
                ty: ctx
                    .expression_result_type
                    .unwrap_or_else(|| value.value_type()),
            });
        }

        let resolved = match ctx.current_node {
            Some(root) if is_root(&split.base) => Ok(root.clone()),
            Some(root) => self.session.resolve(root, &split.base),
            None => {
                return ctx.current_type.map(|ty| Base { value: None, ty });
            }
        };

        match resolved {
            Ok(value) => {
                let ty = value.value_type();
                Some(Base {
                    value: Some(value),
                    ty,
                })
            }
            Err(e) => {
                debug!(base = %split.base, error = %e, "base resolution failed");
                ctx.current_type.map(|ty| Base { value: None, ty })
            }
        }
    }

    fn member_candidates(&self, value: &Value, split: &SplitInput, out: &mut Vec<Completion>) {
        let prefix = rebuild_base(&split.base);

        match value {
            Value::Record(_) | Value::External(_) => {
                for key in value.keys() {
                    if !prefix_matches(&key, &split.partial) {
                        continue;
                    }
                    let text = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}{}", key_step(&key))
                    };
                    let detail = value
                        .get_key(&key)
                        .map(|child| child.type_name().to_string())
                        .unwrap_or_default();
                    out.push(Completion {
                        text,
                        display: key,
                        kind: CompletionKind::Field,
                        detail,
                        description: String::new(),
                        score: self.config.field_score,
                        function: None,
                    });
                }
            }
            // a quoted key cannot address an element
            Value::Sequence(items) if !split.quoted_key => {
                let limit = items.len().min(self.config.max_index_candidates);
                for (index, item) in items.iter().take(limit).enumerate() {
                    let label = index.to_string();
                    if !prefix_matches(&label, &split.partial) {
                        continue;
                    }
                    out.push(Completion {
                        text: format!("{prefix}[{index}]"),
                        display: format!("[{index}]"),
                        kind: CompletionKind::Index,
                        detail: item.type_name().to_string(),
                        description: String::new(),
                        score: self.config.field_score,
                        function: None,
                    });
                }
            }
            _ => {}
        }
    }

    fn function_candidates(&self, ty: ValueType, split: &SplitInput, out: &mut Vec<Completion>) {
        let registry = self.session.registry();
        let matched = split.partial.chars().count() as u32;

        for function in registry.all() {
            if !is_compatible(ty, &function.name) || !prefix_matches(&function.name, &split.partial)
            {
                continue;
            }
            let text = if split.has_base() {
                format!("{}.{}", split.base, function.name)
            } else {
                function.name.clone()
            };
            out.push(Completion {
                text,
                display: function.name.clone(),
                kind: CompletionKind::Function,
                detail: function.signature.clone(),
                description: function.description.clone(),
                score: self.config.function_score + matched * self.config.match_weight,
                function: Some(function.clone()),
            });
        }
    }

    fn keyword_candidates(&self, partial: &str, out: &mut Vec<Completion>) {
        for keyword in KEYWORDS {
            if prefix_matches(keyword, partial) {
                out.push(Completion {
                    text: keyword.to_string(),
                    display: keyword.to_string(),
                    kind: CompletionKind::Keyword,
                    detail: String::new(),
                    description: "literal".to_string(),
                    score: self.config.keyword_score,
                    function: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({
            "users": [{"name": "Ada", "email": "a@x"}, {"name": "Bob", "email": "b@x"}],
            "uptime": 12.5,
            "title": "report",
            "first name": "A"
        }))
    }

    fn engine() -> CompletionEngine {
        CompletionEngine::new(Session::default())
    }

    fn texts(completions: &[Completion]) -> Vec<&str> {
        completions.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input_offers_root() {
        let root = doc();
        let completions = engine().filter_completions("", &CompletionContext::new(&root));
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].text, "_");
        assert_eq!(completions[0].kind, CompletionKind::Variable);
    }

    #[test]
    fn test_root_field_prefix() {
        let root = doc();
        let completions = engine().filter_completions("_.u", &CompletionContext::new(&root));

        assert_eq!(completions[0].text, "_.uptime");
        assert_eq!(completions[1].text, "_.users");
        assert!(completions[..2].iter().all(|c| c.kind == CompletionKind::Field));
        // nothing else on a map starts with "u"
        assert_eq!(completions.len(), 2);
    }

    #[test]
    fn test_fields_outrank_functions() {
        let root = doc();
        let completions = engine().filter_completions("_.", &CompletionContext::new(&root));

        let first_function = completions
            .iter()
            .position(|c| c.kind == CompletionKind::Function)
            .unwrap();
        assert!(completions[..first_function]
            .iter()
            .all(|c| c.kind == CompletionKind::Field));
        assert!(texts(&completions).contains(&"_[\"first name\"]"));
        assert!(texts(&completions).contains(&"_.keys"));
        assert!(!texts(&completions).contains(&"_.flatten"));
    }

    #[test]
    fn test_indices_and_nested_fields() {
        let root = doc();
        let ctx = CompletionContext::new(&root);

        let indices = engine().filter_completions("users[", &ctx);
        assert_eq!(texts(&indices), vec!["_.users[0]", "_.users[1]"]);
        assert!(indices.iter().all(|c| c.kind == CompletionKind::Index));

        let quoted = engine().filter_completions("users[\"", &ctx);
        assert!(quoted.iter().all(|c| c.kind != CompletionKind::Index));

        let nested = engine().filter_completions("users.0.na", &ctx);
        assert_eq!(nested[0].text, "_.users[0].name");
    }

    #[test]
    fn test_functions_filtered_by_type() {
        let root = doc();
        let completions = engine().filter_completions("_.title.", &CompletionContext::new(&root));
        let names: Vec<&str> = completions.iter().map(|c| c.display.as_str()).collect();

        assert!(names.contains(&"startsWith"));
        assert!(names.contains(&"type"));
        assert!(!names.contains(&"keys"));
        assert!(!names.contains(&"abs"));
        assert!(completions.iter().all(|c| c.text.starts_with("_.title.")));
    }

    #[test]
    fn test_function_score_rewards_longer_prefix() {
        let root = doc();
        let ctx = CompletionContext::new(&root);
        let short = engine().filter_completions("_.title.s", &ctx);
        let long = engine().filter_completions("_.title.sta", &ctx);

        let score = |list: &[Completion]| {
            list.iter()
                .find(|c| c.display == "startsWith")
                .map(|c| c.score)
                .unwrap()
        };
        assert!(score(&long) > score(&short));
        assert_eq!(score(&short), 110);
    }

    #[test]
    fn test_unresolved_base() {
        let root = doc();
        let ctx = CompletionContext::new(&root);
        assert!(engine().filter_completions("_.missing.", &ctx).is_empty());

        let typed = CompletionContext::new(&root).with_current_type(ValueType::String);
        let completions = engine().filter_completions("_.missing.con", &typed);
        assert_eq!(texts(&completions), vec!["_.missing.contains"]);
    }

    #[test]
    fn test_declared_type_without_node() {
        let ctx = CompletionContext::default().with_current_type(ValueType::List);
        let completions = engine().filter_completions("xs.fl", &ctx);
        assert_eq!(texts(&completions), vec!["xs.flatten"]);
    }

    #[test]
    fn test_keywords_for_bare_token() {
        let root = doc();
        let completions = engine().filter_completions("tr", &CompletionContext::new(&root));
        assert!(completions.iter().any(|c| c.kind == CompletionKind::Keyword && c.text == "true"));

        let completions = engine().filter_completions("t", &CompletionContext::new(&root));
        assert_eq!(completions[0].text, "title");
        let keyword = completions.iter().position(|c| c.text == "true").unwrap();
        let function = completions.iter().position(|c| c.text == "type").unwrap();
        assert!(function < keyword);
    }

    #[test]
    fn test_partial_token_override_and_cursor() {
        let root = doc();
        let ctx = CompletionContext::new(&root).with_partial("ti");
        assert_eq!(texts(&engine().filter_completions("_.u", &ctx)), vec!["_.title"]);

        let ctx = CompletionContext::new(&root).with_cursor(3);
        let completions = engine().filter_completions("_.uXYZ", &ctx);
        assert_eq!(completions[1].text, "_.users");
    }

    #[test]
    fn test_expression_result_used_as_base() {
        let root = doc();
        let result = Value::from(json!({"alpha": 1}));
        let ctx = CompletionContext::new(&root).with_expression_result(&result, None);
        let completions = engine().filter_completions("anything.", &ctx);
        assert_eq!(completions[0].display, "alpha");
    }

    #[test]
    fn test_max_results() {
        let root = doc();
        let config = CompletionConfig {
            max_results: 2,
            ..CompletionConfig::default()
        };
        let engine = CompletionEngine::with_config(Session::default(), config);
        assert_eq!(
            engine
                .filter_completions("_.", &CompletionContext::new(&root))
                .len(),
            2
        );
    }

    #[test]
    fn test_deterministic() {
        let root = doc();
        let ctx = CompletionContext::new(&root);
        let first = engine().filter_completions("_.", &ctx);
        for _ in 0..5 {
            assert_eq!(engine().filter_completions("_.", &ctx), first);
        }
    }
}
