//! Per-call completion context

use crate::value::{Value, ValueType};

/// Caller-supplied state for one completion request.
///
/// Nothing here is persisted between calls.
#[derive(Debug, Clone, Default)]
pub struct CompletionContext<'a> {
    /// Value that empty or root-relative bases resolve against
    pub current_node: Option<&'a Value>,

    /// Declared type of the base, used when the base cannot be resolved
    pub current_type: Option<ValueType>,

    /// Byte offset of the cursor; text after it is ignored
    pub cursor_position: Option<usize>,

    /// Already-evaluated base, skipping resolution
    pub expression_result: Option<&'a Value>,

    /// Type of `expression_result` when it differs from the inferred one
    pub expression_result_type: Option<ValueType>,

    /// Token to complete, overriding the one derived from the input
    pub partial_token: Option<String>,

    /// Input ends at a member-access point even without a trailing `.`
    pub is_after_dot: bool,
}

impl<'a> CompletionContext<'a> {
    /// Context completing against `node`
    pub fn new(node: &'a Value) -> Self {
        Self {
            current_node: Some(node),
            ..Self::default()
        }
    }

    pub fn with_current_type(mut self, ty: ValueType) -> Self {
        self.current_type = Some(ty);
        self
    }

    pub fn with_cursor(mut self, position: usize) -> Self {
        self.cursor_position = Some(position);
        self
    }

    pub fn with_expression_result(mut self, value: &'a Value, ty: Option<ValueType>) -> Self {
        self.expression_result = Some(value);
        self.expression_result_type = ty;
        self
    }

    pub fn with_partial(mut self, partial: impl Into<String>) -> Self {
        self.partial_token = Some(partial.into());
        self
    }

    pub fn after_dot(mut self) -> Self {
        self.is_after_dot = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = Value::Int(1);
        let ctx = CompletionContext::new(&node)
            .with_current_type(ValueType::Int)
            .with_cursor(3)
            .with_partial("ab")
            .after_dot();

        assert_eq!(ctx.current_node, Some(&node));
        assert_eq!(ctx.current_type, Some(ValueType::Int));
        assert_eq!(ctx.cursor_position, Some(3));
        assert_eq!(ctx.partial_token.as_deref(), Some("ab"));
        assert!(ctx.is_after_dot);
        assert!(ctx.expression_result.is_none());
    }
}
