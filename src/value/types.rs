use std::fmt;

/// Type of a value as seen by function filtering.
///
/// Inferred from live data or declared by the caller when the data is not
/// available. `Unknown` is the fail-closed case: no function is offered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    List,
    Map,
    Unknown,
}

impl ValueType {
    /// Parse a declared type name.
    ///
    /// Matching is case-insensitive; parameterised forms such as
    /// `list<string>` or `map<string, int>` map to their container type.
    pub fn parse(declared: &str) -> Self {
        let lowered = declared.trim().to_ascii_lowercase();
        let base = lowered
            .split(|c| c == '<' || c == '(')
            .next()
            .unwrap_or("")
            .trim();

        match base {
            "null" | "null_type" => ValueType::Null,
            "bool" | "boolean" => ValueType::Bool,
            "int" | "int64" | "integer" => ValueType::Int,
            "uint" | "uint64" => ValueType::Uint,
            "double" | "float" | "number" => ValueType::Double,
            "string" => ValueType::String,
            "bytes" => ValueType::Bytes,
            "list" | "array" => ValueType::List,
            "map" | "object" | "record" => ValueType::Map,
            _ => ValueType::Unknown,
        }
    }

    /// Canonical lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Null => "null_type",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Uint => "uint",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Unknown => "unknown",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Uint | ValueType::Double)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declared_types() {
        assert_eq!(ValueType::parse("map"), ValueType::Map);
        assert_eq!(ValueType::parse("MAP<string, int>"), ValueType::Map);
        assert_eq!(ValueType::parse("list<string>"), ValueType::List);
        assert_eq!(ValueType::parse("float"), ValueType::Double);
        assert_eq!(ValueType::parse(" uint "), ValueType::Uint);
        assert_eq!(ValueType::parse("google.protobuf.Any"), ValueType::Unknown);
        assert_eq!(ValueType::parse(""), ValueType::Unknown);
    }

    #[test]
    fn test_display_roundtrip() {
        for ty in [
            ValueType::Bool,
            ValueType::Int,
            ValueType::Double,
            ValueType::String,
            ValueType::List,
            ValueType::Map,
        ] {
            assert_eq!(ValueType::parse(&ty.to_string()), ty);
        }
    }
}
