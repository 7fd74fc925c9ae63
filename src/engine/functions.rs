//! Built-in function table
//!
//! Every builtin takes a flat argument list. For method calls
//! (`"abc".contains("b")`) the receiver is `args[0]`, so `contains("abc", "b")`
//! and the method form dispatch to the same implementation.

use std::cmp::Ordering;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;

use crate::error::{EvalError, EvalErrorKind};
use crate::registry::FunctionMetadata;
use crate::value::{Value, ValueType};

type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// One callable builtin together with its documentation
pub struct Builtin {
    pub meta: FunctionMetadata,
    pub call: BuiltinFn,
}

fn builtin(meta: FunctionMetadata, call: BuiltinFn) -> Builtin {
    Builtin { meta, call }
}

/// All builtins, grouped by category
pub fn builtins() -> Vec<Builtin> {
    vec![
        // conversion
        builtin(
            FunctionMetadata::new("int", "int(x) -> int", "Convert a number or numeric string to int")
                .category("conversion")
                .returns("int")
                .params(&["dyn"])
                .example("int(\"42\") == 42"),
            to_int,
        ),
        builtin(
            FunctionMetadata::new("double", "double(x) -> double", "Convert a number or numeric string to double")
                .category("conversion")
                .returns("double")
                .params(&["dyn"])
                .example("double(1) == 1.0"),
            to_double,
        ),
        builtin(
            FunctionMetadata::new("string", "string(x) -> string", "Convert a scalar to its string form")
                .category("conversion")
                .returns("string")
                .params(&["dyn"])
                .example("string(3) == \"3\""),
            to_string,
        ),
        builtin(
            FunctionMetadata::new("bool", "bool(x) -> bool", "Convert \"true\"/\"false\" to bool")
                .category("conversion")
                .returns("bool")
                .params(&["dyn"]),
            to_bool,
        ),
        builtin(
            FunctionMetadata::new("type", "type(x) -> string", "Name of the value's type")
                .category("conversion")
                .returns("string")
                .params(&["dyn"])
                .example("type([1]) == \"list\""),
            type_of,
        ),
        // string
        builtin(
            FunctionMetadata::new("contains", "string.contains(sub) -> bool", "Test whether the string contains a substring")
                .category("string")
                .method()
                .returns("bool")
                .params(&["string", "string"])
                .example("\"hello\".contains(\"ell\")"),
            contains,
        ),
        builtin(
            FunctionMetadata::new("startsWith", "string.startsWith(prefix) -> bool", "Test whether the string starts with a prefix")
                .category("string")
                .method()
                .returns("bool")
                .params(&["string", "string"]),
            starts_with,
        ),
        builtin(
            FunctionMetadata::new("endsWith", "string.endsWith(suffix) -> bool", "Test whether the string ends with a suffix")
                .category("string")
                .method()
                .returns("bool")
                .params(&["string", "string"]),
            ends_with,
        ),
        builtin(
            FunctionMetadata::new("lowerAscii", "string.lowerAscii() -> string", "Lowercase ASCII letters")
                .category("string")
                .method()
                .returns("string")
                .params(&["string"]),
            lower_ascii,
        ),
        builtin(
            FunctionMetadata::new("upperAscii", "string.upperAscii() -> string", "Uppercase ASCII letters")
                .category("string")
                .method()
                .returns("string")
                .params(&["string"]),
            upper_ascii,
        ),
        builtin(
            FunctionMetadata::new("trim", "string.trim() -> string", "Strip leading and trailing whitespace")
                .category("string")
                .method()
                .returns("string")
                .params(&["string"]),
            trim,
        ),
        builtin(
            FunctionMetadata::new("split", "string.split(sep) -> list<string>", "Split the string on a separator")
                .category("string")
                .method()
                .returns("list")
                .params(&["string", "string"])
                .example("\"a,b\".split(\",\") == [\"a\", \"b\"]"),
            split,
        ),
        builtin(
            FunctionMetadata::new("join", "list.join([sep]) -> string", "Join a list of strings")
                .category("string")
                .method()
                .returns("string")
                .params(&["list", "string"])
                .example("[\"a\", \"b\"].join(\"-\") == \"a-b\""),
            join,
        ),
        builtin(
            FunctionMetadata::new("replace", "string.replace(old, new) -> string", "Replace every occurrence of a substring")
                .category("string")
                .method()
                .returns("string")
                .params(&["string", "string", "string"]),
            replace,
        ),
        // list
        builtin(
            FunctionMetadata::new("size", "size(x) -> int", "Length of a string, bytes, list or map")
                .category("list")
                .returns("int")
                .params(&["dyn"])
                .example("size([1, 2]) == 2")
                .example("\"abc\".size() == 3"),
            size,
        ),
        builtin(
            FunctionMetadata::new("flatten", "list.flatten() -> list", "Flatten one level of nested lists")
                .category("list")
                .method()
                .returns("list")
                .params(&["list"])
                .example("[[1], [2, 3]].flatten() == [1, 2, 3]"),
            flatten,
        ),
        builtin(
            FunctionMetadata::new("slice", "list.slice(start, end) -> list", "Elements from start (inclusive) to end (exclusive)")
                .category("list")
                .method()
                .returns("list")
                .params(&["list", "int", "int"])
                .example("[1, 2, 3].slice(1, 3) == [2, 3]"),
            slice,
        ),
        builtin(
            FunctionMetadata::new("sort", "list.sort() -> list", "Sort a list of comparable scalars")
                .category("list")
                .method()
                .returns("list")
                .params(&["list"]),
            sort,
        ),
        builtin(
            FunctionMetadata::new("reverse", "list.reverse() -> list", "Reverse a list or string")
                .category("list")
                .method()
                .returns("list")
                .params(&["list"]),
            reverse,
        ),
        builtin(
            FunctionMetadata::new("first", "list.first() -> dyn", "First element of a non-empty list")
                .category("list")
                .method()
                .params(&["list"]),
            first,
        ),
        builtin(
            FunctionMetadata::new("last", "list.last() -> dyn", "Last element of a non-empty list")
                .category("list")
                .method()
                .params(&["list"]),
            last,
        ),
        // map
        builtin(
            FunctionMetadata::new("keys", "map.keys() -> list<string>", "Sorted keys of a map")
                .category("map")
                .method()
                .returns("list")
                .params(&["map"]),
            keys,
        ),
        builtin(
            FunctionMetadata::new("values", "map.values() -> list", "Values of a map in key order")
                .category("map")
                .method()
                .returns("list")
                .params(&["map"]),
            values,
        ),
        // math
        builtin(
            FunctionMetadata::new("abs", "abs(x) -> number", "Absolute value")
                .category("math")
                .params(&["number"])
                .example("abs(-3) == 3"),
            abs,
        ),
        builtin(
            FunctionMetadata::new("ceil", "ceil(x) -> number", "Round up to the nearest integer")
                .category("math")
                .params(&["number"]),
            ceil,
        ),
        builtin(
            FunctionMetadata::new("floor", "floor(x) -> number", "Round down to the nearest integer")
                .category("math")
                .params(&["number"]),
            floor,
        ),
        builtin(
            FunctionMetadata::new("round", "round(x) -> number", "Round half away from zero")
                .category("math")
                .params(&["number"]),
            round,
        ),
        builtin(
            FunctionMetadata::new("sqrt", "sqrt(x) -> double", "Square root")
                .category("math")
                .returns("double")
                .params(&["number"]),
            sqrt,
        ),
        builtin(
            FunctionMetadata::new("min", "min(a, b, ...) -> dyn", "Smallest argument, or smallest element of a single list")
                .category("math")
                .example("min(3, 1, 2) == 1"),
            min,
        ),
        builtin(
            FunctionMetadata::new("max", "max(a, b, ...) -> dyn", "Largest argument, or largest element of a single list")
                .category("math")
                .example("max([3, 1, 2]) == 3"),
            max,
        ),
        // encoding
        builtin(
            FunctionMetadata::new("base64Encode", "base64Encode(x) -> string", "Base64-encode a string or bytes")
                .category("encoding")
                .returns("string")
                .params(&["bytes"])
                .example("base64Encode(\"hi\") == \"aGk=\""),
            base64_encode,
        ),
        builtin(
            FunctionMetadata::new("base64Decode", "base64Decode(s) -> bytes", "Decode a base64 string to bytes")
                .category("encoding")
                .returns("bytes")
                .params(&["string"]),
            base64_decode,
        ),
        // regex
        builtin(
            FunctionMetadata::new("matches", "string.matches(pattern) -> bool", "Test the string against a regular expression")
                .category("regex")
                .method()
                .returns("bool")
                .params(&["string", "string"])
                .example("\"abc123\".matches(\"[0-9]+$\")"),
            matches,
        ),
        builtin(
            FunctionMetadata::new("findAll", "string.findAll(pattern) -> list<string>", "All non-overlapping matches of a regular expression")
                .category("regex")
                .method()
                .returns("list")
                .params(&["string", "string"]),
            find_all,
        ),
    ]
}

/// Documentation for the macros the evaluator expands itself
pub fn macro_metadata() -> Vec<FunctionMetadata> {
    vec![
        FunctionMetadata::new("all", "list.all(x, pred) -> bool", "True when the predicate holds for every element")
            .category("list")
            .method()
            .returns("bool")
            .example("[1, 2].all(x, x > 0)"),
        FunctionMetadata::new("exists", "list.exists(x, pred) -> bool", "True when the predicate holds for at least one element")
            .category("list")
            .method()
            .returns("bool")
            .example("[1, 2].exists(x, x == 2)"),
        FunctionMetadata::new("exists_one", "list.exists_one(x, pred) -> bool", "True when the predicate holds for exactly one element")
            .category("list")
            .method()
            .returns("bool"),
        FunctionMetadata::new("filter", "list.filter(x, pred) -> list", "Elements for which the predicate holds")
            .category("list")
            .method()
            .returns("list")
            .example("[1, 2, 3].filter(x, x > 1) == [2, 3]"),
        FunctionMetadata::new("map", "list.map(x, expr) -> list", "Transform every element")
            .category("list")
            .method()
            .returns("list")
            .example("[1, 2].map(x, x * 2) == [2, 4]"),
        FunctionMetadata::new("has", "has(x.field) -> bool", "Test whether a field is present")
            .category("map")
            .returns("bool")
            .example("has(_.user.email)"),
    ]
}

/* ========================= helpers ========================= */

fn expect_args(name: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::arity(name, &expected.to_string(), args.len()))
    }
}

fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    value.as_str().ok_or_else(|| {
        EvalError::type_error(format!(
            "{name}() expects a string, got {}",
            value.type_name()
        ))
    })
}

fn list_arg<'a>(name: &str, value: &'a Value) -> Result<&'a [Value], EvalError> {
    value.as_sequence().ok_or_else(|| {
        EvalError::type_error(format!("{name}() expects a list, got {}", value.type_name()))
    })
}

fn int_arg(name: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(EvalError::type_error(format!(
            "{name}() expects an int, got {}",
            other.type_name()
        ))),
    }
}

fn unary_string(
    name: &str,
    args: &[Value],
    f: impl Fn(&str) -> String,
) -> Result<Value, EvalError> {
    expect_args(name, args, 1)?;
    Ok(Value::String(f(string_arg(name, &args[0])?)))
}

fn string_predicate(
    name: &str,
    args: &[Value],
    f: impl Fn(&str, &str) -> bool,
) -> Result<Value, EvalError> {
    expect_args(name, args, 2)?;
    let s = string_arg(name, &args[0])?;
    let other = string_arg(name, &args[1])?;
    Ok(Value::Bool(f(s, other)))
}

fn numeric(
    name: &str,
    args: &[Value],
    on_int: impl Fn(i64) -> Option<i64>,
    on_float: impl Fn(f64) -> f64,
) -> Result<Value, EvalError> {
    expect_args(name, args, 1)?;
    match &args[0] {
        Value::Int(i) => on_int(*i)
            .map(Value::Int)
            .ok_or_else(|| EvalError::type_error(format!("{name}() overflowed on {i}"))),
        Value::Float(f) => Ok(Value::Float(on_float(*f))),
        other => Err(EvalError::type_error(format!(
            "{name}() expects a number, got {}",
            other.type_name()
        ))),
    }
}

fn compile_regex(pattern: &str) -> Result<Regex, EvalError> {
    Regex::new(pattern).map_err(|e| {
        EvalError::new(
            EvalErrorKind::Regex,
            format!("invalid regular expression '{pattern}': {e}"),
        )
    })
}

/// Ordering for comparable scalars; `None` for mixed or container types.
///
/// Ints and doubles compare numerically with each other.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Bytes(x), Value::Bytes(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn extreme(name: &str, args: &[Value], want: Ordering) -> Result<Value, EvalError> {
    let candidates: &[Value] = match args {
        [Value::Sequence(items)] => items,
        _ => args,
    };
    let Some((head, rest)) = candidates.split_first() else {
        return Err(EvalError::arity(name, "at least 1", 0));
    };

    let mut best = head;
    for candidate in rest {
        match compare(candidate, best) {
            Some(ordering) if ordering == want => best = candidate,
            Some(_) => {}
            None => {
                return Err(EvalError::type_error(format!(
                    "{name}() cannot compare {} with {}",
                    candidate.type_name(),
                    best.type_name()
                )));
            }
        }
    }
    Ok(best.clone())
}

/* ========================= conversion ========================= */

fn to_int(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("int", args, 1)?;
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Ok(Value::Int(f.trunc() as i64))
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::type_error(format!("cannot convert \"{s}\" to int"))),
        other => Err(EvalError::type_error(format!(
            "cannot convert {} to int",
            other.type_name()
        ))),
    }
}

fn to_double(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("double", args, 1)?;
    match &args[0] {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::type_error(format!("cannot convert \"{s}\" to double"))),
        other => Err(EvalError::type_error(format!(
            "cannot convert {} to double",
            other.type_name()
        ))),
    }
}

fn to_string(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("string", args, 1)?;
    match &args[0] {
        Value::Bytes(b) => String::from_utf8(b.clone())
            .map(Value::String)
            .map_err(|_| EvalError::type_error("bytes are not valid UTF-8")),
        Value::Sequence(_) | Value::Record(_) | Value::External(_) => Err(EvalError::type_error(
            format!("cannot convert {} to string", args[0].type_name()),
        )),
        scalar => Ok(Value::String(scalar.to_cell_string())),
    }
}

fn to_bool(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("bool", args, 1)?;
    match &args[0] {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(EvalError::type_error(format!("cannot convert \"{s}\" to bool"))),
        },
        other => Err(EvalError::type_error(format!(
            "cannot convert {} to bool",
            other.type_name()
        ))),
    }
}

fn type_of(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("type", args, 1)?;
    let ty: ValueType = args[0].value_type();
    Ok(Value::String(ty.as_str().to_string()))
}

/* ========================= string ========================= */

fn contains(args: &[Value]) -> Result<Value, EvalError> {
    // lists also answer contains()
    if let [Value::Sequence(items), needle] = args {
        return Ok(Value::Bool(items.contains(needle)));
    }
    string_predicate("contains", args, |s, sub| s.contains(sub))
}

fn starts_with(args: &[Value]) -> Result<Value, EvalError> {
    string_predicate("startsWith", args, |s, prefix| s.starts_with(prefix))
}

fn ends_with(args: &[Value]) -> Result<Value, EvalError> {
    string_predicate("endsWith", args, |s, suffix| s.ends_with(suffix))
}

fn lower_ascii(args: &[Value]) -> Result<Value, EvalError> {
    unary_string("lowerAscii", args, str::to_ascii_lowercase)
}

fn upper_ascii(args: &[Value]) -> Result<Value, EvalError> {
    unary_string("upperAscii", args, str::to_ascii_uppercase)
}

fn trim(args: &[Value]) -> Result<Value, EvalError> {
    unary_string("trim", args, |s| s.trim().to_string())
}

fn split(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("split", args, 2)?;
    let s = string_arg("split", &args[0])?;
    let sep = string_arg("split", &args[1])?;
    let parts = if sep.is_empty() {
        s.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        s.split(sep).map(|p| Value::String(p.to_string())).collect()
    };
    Ok(Value::Sequence(parts))
}

fn join(args: &[Value]) -> Result<Value, EvalError> {
    let sep = match args.len() {
        1 => "",
        2 => string_arg("join", &args[1])?,
        n => return Err(EvalError::arity("join", "1 or 2", n)),
    };
    let parts = list_arg("join", &args[0])?
        .iter()
        .map(|item| string_arg("join", item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::String(parts.join(sep)))
}

fn replace(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("replace", args, 3)?;
    let s = string_arg("replace", &args[0])?;
    let from = string_arg("replace", &args[1])?;
    let to = string_arg("replace", &args[2])?;
    Ok(Value::String(s.replace(from, to)))
}

/* ========================= list ========================= */

fn size(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("size", args, 1)?;
    match &args[0] {
        v @ (Value::String(_)
        | Value::Bytes(_)
        | Value::Sequence(_)
        | Value::Record(_)
        | Value::External(_)) => Ok(Value::Int(v.len() as i64)),
        other => Err(EvalError::type_error(format!(
            "size() is not defined for {}",
            other.type_name()
        ))),
    }
}

fn flatten(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("flatten", args, 1)?;
    let mut out = Vec::new();
    for item in list_arg("flatten", &args[0])? {
        match item {
            Value::Sequence(inner) => out.extend(inner.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    Ok(Value::Sequence(out))
}

fn slice(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("slice", args, 3)?;
    let items = list_arg("slice", &args[0])?;
    let start = int_arg("slice", &args[1])?;
    let end = int_arg("slice", &args[2])?;
    if start < 0 || end < start || end as usize > items.len() {
        return Err(EvalError::new(
            EvalErrorKind::Index,
            format!(
                "slice({start}, {end}) out of range for list of size {}",
                items.len()
            ),
        ));
    }
    Ok(Value::Sequence(items[start as usize..end as usize].to_vec()))
}

fn sort(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("sort", args, 1)?;
    let mut items = list_arg("sort", &args[0])?.to_vec();
    for pair in items.windows(2) {
        if compare(&pair[0], &pair[1]).is_none() {
            return Err(EvalError::type_error(format!(
                "sort() cannot compare {} with {}",
                pair[0].type_name(),
                pair[1].type_name()
            )));
        }
    }
    items.sort_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal));
    Ok(Value::Sequence(items))
}

fn reverse(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("reverse", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        other => {
            let mut items = list_arg("reverse", other)?.to_vec();
            items.reverse();
            Ok(Value::Sequence(items))
        }
    }
}

fn first(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("first", args, 1)?;
    list_arg("first", &args[0])?
        .first()
        .cloned()
        .ok_or_else(|| EvalError::new(EvalErrorKind::Index, "first() of an empty list"))
}

fn last(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("last", args, 1)?;
    list_arg("last", &args[0])?
        .last()
        .cloned()
        .ok_or_else(|| EvalError::new(EvalErrorKind::Index, "last() of an empty list"))
}

/* ========================= map ========================= */

fn keys(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("keys", args, 1)?;
    match &args[0] {
        v @ (Value::Record(_) | Value::External(_)) => {
            Ok(Value::Sequence(v.keys().into_iter().map(Value::String).collect()))
        }
        other => Err(EvalError::type_error(format!(
            "keys() expects a map, got {}",
            other.type_name()
        ))),
    }
}

fn values(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("values", args, 1)?;
    match &args[0] {
        v @ (Value::Record(_) | Value::External(_)) => Ok(Value::Sequence(
            v.keys()
                .iter()
                .map(|k| v.get_key(k).unwrap_or_default())
                .collect(),
        )),
        other => Err(EvalError::type_error(format!(
            "values() expects a map, got {}",
            other.type_name()
        ))),
    }
}

/* ========================= math ========================= */

fn abs(args: &[Value]) -> Result<Value, EvalError> {
    numeric("abs", args, i64::checked_abs, f64::abs)
}

fn ceil(args: &[Value]) -> Result<Value, EvalError> {
    numeric("ceil", args, Some, f64::ceil)
}

fn floor(args: &[Value]) -> Result<Value, EvalError> {
    numeric("floor", args, Some, f64::floor)
}

fn round(args: &[Value]) -> Result<Value, EvalError> {
    numeric("round", args, Some, f64::round)
}

fn sqrt(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("sqrt", args, 1)?;
    match &args[0] {
        Value::Int(i) => Ok(Value::Float((*i as f64).sqrt())),
        Value::Float(f) => Ok(Value::Float(f.sqrt())),
        other => Err(EvalError::type_error(format!(
            "sqrt() expects a number, got {}",
            other.type_name()
        ))),
    }
}

fn min(args: &[Value]) -> Result<Value, EvalError> {
    extreme("min", args, Ordering::Less)
}

fn max(args: &[Value]) -> Result<Value, EvalError> {
    extreme("max", args, Ordering::Greater)
}

/* ========================= encoding ========================= */

fn base64_encode(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("base64Encode", args, 1)?;
    match &args[0] {
        Value::Bytes(b) => Ok(Value::String(BASE64.encode(b))),
        Value::String(s) => Ok(Value::String(BASE64.encode(s.as_bytes()))),
        other => Err(EvalError::type_error(format!(
            "base64Encode() expects bytes or string, got {}",
            other.type_name()
        ))),
    }
}

fn base64_decode(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("base64Decode", args, 1)?;
    let s = string_arg("base64Decode", &args[0])?;
    BASE64
        .decode(s.trim())
        .map(Value::Bytes)
        .map_err(|e| EvalError::type_error(format!("invalid base64: {e}")))
}

/* ========================= regex ========================= */

fn matches(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("matches", args, 2)?;
    let s = string_arg("matches", &args[0])?;
    let re = compile_regex(string_arg("matches", &args[1])?)?;
    Ok(Value::Bool(re.is_match(s)))
}

fn find_all(args: &[Value]) -> Result<Value, EvalError> {
    expect_args("findAll", args, 2)?;
    let s = string_arg("findAll", &args[0])?;
    let re = compile_regex(string_arg("findAll", &args[1])?)?;
    Ok(Value::Sequence(
        re.find_iter(s)
            .map(|m| Value::String(m.as_str().to_string()))
            .collect(),
    ))
}
