//! Typing of unquoted scalar values
//!
//! Rules, first match wins:
//! - `null` is [`Value::Null`]; `true` and `false` are booleans
//! - `-?[1-9][0-9]*` is a decimal integer
//! - `-?0[0-7]*` is an octal integer (so `0` on its own is zero)
//! - `-?0x[0-9a-f]*` (case-insensitive) is a hexadecimal integer; `0x` is zero
//! - any other numeric-looking text (fractions, exponents, a leading `+`,
//!   leading zeros followed by 8 or 9) is a float
//! - anything else stays a string
//!
//! Integers are `i64`. Literals outside that range saturate to `i64::MIN` or
//! `i64::MAX`.

use regex::Regex;
use std::sync::OnceLock;

use crate::value::Value;

/// Numeric base of an integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// Classification of unquoted scalar text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer { radix: Radix },
    Float,
    String,
}

struct Patterns {
    decimal: Regex,
    octal: Regex,
    hex: Regex,
    numeric: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        decimal: Regex::new(r"^-?[1-9][0-9]*$").expect("valid decimal pattern"),
        octal: Regex::new(r"^-?0[0-7]*$").expect("valid octal pattern"),
        hex: Regex::new(r"(?i)^-?0x[0-9a-f]*$").expect("valid hex pattern"),
        numeric: Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("valid numeric pattern"),
    })
}

/// Decide which type unquoted `raw` text converts to
pub fn classify(raw: &str) -> Scalar {
    match raw {
        "null" => return Scalar::Null,
        "true" => return Scalar::Bool(true),
        "false" => return Scalar::Bool(false),
        _ => {}
    }

    let p = patterns();
    if p.decimal.is_match(raw) {
        Scalar::Integer {
            radix: Radix::Decimal,
        }
    } else if p.octal.is_match(raw) {
        Scalar::Integer {
            radix: Radix::Octal,
        }
    } else if p.hex.is_match(raw) {
        Scalar::Integer {
            radix: Radix::Hexadecimal,
        }
    } else if p.numeric.is_match(raw) {
        Scalar::Float
    } else {
        Scalar::String
    }
}

/// Convert unquoted `raw` text to its natural type
pub fn coerce(raw: &str) -> Value {
    match classify(raw) {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(b),
        Scalar::Integer { radix } => Value::Integer(parse_integer(raw, radix)),
        Scalar::Float => match raw.parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::String(raw.to_string()),
        },
        Scalar::String => Value::String(raw.to_string()),
    }
}

/// Parse text already matched by one of the integer patterns
fn parse_integer(raw: &str, radix: Radix) -> i64 {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let digits = match radix {
        Radix::Decimal => body,
        Radix::Octal => &body[1..],
        Radix::Hexadecimal => &body[2..],
    };

    let mut magnitude: i128 = 0;
    for d in digits.chars().filter_map(|c| c.to_digit(radix.base())) {
        magnitude = magnitude * radix.base() as i128 + d as i128;
        if magnitude > i64::MAX as i128 + 1 {
            break;
        }
    }

    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
