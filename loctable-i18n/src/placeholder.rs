//! Placeholder Substitution
//!
//! Cells may contain ordered `{...}` tokens. Values are substituted by
//! position, never by token name:
//!
//! ```rust
//! use loctable_i18n::{PlaceholderSubstitutor, args};
//!
//! let text = PlaceholderSubstitutor::apply("Hi {name}, you have {n} coins", &args!["Ann", 5]);
//! assert_eq!(text, "Hi Ann, you have 5 coins");
//! ```

use std::fmt;
use std::ops::Range;

/// A value substituted into a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Absent value, rendered as the empty string
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => Ok(()),
            ArgValue::Bool(v) => write!(f, "{}", v),
            ArgValue::Int(v) => write!(f, "{}", v),
            ArgValue::UInt(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! arg_from {
    ($variant:ident: $target:ty => $($source:ty),+) => {
        $(
            impl From<$source> for ArgValue {
                fn from(value: $source) -> Self {
                    ArgValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

arg_from!(Int: i64 => i8, i16, i32, i64);
arg_from!(UInt: u64 => u8, u16, u32, u64);
arg_from!(Float: f64 => f32, f64);
arg_from!(Bool: bool => bool);
arg_from!(Str: String => String, &str, &String, char);

impl From<usize> for ArgValue {
    fn from(value: usize) -> Self {
        ArgValue::UInt(value as u64)
    }
}

impl From<isize> for ArgValue {
    fn from(value: isize) -> Self {
        ArgValue::Int(value as i64)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::Null, Into::into)
    }
}

/// Build a `Vec<ArgValue>` from mixed values.
///
/// ```rust
/// use loctable_i18n::{ArgValue, args};
///
/// let values = args!["Ann", 5, None::<&str>];
/// assert_eq!(values[2], ArgValue::Null);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::ArgValue>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::ArgValue::from($arg)),+]
    };
}

/// Stable, collision-free key for an ordered argument list.
///
/// Each value is written as `<byte length>:<text>` and values are joined with
/// `|`; absent values are written as `~`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentSignature(String);

impl ArgumentSignature {
    pub fn of(args: &[ArgValue]) -> Self {
        let parts: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                ArgValue::Null => "~".to_string(),
                other => {
                    let text = other.to_string();
                    format!("{}:{}", text.len(), text)
                }
            })
            .collect();
        Self(parts.join("|"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgumentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Positional `{...}` substitution.
pub struct PlaceholderSubstitutor;

impl PlaceholderSubstitutor {
    /// Byte ranges of every `{...}` token, left to right.
    ///
    /// A token is a `{`, at least one character other than a brace, then
    /// `}`. Nested or unbalanced braces do not form tokens.
    pub fn tokens(template: &str) -> Vec<Range<usize>> {
        let bytes = template.as_bytes();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'{' {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < bytes.len() && bytes[j] != b'{' && bytes[j] != b'}' {
                j += 1;
            }

            if j < bytes.len() && bytes[j] == b'}' && j > i + 1 {
                tokens.push(i..j + 1);
                i = j + 1;
            } else {
                i = j;
            }
        }

        tokens
    }

    /// Replace the i-th token with the i-th argument.
    ///
    /// Tokens without an argument stay verbatim; surplus arguments are
    /// ignored.
    pub fn apply(template: &str, args: &[ArgValue]) -> String {
        if template.is_empty() || args.is_empty() {
            return template.to_string();
        }

        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;

        for (token, arg) in Self::tokens(template).into_iter().zip(args) {
            out.push_str(&template[cursor..token.start]);
            out.push_str(&arg.to_string());
            cursor = token.end;
        }
        out.push_str(&template[cursor..]);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_substitution() {
        assert_eq!(
            PlaceholderSubstitutor::apply("Hi {name}, you have {n} coins", &args!["Ann", 5]),
            "Hi Ann, you have 5 coins"
        );
    }

    #[test]
    fn test_excess_tokens_stay_verbatim() {
        assert_eq!(PlaceholderSubstitutor::apply("{a}{b}", &args!["x"]), "x{b}");
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(PlaceholderSubstitutor::apply("no tokens", &args!["x"]), "no tokens");
    }

    #[test]
    fn test_excess_arguments_are_ignored() {
        assert_eq!(PlaceholderSubstitutor::apply("{a}", &args![1, 2, 3]), "1");
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(PlaceholderSubstitutor::apply("{a}", &args![]), "{a}");
    }

    #[test]
    fn test_null_renders_empty() {
        assert_eq!(
            PlaceholderSubstitutor::apply("[{a}]", &args![None::<i32>]),
            "[]"
        );
    }

    #[test]
    fn test_identical_tokens_are_positional() {
        assert_eq!(
            PlaceholderSubstitutor::apply("{x} and {x}", &args!["a", "b"]),
            "a and b"
        );
    }

    #[test]
    fn test_malformed_braces_are_untouched() {
        assert_eq!(
            PlaceholderSubstitutor::apply("{} {{a}} {b", &args!["x", "y"]),
            "{} {x}} {b"
        );
        assert_eq!(PlaceholderSubstitutor::apply("}{", &args!["x"]), "}{");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        assert_eq!(
            PlaceholderSubstitutor::apply("{a} {b}", &args!["{b}", "y"]),
            "{b} y"
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            PlaceholderSubstitutor::apply("你好 {名字}！", &args!["Ann"]),
            "你好 Ann！"
        );
    }

    #[test]
    fn test_token_ranges() {
        assert_eq!(PlaceholderSubstitutor::tokens("a{b}c{d}"), vec![1..4, 5..8]);
        assert!(PlaceholderSubstitutor::tokens("{}").is_empty());
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(ArgValue::from(2.5).to_string(), "2.5");
        assert_eq!(ArgValue::from(5.0).to_string(), "5");
        assert_eq!(ArgValue::from(true).to_string(), "true");
        assert_eq!(ArgValue::from(-3).to_string(), "-3");
        assert_eq!(ArgValue::from(7usize).to_string(), "7");
        assert_eq!(ArgValue::from('x').to_string(), "x");
        assert_eq!(ArgValue::from(Some("on")).to_string(), "on");
        assert_eq!(ArgValue::Null.to_string(), "");
    }

    #[test]
    fn test_signatures_do_not_collide() {
        let pairs = [
            (args!["a|b"], args!["a", "b"]),
            (args![""], args![]),
            (args![None::<&str>], args![""]),
            (args!["1:a"], args!["a"]),
        ];
        for (left, right) in pairs {
            assert_ne!(ArgumentSignature::of(&left), ArgumentSignature::of(&right));
        }
    }

    #[test]
    fn test_signature_is_stable() {
        let signature = ArgumentSignature::of(&args!["Ann", 5, None::<i32>]);
        assert_eq!(signature.as_str(), "3:Ann|1:5|~");
        assert_eq!(signature, ArgumentSignature::of(&args!["Ann", 5u8, None::<u8>]));
    }
}
