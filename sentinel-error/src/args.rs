//! Opaque rendering arguments

use crate::printf;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A positional argument substituted into a [`Kind`](crate::Kind)'s text.
///
/// Arguments only affect rendering. The variant decides which verbs accept
/// the value; a mismatch renders a marker instead of failing.
#[derive(Clone)]
pub enum Arg {
    Str(Cow<'static, str>),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Any other value, rendered through its `Display` impl
    Display {
        value: Arc<dyn fmt::Display + Send + Sync>,
        type_name: &'static str,
    },
}

impl Arg {
    /// Wrap an arbitrary `Display` value
    pub fn display<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Arg::Display {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The type name shown in mismatch markers, e.g. `%!d(string=foo)`
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::Char(_) => "char",
            Arg::Display { type_name, .. } => type_name,
        }
    }

    pub(crate) fn is_numeric(&self) -> bool {
        matches!(self, Arg::Int(_) | Arg::Uint(_) | Arg::Float(_))
    }
}

/// The default (`%v`) rendering
impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Uint(u) => write!(f, "{}", u),
            Arg::Float(x) => f.write_str(&printf::shortest(*x)),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
            Arg::Display { value, .. } => write!(f, "{}", value),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => write!(f, "{:?}", s),
            Arg::Char(c) => write!(f, "{:?}", c),
            Arg::Display { value, type_name } => write!(f, "{}({})", type_name, value),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&'static str> for Arg {
    fn from(s: &'static str) -> Self {
        Arg::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(Cow::Owned(s))
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(Cow::Owned(s.clone()))
    }
}

impl From<Cow<'static, str>> for Arg {
    fn from(s: Cow<'static, str>) -> Self {
        Arg::Str(s)
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(Uint as u64: u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

/// Build a `Vec<Arg>` from values of mixed types.
///
/// ```rust
/// use sentinel_error::{args, Kind, NamedError};
///
/// const TOO_LARGE: Kind = Kind::new("%s: %d tokens exceeds max %d");
///
/// let err = TOO_LARGE.with_args(args!["prompt", 1500, 1024]);
/// assert_eq!(err.to_string(), "prompt: 1500 tokens exceeds max 1024");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),*]
    };
}
