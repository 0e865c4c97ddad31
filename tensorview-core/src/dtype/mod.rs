use std::fmt::{self, Debug};

use crate::tensor::{AnyValues, Values};

/// The element kinds with direct tensor support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Float64,
    Float32,
    /// 64 bit signed integers, the type behind the `int` accessors.
    Int,
    Int32,
    Byte,
    Bool,
    String,
}

impl Kind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Int => "int",
            Self::Int32 => "int32",
            Self::Byte => "byte",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }

    pub const fn is_string(self) -> bool {
        matches!(self, Self::String)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float64 | Self::Float32)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker trait for tensor element types.
///
/// Every element converts to and from the three access paths a tensor
/// exposes: `f64`, `i64` and `String`.
pub trait DType: Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    const KIND: Kind;

    fn to_f64(&self) -> f64;
    fn from_f64(x: f64) -> Self;
    fn to_int(&self) -> i64;
    fn from_int(x: i64) -> Self;
    fn to_string_value(&self) -> String;
    fn from_string_value(s: &str) -> Self;

    fn into_any(values: Values<Self>) -> AnyValues;
    fn from_any(values: AnyValues) -> Option<Values<Self>>;
    fn any_ref(values: &AnyValues) -> Option<&Values<Self>>;
}

macro_rules! any_conversions {
    ($variant:ident) => {
        fn into_any(values: Values<Self>) -> AnyValues {
            AnyValues::$variant(values)
        }

        fn from_any(values: AnyValues) -> Option<Values<Self>> {
            match values {
                AnyValues::$variant(v) => Some(v),
                _ => None,
            }
        }

        fn any_ref(values: &AnyValues) -> Option<&Values<Self>> {
            match values {
                AnyValues::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

macro_rules! dtype {
    ($rt:ident, $variant:ident) => {
        impl DType for $rt {
            const KIND: Kind = Kind::$variant;

            fn to_f64(&self) -> f64 {
                *self as f64
            }
            fn from_f64(x: f64) -> Self {
                x as $rt
            }
            fn to_int(&self) -> i64 {
                *self as i64
            }
            fn from_int(x: i64) -> Self {
                x as $rt
            }
            fn to_string_value(&self) -> String {
                self.to_string()
            }
            fn from_string_value(s: &str) -> Self {
                let s = s.trim();
                s.parse::<$rt>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|x| x as $rt))
                    .unwrap_or_default()
            }

            any_conversions!($variant);
        }
    };
}

dtype!(f64, Float64);
dtype!(f32, Float32);
dtype!(i64, Int);
dtype!(i32, Int32);
dtype!(u8, Byte);

impl DType for bool {
    const KIND: Kind = Kind::Bool;

    fn to_f64(&self) -> f64 {
        if *self {
            1.0
        } else {
            0.0
        }
    }
    fn from_f64(x: f64) -> Self {
        x != 0.0
    }
    fn to_int(&self) -> i64 {
        i64::from(*self)
    }
    fn from_int(x: i64) -> Self {
        x != 0
    }
    fn to_string_value(&self) -> String {
        self.to_string()
    }
    fn from_string_value(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<bool>() {
            Ok(b) => b,
            Err(_) => s.parse::<f64>().is_ok_and(|x| x != 0.0),
        }
    }

    any_conversions!(Bool);
}

impl DType for String {
    const KIND: Kind = Kind::String;

    /// Unparsable strings read as 0.
    fn to_f64(&self) -> f64 {
        self.trim().parse().unwrap_or(0.0)
    }
    fn from_f64(x: f64) -> Self {
        x.to_string()
    }
    fn to_int(&self) -> i64 {
        let s = self.trim();
        s.parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|x| x as i64))
            .unwrap_or(0)
    }
    fn from_int(x: i64) -> Self {
        x.to_string()
    }
    fn to_string_value(&self) -> String {
        self.clone()
    }
    fn from_string_value(s: &str) -> Self {
        s.to_string()
    }

    any_conversions!(String);
}
