//! Lenient numeric coercion
//!
//! Chain data arrives from upstream fetchers with strikes as strings, numbers
//! or JSON values. Anything that cannot be read as a number coerces to `None`.

use serde_json::Value;

/// A value that may be read as an `f64`
pub trait Numeric {
    /// Raw coercion (may yield NaN or infinity)
    fn to_f64(&self) -> Option<f64>;

    /// Coercion that also rejects NaN and ±infinity
    fn to_finite(&self) -> Option<f64> {
        self.to_f64().filter(|v| v.is_finite())
    }
}

macro_rules! numeric_as_cast {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

numeric_as_cast!(f64, f32, i32, i64, u32, u64, usize);

impl Numeric for str {
    fn to_f64(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl Numeric for String {
    fn to_f64(&self) -> Option<f64> {
        self.as_str().to_f64()
    }
}

impl Numeric for Value {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.to_f64(),
            _ => None,
        }
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_f64(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::to_f64)
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_f64(&self) -> Option<f64> {
        (**self).to_f64()
    }
}
