//! Engineering-domain values for encoding/decoding.
//!
//! Numeric promotion is explicit: a fixed-point type without fractional bits decodes to
//! [`Value::Integer`], anything with fractional bits decodes to [`Value::Real`].

use std::fmt;

/// A complex number as carried by complex fixed-point registers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}j", self.re, -self.im)
        } else {
            write!(f, "{}+{}j", self.re, self.im)
        }
    }
}

/// A single decoded value (scalar or compound).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i128),
    Real(f64),
    Complex(Complex),
    Cluster(ClusterValue),
}

impl Value {
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Integer(x) => Some(*x),
            _ => None,
        }
    }

    /// Real view of scalar values; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(x) => Some(*x as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    /// Boolean registers decode to `Integer(0)` / `Integer(1)`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            _ => None,
        }
    }

    /// Complex view; real scalars are promoted with a zero imaginary part.
    pub fn as_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(c) => Some(*c),
            Value::Integer(_) | Value::Real(_) => self.as_f64().map(|re| Complex::new(re, 0.0)),
            Value::Cluster(_) => None,
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterValue> {
        match self {
            Value::Cluster(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cluster_mut(&mut self) -> Option<&mut ClusterValue> {
        match self {
            Value::Cluster(c) => Some(c),
            _ => None,
        }
    }

    /// Short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Complex(_) => "complex",
            Value::Cluster(_) => "cluster",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(x) => write!(f, "{}", x),
            Value::Real(x) => write!(f, "{}", x),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Cluster(c) => write!(f, "{}", c),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(x: $t) -> Self {
                Value::Integer(x as i128)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(b as i128)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<ClusterValue> for Value {
    fn from(c: ClusterValue) -> Self {
        Value::Cluster(c)
    }
}

/// Named field values of a cluster, in insertion order.
///
/// Built either by [`ClusterType::empty_value`](crate::types::ClusterType::empty_value) and
/// then populated by the caller, or by decoding. Encoding requires the field set to match
/// the cluster type exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterValue {
    fields: Vec<(String, Value)>,
}

impl ClusterValue {
    pub fn new() -> Self {
        ClusterValue { fields: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Replaces the value of `name` in place, or appends a new field. Returns the old value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for ClusterValue {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut out = ClusterValue::new();
        for (n, v) in iter {
            out.set(n, v);
        }
        out
    }
}

impl fmt::Display for ClusterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (n, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", n, v)?;
        }
        f.write_str("}")
    }
}
