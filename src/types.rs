//! Type descriptors for register and FIFO elements.
//!
//! Descriptors are immutable once built; all width checks happen in the constructors so
//! the codec can rely on `1 <= lane width <= 128` (127 for unsigned lanes, so every
//! decoded integer fits an `i128`).

use crate::codec::CodecError;
use crate::value::{ClusterValue, Complex, Value};
use std::collections::HashSet;
use std::fmt;

/// Widest fixed-point lane the codec accumulates in one integer.
pub const MAX_LANE_BITS: i32 = 128;

fn check_lane_width(
    integer_bits: i32,
    fractional_bits: i32,
    signed: bool,
) -> Result<usize, CodecError> {
    let width = integer_bits as i64 + fractional_bits as i64;
    let max = if signed { MAX_LANE_BITS } else { MAX_LANE_BITS - 1 };
    if width < 1 || width > max as i64 {
        return Err(CodecError::InvalidWidth {
            integer_bits,
            fractional_bits,
        });
    }
    Ok(width as usize)
}

fn lane_name(prefix: char, integer_bits: i32, fractional_bits: i32) -> String {
    format!("{}{}.{}", prefix, integer_bits, fractional_bits)
}

/// Real fixed-point number: `integer_bits` left of the binary point (may be negative),
/// `fractional_bits` right of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPointType {
    integer_bits: i32,
    fractional_bits: i32,
    signed: bool,
}

impl FixedPointType {
    pub fn new(integer_bits: i32, fractional_bits: i32, signed: bool) -> Result<Self, CodecError> {
        check_lane_width(integer_bits, fractional_bits, signed)?;
        Ok(FixedPointType {
            integer_bits,
            fractional_bits,
            signed,
        })
    }

    /// Plain `width`-bit integer.
    pub fn integer(width: i32, signed: bool) -> Result<Self, CodecError> {
        Self::new(width, 0, signed)
    }

    /// 1-bit unsigned.
    pub fn boolean() -> Self {
        FixedPointType {
            integer_bits: 1,
            fractional_bits: 0,
            signed: false,
        }
    }

    pub fn integer_bits(&self) -> i32 {
        self.integer_bits
    }

    pub fn fractional_bits(&self) -> i32 {
        self.fractional_bits
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    pub fn num_bits(&self) -> usize {
        (self.integer_bits + self.fractional_bits) as usize
    }

    /// `I8.8`, `U-3.15`, or `I32` / `U8` for integers.
    pub fn type_name(&self) -> String {
        let prefix = if self.signed { 'I' } else { 'U' };
        if self.fractional_bits == 0 {
            format!("{}{}", prefix, self.integer_bits)
        } else {
            lane_name(prefix, self.integer_bits, self.fractional_bits)
        }
    }

    pub fn zero(&self) -> Value {
        if self.fractional_bits == 0 {
            Value::Integer(0)
        } else {
            Value::Real(0.0)
        }
    }
}

/// Complex fixed-point: two signed lanes of the same shape, real lane first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComplexFixedPointType {
    lane: FixedPointType,
}

impl ComplexFixedPointType {
    pub fn new(integer_bits: i32, fractional_bits: i32) -> Result<Self, CodecError> {
        Ok(ComplexFixedPointType {
            lane: FixedPointType::new(integer_bits, fractional_bits, true)?,
        })
    }

    /// Shape of each of the two lanes.
    pub fn lane(&self) -> &FixedPointType {
        &self.lane
    }

    pub fn integer_bits(&self) -> i32 {
        self.lane.integer_bits
    }

    pub fn fractional_bits(&self) -> i32 {
        self.lane.fractional_bits
    }

    pub fn num_bits(&self) -> usize {
        2 * self.lane.num_bits()
    }

    pub fn type_name(&self) -> String {
        lane_name('C', self.lane.integer_bits, self.lane.fractional_bits)
    }

    pub fn zero(&self) -> Value {
        Value::Complex(Complex::default())
    }
}

/// One named field of a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterField {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// Ordered record of named fields; the bit layout is the fields concatenated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterType {
    fields: Vec<ClusterField>,
    num_bits: usize,
}

impl ClusterType {
    pub fn new<N: Into<String>>(
        fields: impl IntoIterator<Item = (N, TypeDescriptor)>,
    ) -> Result<Self, CodecError> {
        let fields: Vec<ClusterField> = fields
            .into_iter()
            .map(|(name, ty)| ClusterField { name: name.into(), ty })
            .collect();
        let mut seen = HashSet::new();
        for f in &fields {
            if !seen.insert(f.name.as_str()) {
                return Err(CodecError::DuplicateField(f.name.clone()));
            }
        }
        let num_bits = fields.iter().map(|f| f.ty.num_bits()).sum();
        Ok(ClusterType { fields, num_bits })
    }

    /// Builds a cluster from parallel name/type lists and checks the summed width against
    /// the size the hardware declares for the element.
    pub fn with_declared_size(
        names: Vec<String>,
        types: Vec<TypeDescriptor>,
        declared_bits: usize,
    ) -> Result<Self, CodecError> {
        if names.len() != types.len() {
            return Err(CodecError::FieldCountMismatch {
                names: names.len(),
                types: types.len(),
            });
        }
        let cluster = Self::new(names.into_iter().zip(types))?;
        if cluster.num_bits != declared_bits {
            return Err(CodecError::SizeMismatch {
                computed: cluster.num_bits,
                declared: declared_bits,
            });
        }
        Ok(cluster)
    }

    pub fn fields(&self) -> &[ClusterField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ClusterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Every field seeded with its type's zero value.
    pub fn empty_value(&self) -> ClusterValue {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.ty.empty_value()))
            .collect()
    }

    /// Field name → type name, in declaration order.
    pub fn schema(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.ty.type_name()))
            .collect()
    }

    pub fn type_name(&self) -> String {
        let inner: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.ty.type_name()))
            .collect();
        format!("Cluster{{{}}}", inner.join(", "))
    }
}

/// Any element type a register or FIFO can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    FixedPoint(FixedPointType),
    ComplexFixedPoint(ComplexFixedPointType),
    Cluster(ClusterType),
}

impl TypeDescriptor {
    pub fn num_bits(&self) -> usize {
        match self {
            TypeDescriptor::FixedPoint(t) => t.num_bits(),
            TypeDescriptor::ComplexFixedPoint(t) => t.num_bits(),
            TypeDescriptor::Cluster(t) => t.num_bits(),
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            TypeDescriptor::FixedPoint(t) => t.type_name(),
            TypeDescriptor::ComplexFixedPoint(t) => t.type_name(),
            TypeDescriptor::Cluster(t) => t.type_name(),
        }
    }

    pub fn empty_value(&self) -> Value {
        match self {
            TypeDescriptor::FixedPoint(t) => t.zero(),
            TypeDescriptor::ComplexFixedPoint(t) => t.zero(),
            TypeDescriptor::Cluster(t) => Value::Cluster(t.empty_value()),
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterType> {
        match self {
            TypeDescriptor::Cluster(c) => Some(c),
            _ => None,
        }
    }
}

impl From<FixedPointType> for TypeDescriptor {
    fn from(t: FixedPointType) -> Self {
        TypeDescriptor::FixedPoint(t)
    }
}

impl From<ComplexFixedPointType> for TypeDescriptor {
    fn from(t: ComplexFixedPointType) -> Self {
        TypeDescriptor::ComplexFixedPoint(t)
    }
}

impl From<ClusterType> for TypeDescriptor {
    fn from(t: ClusterType) -> Self {
        TypeDescriptor::Cluster(t)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}
