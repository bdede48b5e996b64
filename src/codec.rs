//! Encode/decode between [`Value`]s and MSB-first [`BitArray`]s.
//!
//! Fixed-point lanes are scaled by `2^fractional_bits`, rounded to the nearest integer with
//! ties away from zero (`f64::round`), and written as two's complement (signed) or plain
//! binary (unsigned) across the lane width. Values outside the representable range wrap
//! modulo `2^width`, as the hardware truncates them. Complex values are the real lane
//! followed by the imaginary lane; clusters are their fields concatenated in declaration
//! order.

use crate::bits::{BitArray, BitsError};
use crate::types::{ClusterType, ComplexFixedPointType, FixedPointType, TypeDescriptor};
use crate::value::{ClusterValue, Complex, Value};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(
        "invalid fixed-point width: {integer_bits} integer + {fractional_bits} fractional bits \
         (must total 1..=128, or 1..=127 unsigned)"
    )]
    InvalidWidth { integer_bits: i32, fractional_bits: i32 },
    #[error("expected {expected} bits, got {actual}")]
    Shape { expected: usize, actual: usize },
    #[error("element run of {actual} bits is not a whole number of {element_bits}-bit elements")]
    ElementRun { element_bits: usize, actual: usize },
    #[error("Domain: {0}")]
    Domain(String),
    #[error("cannot encode {found} value as {expected}")]
    TypeMismatch { expected: String, found: &'static str },
    #[error("cluster fields {actual:?} do not match declared fields {expected:?}")]
    FieldSetMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("duplicate cluster field: {0}")]
    DuplicateField(String),
    #[error("{names} field names for {types} field types")]
    FieldCountMismatch { names: usize, types: usize },
    #[error("computed size of {computed} bits does not match declared size of {declared} bits")]
    SizeMismatch { computed: usize, declared: usize },
    #[error("field {field}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<CodecError>,
    },
    #[error("Bits: {0}")]
    Bits(#[from] BitsError),
}

impl CodecError {
    /// Innermost error, skipping any [`CodecError::Field`] wrappers.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

fn check_len(bits: &BitArray, expected: usize) -> Result<(), CodecError> {
    if bits.len() != expected {
        return Err(CodecError::Shape {
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}

fn lane_mask(width: usize) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

impl FixedPointType {
    pub fn encode(&self, value: &Value) -> Result<BitArray, CodecError> {
        let width = self.num_bits();
        Ok(BitArray::from_u128(self.lane_bits(value)?, width)?)
    }

    pub fn decode(&self, bits: &BitArray) -> Result<Value, CodecError> {
        let width = self.num_bits();
        check_len(bits, width)?;
        let raw = bits.to_u128()?;
        let msb_set = width > 0 && bits.get(0) == Some(true);
        // Unsigned lanes are at most 127 bits, so `raw` fits an i128 unless the lane is signed.
        let n = if self.signed() && msb_set && width < 128 {
            raw as i128 - (1i128 << width)
        } else {
            raw as i128
        };
        if self.fractional_bits() == 0 {
            Ok(Value::Integer(n))
        } else {
            Ok(Value::Real(n as f64 / 2f64.powi(self.fractional_bits())))
        }
    }

    /// Value scaled by `2^fractional_bits`, rounded and wrapped to the lane width.
    fn lane_bits(&self, value: &Value) -> Result<u128, CodecError> {
        let width = self.num_bits();
        match value {
            Value::Integer(x) if self.fractional_bits() == 0 => {
                if !self.signed() && *x < 0 {
                    return Err(negative_unsigned(*x as f64));
                }
                Ok(*x as u128 & lane_mask(width))
            }
            Value::Integer(_) | Value::Real(_) => {
                let x = value.as_f64().unwrap_or(f64::NAN);
                if !x.is_finite() {
                    return Err(CodecError::Domain(format!("non-finite value {}", x)));
                }
                if !self.signed() && x < 0.0 {
                    return Err(negative_unsigned(x));
                }
                let scaled = (x * 2f64.powi(self.fractional_bits())).round();
                Ok(wrap_to_width(scaled, width))
            }
            other => Err(CodecError::TypeMismatch {
                expected: self.type_name(),
                found: other.kind(),
            }),
        }
    }
}

/// Two's complement bits of the integral `x` modulo `2^width`.
fn wrap_to_width(x: f64, width: usize) -> u128 {
    let modulus = 2f64.powi(width as i32);
    // `%` is exact, so `r` is an integer with `|r| < 2^width`.
    let mut r = x % modulus;
    // Only a 128-bit lane can leave the i128 range; both folds are exact.
    let half = 2f64.powi(127);
    if r >= half {
        r -= modulus;
    } else if r < -half {
        r += modulus;
    }
    (r as i128) as u128 & lane_mask(width)
}

fn negative_unsigned(x: f64) -> CodecError {
    CodecError::Domain(format!("negative value for unsigned fixed-point: {}", x))
}

impl ComplexFixedPointType {
    pub fn encode(&self, value: &Value) -> Result<BitArray, CodecError> {
        let c = value.as_complex().ok_or_else(|| CodecError::TypeMismatch {
            expected: self.type_name(),
            found: value.kind(),
        })?;
        let mut out = self.lane().encode(&Value::Real(c.re))?;
        out.extend(&self.lane().encode(&Value::Real(c.im))?);
        Ok(out)
    }

    pub fn decode(&self, bits: &BitArray) -> Result<Value, CodecError> {
        check_len(bits, self.num_bits())?;
        let half = self.lane().num_bits();
        let re = self.lane().decode(&bits.slice(0..half))?;
        let im = self.lane().decode(&bits.slice(half..2 * half))?;
        Ok(Value::Complex(Complex::new(
            re.as_f64().unwrap_or_default(),
            im.as_f64().unwrap_or_default(),
        )))
    }
}

impl ClusterType {
    /// Encodes a fully populated cluster value; the field set must match exactly.
    pub fn encode(&self, value: &ClusterValue) -> Result<BitArray, CodecError> {
        let mismatch = || CodecError::FieldSetMismatch {
            expected: self.field_names().map(String::from).collect(),
            actual: value.field_names().map(String::from).collect(),
        };
        let expected: HashSet<&str> = self.field_names().collect();
        let actual: HashSet<&str> = value.field_names().collect();
        if expected != actual {
            return Err(mismatch());
        }
        let mut out = BitArray::with_capacity(self.num_bits());
        for f in self.fields() {
            let v = value.get(&f.name).ok_or_else(mismatch)?;
            let bits = f.ty.encode(v).map_err(|e| CodecError::Field {
                field: f.name.clone(),
                source: Box::new(e),
            })?;
            out.extend(&bits);
        }
        Ok(out)
    }

    pub fn decode(&self, bits: &BitArray) -> Result<ClusterValue, CodecError> {
        check_len(bits, self.num_bits())?;
        let mut out = ClusterValue::new();
        let mut offset = 0;
        for f in self.fields() {
            let width = f.ty.num_bits();
            let v = f
                .ty
                .decode(&bits.slice(offset..offset + width))
                .map_err(|e| CodecError::Field {
                    field: f.name.clone(),
                    source: Box::new(e),
                })?;
            out.set(f.name.clone(), v);
            offset += width;
        }
        Ok(out)
    }
}

impl TypeDescriptor {
    /// Encodes `value` into exactly [`TypeDescriptor::num_bits`] bits.
    pub fn encode(&self, value: &Value) -> Result<BitArray, CodecError> {
        match self {
            TypeDescriptor::FixedPoint(t) => t.encode(value),
            TypeDescriptor::ComplexFixedPoint(t) => t.encode(value),
            TypeDescriptor::Cluster(t) => match value {
                Value::Cluster(c) => t.encode(c),
                other => Err(CodecError::TypeMismatch {
                    expected: t.type_name(),
                    found: other.kind(),
                }),
            },
        }
    }

    pub fn decode(&self, bits: &BitArray) -> Result<Value, CodecError> {
        match self {
            TypeDescriptor::FixedPoint(t) => t.decode(bits),
            TypeDescriptor::ComplexFixedPoint(t) => t.decode(bits),
            TypeDescriptor::Cluster(t) => t.decode(bits).map(Value::Cluster),
        }
    }

    /// Concatenated encodings of consecutive elements, as packed in a FIFO buffer.
    pub fn encode_elements(&self, values: &[Value]) -> Result<BitArray, CodecError> {
        let mut out = BitArray::with_capacity(self.num_bits() * values.len());
        for v in values {
            out.extend(&self.encode(v)?);
        }
        Ok(out)
    }

    /// Splits a packed run into whole elements and decodes each in order.
    pub fn decode_elements(&self, bits: &BitArray) -> Result<Vec<Value>, CodecError> {
        let width = self.num_bits();
        if width == 0 {
            if bits.is_empty() {
                return Ok(Vec::new());
            }
            return Err(CodecError::ElementRun {
                element_bits: 0,
                actual: bits.len(),
            });
        }
        if bits.len() % width != 0 {
            return Err(CodecError::ElementRun {
                element_bits: width,
                actual: bits.len(),
            });
        }
        (0..bits.len() / width)
            .map(|i| self.decode(&bits.slice(i * width..(i + 1) * width)))
            .collect()
    }
}
