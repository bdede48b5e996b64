//! # nifpga-fxp: bit-level codec for FPGA register values
//!
//! Describes the element types of FPGA registers and FIFOs (fixed-point, complex
//! fixed-point and nested clusters), builds them from the flattened type text a bitfile
//! ships with, and converts between engineering values and the raw MSB-first bits the
//! hardware exchanges.
//!
//! ## Types
//!
//! - [`FixedPointType`]: `I<int>.<frac>` / `U<int>.<frac>`; integer tags (`I8`…`U64`) and
//!   `Bool` are fixed-point types without fractional bits.
//! - [`ComplexFixedPointType`]: two signed lanes, real first.
//! - [`ClusterType`]: named fields concatenated in declaration order.
//!
//! ## Values
//!
//! [`Value::Integer`] for types without fractional bits, [`Value::Real`] otherwise,
//! [`Value::Complex`] and [`Value::Cluster`]. Rounding on encode is to nearest, ties away
//! from zero; out-of-range values wrap like the hardware does.
//!
//! ## Example
//!
//! ```
//! use nifpga_fxp::{ElementMetadata, FieldDescriptor, Value};
//!
//! let meta = ElementMetadata::cluster(
//!     "status",
//!     vec![FieldDescriptor::new("U8", "count"), FieldDescriptor::new("Bool", "ready")],
//!     "00A0400500004021",
//!     9,
//! );
//! let ty = meta.build().unwrap();
//! let cluster = ty.as_cluster().unwrap();
//! let mut v = cluster.empty_value();
//! v.set("count", 200u8);
//! v.set("ready", true);
//! let bits = cluster.encode(&v).unwrap();
//! assert_eq!(bits.to_string(), "110010001");
//! assert_eq!(ty.decode(&bits).unwrap(), Value::Cluster(v));
//! ```

pub mod bits;
pub mod catalog;
pub mod codec;
pub mod metadata;
pub mod parser;
pub mod types;
pub mod value;

pub use bits::{BitArray, BitsError, Endianness};
pub use catalog::TypeTag;
pub use codec::CodecError;
pub use metadata::{
    ElementLayout, ElementMetadata, FieldDescriptor, MetadataError, MetadataErrorKind,
};
pub use parser::{parse_cluster, parse_fixed_point, parse_scalar, ParseError};
pub use types::{ClusterField, ClusterType, ComplexFixedPointType, FixedPointType, TypeDescriptor};
pub use value::{ClusterValue, Complex, Value};
