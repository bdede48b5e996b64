//! Register/FIFO metadata adapter: builds the type of one element from the text a bitfile
//! declares for it and checks it against the declared size.

use crate::codec::CodecError;
use crate::parser::{parse_cluster, parse_scalar, ParseError};
use crate::types::{ClusterType, TypeDescriptor};
use tracing::debug;

/// One declared sub-element of a cluster: its type tag and field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub tag: String,
    pub name: String,
}

impl FieldDescriptor {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        FieldDescriptor {
            tag: tag.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementLayout {
    /// A single value of the given tag.
    Scalar { tag: String },
    /// An ordered record of tagged fields.
    Cluster { fields: Vec<FieldDescriptor> },
}

/// Metadata of a register or FIFO element, as extracted from the bitfile.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMetadata {
    pub name: String,
    pub flattened_type: String,
    pub size_in_bits: usize,
    pub layout: ElementLayout,
}

#[derive(Debug, thiserror::Error)]
#[error("element {element}: {kind}")]
pub struct MetadataError {
    pub element: String,
    #[source]
    pub kind: MetadataErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataErrorKind {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ElementMetadata {
    pub fn scalar(
        name: impl Into<String>,
        tag: impl Into<String>,
        flattened_type: impl Into<String>,
        size_in_bits: usize,
    ) -> Self {
        ElementMetadata {
            name: name.into(),
            flattened_type: flattened_type.into(),
            size_in_bits,
            layout: ElementLayout::Scalar { tag: tag.into() },
        }
    }

    pub fn cluster(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        flattened_type: impl Into<String>,
        size_in_bits: usize,
    ) -> Self {
        ElementMetadata {
            name: name.into(),
            flattened_type: flattened_type.into(),
            size_in_bits,
            layout: ElementLayout::Cluster { fields },
        }
    }

    /// Builds the element type and verifies its width equals `size_in_bits`.
    pub fn build(&self) -> Result<TypeDescriptor, MetadataError> {
        let ty = self.build_unchecked().map_err(|kind| MetadataError {
            element: self.name.clone(),
            kind,
        })?;
        debug!(element = %self.name, ty = %ty, num_bits = ty.num_bits(), "Built element type");
        Ok(ty)
    }

    fn build_unchecked(&self) -> Result<TypeDescriptor, MetadataErrorKind> {
        match &self.layout {
            ElementLayout::Scalar { tag } => {
                let ty = parse_scalar(tag, &self.flattened_type)?;
                if ty.num_bits() != self.size_in_bits {
                    return Err(CodecError::SizeMismatch {
                        computed: ty.num_bits(),
                        declared: self.size_in_bits,
                    }
                    .into());
                }
                Ok(ty)
            }
            ElementLayout::Cluster { fields } => {
                let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
                let types = parse_cluster(&tags, &self.flattened_type)?;
                let names = fields.iter().map(|f| f.name.clone()).collect();
                Ok(ClusterType::with_declared_size(names, types, self.size_in_bits)?.into())
            }
        }
    }
}
