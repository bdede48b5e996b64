//! Parse flattened type text into type descriptors using PEST.
//!
//! Flattened type text is the compact hex descriptor a bitfile stores next to each
//! register and FIFO. Types are located by their catalog code; a fixed-point record
//! following its code carries the word length, the integer word length (signed 16-bit)
//! and a signedness flag.

use crate::catalog::{TypeTag, CODE_LEN};
use crate::codec::CodecError;
use crate::types::{ComplexFixedPointType, FixedPointType, TypeDescriptor};
use pest::Parser;
use pest_derive::Parser as PestParser;
use tracing::debug;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct FlattenedTypeParser;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported type tag: {0}")]
    UnsupportedType(String),
    #[error("type code for {tag} not found in flattened type")]
    CodeNotFound { tag: String },
    #[error("could not find type {tag} at position {position}")]
    FieldNotFound { tag: String, position: usize },
    #[error("unknown fixed-point type: {0}")]
    UnknownFixedPointTag(String),
    #[error("malformed {tag} record at offset {offset}: {message}")]
    MalformedRecord {
        tag: String,
        offset: usize,
        message: String,
    },
    #[error("invalid type: {0}")]
    InvalidType(#[from] CodecError),
}

/// Raw words of one fixed-point record.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FixedPointRecord {
    word_length: u16,
    integer_word_length: u16,
    signed: bool,
}

fn resolve_tag(tag: &str) -> Result<TypeTag, ParseError> {
    TypeTag::from_name(tag).ok_or_else(|| ParseError::UnsupportedType(tag.to_string()))
}

fn parse_record(tag: TypeTag, text: &str, offset: usize) -> Result<FixedPointRecord, ParseError> {
    let malformed = |message: String| ParseError::MalformedRecord {
        tag: tag.name().to_string(),
        offset,
        message,
    };
    let pair = FlattenedTypeParser::parse(Rule::fixed_point_record, &text[offset..])
        .map_err(|e| malformed(e.to_string()))?
        .next()
        .ok_or_else(|| malformed("empty record".to_string()))?;

    let mut word_length = None;
    let mut integer_word_length = None;
    let mut signedness = None;
    for inner in pair.into_inner() {
        let slot = match inner.as_rule() {
            Rule::word_length => &mut word_length,
            Rule::integer_word_length => &mut integer_word_length,
            Rule::signedness => &mut signedness,
            _ => continue,
        };
        let word = u16::from_str_radix(inner.as_str(), 16).map_err(|e| malformed(e.to_string()))?;
        *slot = Some(word);
    }
    Ok(FixedPointRecord {
        word_length: word_length.ok_or_else(|| malformed("missing word length".to_string()))?,
        integer_word_length: integer_word_length
            .ok_or_else(|| malformed("missing integer word length".to_string()))?,
        signed: signedness.ok_or_else(|| malformed("missing signedness".to_string()))? != 0,
    })
}

/// Builds the fixed-point type whose code sits at `offset` in `text`.
fn fixed_point_at(tag: TypeTag, text: &str, offset: usize) -> Result<TypeDescriptor, ParseError> {
    if !tag.is_fixed_point() {
        return Err(ParseError::UnknownFixedPointTag(tag.name().to_string()));
    }
    let record = parse_record(tag, text, offset)?;
    let total = record.word_length as i32;
    // Integer word length is two's complement: values >= 2^15 are negative.
    let front = record.integer_word_length as i16 as i32;
    let ty: TypeDescriptor = match tag {
        TypeTag::Fxp => FixedPointType::new(front, total - front, record.signed)?.into(),
        _ => ComplexFixedPointType::new(front, total - front)?.into(),
    };
    Ok(ty)
}

/// Width-only type for integer and boolean tags.
pub fn integer_type(tag: TypeTag) -> Result<TypeDescriptor, ParseError> {
    match tag {
        TypeTag::Bool => Ok(FixedPointType::boolean().into()),
        _ => {
            let width = tag
                .fixed_width()
                .ok_or_else(|| ParseError::UnsupportedType(tag.name().to_string()))?;
            Ok(FixedPointType::integer(width, tag.is_signed_integer())?.into())
        }
    }
}

/// Parses the scalar fixed-point (`FXP`) or complex fixed-point (`CFXP`) type of a single
/// register. A code at offset 0 is treated as absent: flattened text always starts with a
/// header.
pub fn parse_fixed_point(tag: &str, text: &str) -> Result<TypeDescriptor, ParseError> {
    let t = resolve_tag(tag)?;
    let pos = match text.find(t.code()) {
        Some(p) if p > 0 => p,
        _ => {
            return Err(ParseError::CodeNotFound {
                tag: tag.to_string(),
            })
        }
    };
    let ty = fixed_point_at(t, text, pos)?;
    debug!(tag = %t, offset = pos, ty = %ty, "Parsed fixed-point type");
    Ok(ty)
}

/// Parses a scalar element of any tag: fixed-point tags read their record from `text`,
/// integer and boolean tags take their width from the catalog.
pub fn parse_scalar(tag: &str, text: &str) -> Result<TypeDescriptor, ParseError> {
    let t = resolve_tag(tag)?;
    if t.is_fixed_point() {
        parse_fixed_point(tag, text)
    } else {
        integer_type(t)
    }
}

/// Parses the field types of a cluster, in declaration order.
///
/// Codes are matched left to right: after each field the text is cut at the field's code
/// and advanced past it, so a tag whose code only appears earlier than the previous field's
/// fails with [`ParseError::FieldNotFound`] instead of misaligning fields.
pub fn parse_cluster<S: AsRef<str>>(
    tags: &[S],
    text: &str,
) -> Result<Vec<TypeDescriptor>, ParseError> {
    let mut out = Vec::with_capacity(tags.len());
    let mut rest = text;
    let mut consumed = 0;
    for (position, tag) in tags.iter().enumerate() {
        let tag = tag.as_ref();
        let t = resolve_tag(tag)?;
        let pos = rest.find(t.code()).ok_or_else(|| ParseError::FieldNotFound {
            tag: tag.to_string(),
            position,
        })?;
        rest = &rest[pos..];
        consumed += pos;
        let ty = if t.is_fixed_point() {
            fixed_point_at(t, rest, 0)?
        } else {
            integer_type(t)?
        };
        debug!(tag = %t, position, offset = consumed, ty = %ty, "Parsed cluster field");
        out.push(ty);
        rest = &rest[CODE_LEN..];
        consumed += CODE_LEN;
    }
    Ok(out)
}
