//! Inspect a flattened type: print its bit layout and optionally decode a raw register value.
//!
//! Usage:
//!   inspect_type [OPTIONS] FLATTENED_TYPE
//!
//! Options:
//!   --tag TAG                  Scalar element of the given tag (FXP, CFXP, I8, ..., Bool)
//!   --cluster TAG:NAME,...     Cluster element with the given fields, in declaration order
//!   --size N                   Declared size in bits; checked against the parsed type
//!   --value HEX                Raw element value (right-aligned hex) to decode
//!
//! Set RUST_LOG=debug to trace how the flattened text is parsed.

use anyhow::{anyhow, bail, Context};
use nifpga_fxp::{
    parse_cluster, parse_scalar, BitArray, ClusterType, ElementMetadata, FieldDescriptor,
    TypeDescriptor,
};
use tracing_subscriber::EnvFilter;

enum Layout {
    Scalar(String),
    Cluster(Vec<FieldDescriptor>),
}

struct Args {
    layout: Layout,
    size: Option<usize>,
    value: Option<String>,
    flattened: String,
}

fn usage() -> &'static str {
    "usage: inspect_type [--tag TAG | --cluster TAG:NAME,...] [--size N] [--value HEX] \
     FLATTENED_TYPE"
}

fn parse_fields(spec: &str) -> anyhow::Result<Vec<FieldDescriptor>> {
    spec.split(',')
        .map(|part| {
            let (tag, name) = part
                .split_once(':')
                .ok_or_else(|| anyhow!("cluster field {:?} is not TAG:NAME", part))?;
            Ok(FieldDescriptor::new(tag.trim(), name.trim()))
        })
        .collect()
}

fn parse_args() -> anyhow::Result<Args> {
    let mut layout = None;
    let mut size = None;
    let mut value = None;
    let mut flattened = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut next = |flag: &str| it.next().ok_or_else(|| anyhow!("{} needs a value", flag));
        match arg.as_str() {
            "--tag" | "-t" => layout = Some(Layout::Scalar(next("--tag")?)),
            "--cluster" | "-c" => {
                layout = Some(Layout::Cluster(parse_fields(&next("--cluster")?)?))
            }
            "--size" | "-s" => {
                let s = next("--size")?;
                size = Some(s.parse().with_context(|| format!("invalid size {:?}", s))?);
            }
            "--value" | "-v" => value = Some(next("--value")?),
            "--help" | "-h" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            s if s.starts_with('-') => bail!("unknown option {}\n{}", s, usage()),
            s => flattened = Some(s.to_string()),
        }
    }
    Ok(Args {
        layout: layout.unwrap_or_else(|| Layout::Scalar("FXP".to_string())),
        size,
        value,
        flattened: flattened.ok_or_else(|| anyhow!("missing flattened type\n{}", usage()))?,
    })
}

fn build(args: &Args) -> anyhow::Result<TypeDescriptor> {
    let ty = match (&args.layout, args.size) {
        (Layout::Scalar(tag), Some(size)) => {
            ElementMetadata::scalar("element", tag.as_str(), args.flattened.as_str(), size).build()?
        }
        (Layout::Cluster(fields), Some(size)) => {
            ElementMetadata::cluster("element", fields.clone(), args.flattened.as_str(), size)
                .build()?
        }
        (Layout::Scalar(tag), None) => parse_scalar(tag, &args.flattened)?,
        (Layout::Cluster(fields), None) => {
            let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
            let types = parse_cluster(&tags, &args.flattened)?;
            ClusterType::new(fields.iter().map(|f| f.name.clone()).zip(types))?.into()
        }
    };
    Ok(ty)
}

/// Right-aligned hex digits into 64-bit words, most significant first.
fn hex_to_words(hex: &str) -> anyhow::Result<Vec<u64>> {
    let digits: Vec<char> = hex
        .trim_start_matches("0x")
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if digits.is_empty() {
        bail!("empty value");
    }
    let mut words = Vec::new();
    let mut end = digits.len();
    while end > 0 {
        let start = end.saturating_sub(16);
        let chunk: String = digits[start..end].iter().collect();
        let word = u64::from_str_radix(&chunk, 16)
            .with_context(|| format!("invalid hex {:?}", chunk))?;
        words.push(word);
        end = start;
    }
    words.reverse();
    Ok(words)
}

fn print_layout(ty: &TypeDescriptor) {
    println!("type: {} ({} bits)", ty.type_name(), ty.num_bits());
    if let Some(cluster) = ty.as_cluster() {
        let mut offset = 0;
        for f in cluster.fields() {
            let width = f.ty.num_bits();
            println!(
                "  [{:>4}..{:<4}] {:<16} {}",
                offset,
                offset + width,
                f.name,
                f.ty.type_name()
            );
            offset += width;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let ty = build(&args)?;
    print_layout(&ty);

    if let Some(hex) = &args.value {
        let words = hex_to_words(hex)?;
        let bits = BitArray::from_words(&words, ty.num_bits())?;
        let value = ty.decode(&bits)?;
        println!("bits:  {}", bits);
        println!("value: {}", value);
    }
    Ok(())
}
