//! Binary encoding of learned weights.
//!
//! Only the ordered layer list is written: each layer is its node list,
//! each node its weight list followed by its bias. There is no header and
//! no hyperparameters; the architecture is recovered from the nesting. The
//! format follows field order, so it is internal to this crate and not a
//! stable interchange format.

use std::io::{Read, Write};

use bincode::Options;

use crate::error::Result;
use crate::layers::Layer;

/// Fixed-width little-endian encoding: identical networks always produce
/// identical bytes.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

pub(crate) fn encode<W: Write>(layers: &[Layer], writer: W) -> Result<()> {
    codec().serialize_into(writer, layers)?;
    Ok(())
}

pub(crate) fn encode_to_vec(layers: &[Layer]) -> Result<Vec<u8>> {
    Ok(codec().serialize(layers)?)
}

/// Decodes a layer list. The structure is not validated here; see
/// `Network::from_layers`.
pub(crate) fn decode<R: Read>(mut reader: R) -> Result<Vec<Layer>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    // Nothing decoded can be larger than its own encoding; this stops a
    // corrupt length prefix from driving a huge allocation.
    let layers = codec()
        .with_limit(bytes.len() as u64)
        .deserialize(&bytes)?;
    Ok(layers)
}
