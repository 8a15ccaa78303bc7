//! SPAKE2+ transcript construction.
//!
//! Every field of the transcript is written as `ENCAP(x) = len(x) || x`,
//! where `len` is an unsigned 64-bit little-endian byte count.

use zeroize::Zeroizing;

/// An encapsulated value for passing as input to the transcript hash.
pub(crate) struct Encap<'a>(pub(crate) &'a [u8]);

impl<'a> Encap<'a> {
    /// Return the length of the underlying data in bytes.
    fn len(&self) -> usize {
        self.0.len()
    }

    fn write_onto(&self, b: &mut Vec<u8>) {
        b.extend_from_slice(&(self.len() as u64).to_le_bytes());
        b.extend_from_slice(self.0);
    }
}

/// Accumulates encapsulated fields in order.
///
/// The transcript carries w0, so the buffer is wiped on drop.
#[derive(Default)]
pub(crate) struct Transcript(Zeroizing<Vec<u8>>);

impl Transcript {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write(&mut self, field: &[u8]) -> &mut Self {
        Encap(field).write_onto(&mut self.0);
        self
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
