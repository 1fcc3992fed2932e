//! Logical qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a logical qubit within a circuit.
///
/// Physical nodes of a topology are plain `u32` indices; `QubitId` exists so
/// the two index spaces cannot be mixed up at a call site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The qubit id as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}
