//! Random initial mapping.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::CompileResult;
use crate::layout::Layout;

/// Map qubit `i` to `permutation[i]` for a uniformly random permutation of
/// `0..n`.
pub fn random_layout<R: Rng + ?Sized>(n: u32, rng: &mut R) -> CompileResult<Layout> {
    let mut nodes: Vec<u32> = (0..n).collect();
    nodes.shuffle(rng);
    Layout::from_physical(nodes)
}
