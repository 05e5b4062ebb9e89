use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shapes::{Piece, PieceType};

// ============================================================================
// Piece Provider Trait
// ============================================================================

/// Source of upcoming pieces.
///
/// The caller passes in the type it generated last; providers keep no memory
/// of earlier draws, so two games never share history through a provider.
pub trait PieceProvider {
    fn next_type(&mut self, last: Option<PieceType>) -> PieceType;

    /// A fresh copy of the chosen template.
    fn next_piece(&mut self, last: Option<PieceType>) -> Piece {
        self.next_type(last).template()
    }
}

// ============================================================================
// Random Provider
// ============================================================================

/// Uniform draw over the seven types, never repeating `last`.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_type(&mut self, last: Option<PieceType>) -> PieceType {
        let candidates: Vec<PieceType> = PieceType::ALL
            .iter()
            .copied()
            .filter(|t| Some(*t) != last)
            .collect();
        candidates[self.rng.gen_range(0..candidates.len())]
    }
}

// ============================================================================
// Sequence Provider
// ============================================================================

/// Replays a fixed list of types in a loop, ignoring `last`.
pub struct SequencePieceProvider {
    pieces: Vec<PieceType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<PieceType>) -> Self {
        assert!(!pieces.is_empty(), "sequence must contain at least one piece");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_type(&mut self, _last: Option<PieceType>) -> PieceType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_provider_never_repeats_last() {
        let mut provider = RandomPieceProvider::seeded(7);
        let mut last = None;
        for _ in 0..1000 {
            let next = provider.next_type(last);
            assert_ne!(Some(next), last);
            last = Some(next);
        }
    }

    #[test]
    fn random_provider_reaches_every_type() {
        let mut provider = RandomPieceProvider::seeded(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(provider.next_type(None));
        }
        assert_eq!(seen.len(), PieceType::ALL.len());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomPieceProvider::seeded(99);
        let mut b = RandomPieceProvider::seeded(99);
        let mut last = None;
        for _ in 0..50 {
            let x = a.next_type(last);
            assert_eq!(x, b.next_type(last));
            last = Some(x);
        }
    }

    #[test]
    fn next_piece_is_a_fresh_template() {
        let mut provider = SequencePieceProvider::new(vec![PieceType::T]);
        let piece = provider.next_piece(None);
        assert_eq!(piece, PieceType::T.template());
        assert_eq!(piece.color, 6);
    }
}
