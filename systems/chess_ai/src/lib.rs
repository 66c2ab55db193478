#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy chess opponent: grab the most valuable capture, otherwise drift to the centre.

use quest_arcade_chess::{legal_moves, Board, ChessMove, Color, Square};
use rand::Rng;
use tracing::debug;

/// Centre of the board in row and column coordinates.
const CENTRE: f64 = 3.5;

/// Greedy move selector with a randomised tie-break between quiet moves.
#[derive(Debug, Default)]
pub struct ChessAi {
    moves: Vec<ChessMove>,
}

impl ChessAi {
    /// Creates a new selector with an empty move buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks a move for `color`, or `None` when it has no valid move.
    ///
    /// Captures always beat quiet moves. Among captures the most valuable
    /// victim wins and ties go to the first one enumerated. Quiet moves are
    /// ranked by Manhattan distance of the destination from the centre plus
    /// a jitter drawn uniformly from `[-1, 1)` once per candidate; the
    /// smallest key wins and ties go to the first one enumerated.
    pub fn select_move<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        color: Color,
        rng: &mut R,
    ) -> Option<ChessMove> {
        self.moves.clear();
        self.moves.extend(legal_moves(board, color));

        let mut best_capture: Option<(u32, ChessMove)> = None;
        for candidate in &self.moves {
            let Some(victim) = board.piece_at(candidate.to) else {
                continue;
            };
            let value = victim.kind.value();
            if best_capture.map_or(true, |(best, _)| value > best) {
                best_capture = Some((value, *candidate));
            }
        }

        if let Some((value, capture)) = best_capture {
            debug!(%capture, value, "capture selected");
            return Some(capture);
        }

        let mut best_quiet: Option<(f64, ChessMove)> = None;
        for candidate in &self.moves {
            let key = centre_distance(candidate.to) + rng.gen_range(-1.0..1.0);
            if best_quiet.map_or(true, |(best, _)| key < best) {
                best_quiet = Some((key, *candidate));
            }
        }

        if let Some((_, quiet)) = best_quiet {
            debug!(%quiet, candidates = self.moves.len(), "quiet move selected");
        }
        best_quiet.map(|(_, quiet)| quiet)
    }
}

/// Manhattan distance from the destination to the centre of the board.
#[must_use]
pub fn centre_distance(square: Square) -> f64 {
    (CENTRE - f64::from(square.row())).abs() + (CENTRE - f64::from(square.col())).abs()
}

/// Picks a move for black, the side the AI plays.
pub fn select_ai_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<ChessMove> {
    ChessAi::new().select_move(board, Color::Black, rng)
}
