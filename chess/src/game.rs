//! Turn sequencing for a player-versus-AI match.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    apply_move, is_king_in_check, legal_moves, validate_move, Board, ChessError, ChessMove, Color,
    MoveOutcome, Piece, Square,
};

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChessStatus {
    /// The human player is to move.
    PlayerTurn,
    /// The AI is to move.
    AiTurn,
    /// The player captured the AI king or the AI ran out of moves.
    PlayerWins,
    /// The AI captured the player's king or the player ran out of moves.
    AiWins,
}

impl ChessStatus {
    /// Reports whether the match has been decided.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::PlayerWins | Self::AiWins)
    }
}

/// Player-versus-AI match. The player always has the white pieces.
#[derive(Clone, Debug)]
pub struct ChessMatch {
    board: Board,
    status: ChessStatus,
    move_count: u32,
    captured_by_white: Vec<Piece>,
    captured_by_black: Vec<Piece>,
    last_move: Option<ChessMove>,
    player_in_check: bool,
}

impl ChessMatch {
    /// Color controlled by the human player.
    pub const PLAYER: Color = Color::White;
    /// Color controlled by the AI.
    pub const AI: Color = Color::Black;

    /// Starts a match from the standard position with the player to move.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::initial(), ChessStatus::PlayerTurn)
    }

    /// Starts a match from an arbitrary position.
    #[must_use]
    pub fn from_board(board: Board, status: ChessStatus) -> Self {
        Self {
            board,
            status,
            move_count: 0,
            captured_by_white: Vec::new(),
            captured_by_black: Vec::new(),
            last_move: None,
            player_in_check: is_king_in_check(&board, Self::PLAYER),
        }
    }

    /// Current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ChessStatus {
        self.status
    }

    /// Side to move, `None` once the match is decided.
    #[must_use]
    pub fn side_to_move(&self) -> Option<Color> {
        match self.status {
            ChessStatus::PlayerTurn => Some(Self::PLAYER),
            ChessStatus::AiTurn => Some(Self::AI),
            ChessStatus::PlayerWins | ChessStatus::AiWins => None,
        }
    }

    /// Winning color, if the match is decided.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            ChessStatus::PlayerWins => Some(Self::PLAYER),
            ChessStatus::AiWins => Some(Self::AI),
            ChessStatus::PlayerTurn | ChessStatus::AiTurn => None,
        }
    }

    /// Moves applied by both sides.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Pieces captured by `color`, in capture order.
    #[must_use]
    pub fn captured_by(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.captured_by_white,
            Color::Black => &self.captured_by_black,
        }
    }

    /// Most recently applied move.
    #[must_use]
    pub fn last_move(&self) -> Option<ChessMove> {
        self.last_move
    }

    /// Whether the player's king is attacked in the current position.
    #[must_use]
    pub fn player_in_check(&self) -> bool {
        self.player_in_check
    }

    /// Plays a move for the human player.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        self.play_as(Self::PLAYER, from, to)
    }

    /// Plays a move for the AI.
    pub fn play_ai(&mut self, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
        self.play_as(Self::AI, from, to)
    }

    /// Plays a move for `color`, enforcing turn order, ownership and legality.
    ///
    /// Capturing the king ends the match on the spot: the board keeps its
    /// previous position and the move is not counted. The match also ends
    /// when the move leaves the opponent without a legal reply.
    pub fn play_as(
        &mut self,
        color: Color,
        from: Square,
        to: Square,
    ) -> Result<MoveOutcome, ChessError> {
        let side = self.side_to_move().ok_or(ChessError::GameOver)?;
        if side != color {
            return Err(ChessError::NotYourTurn);
        }

        let chess_move = ChessMove::new(from, to);
        let piece = self
            .board
            .piece_at(from)
            .ok_or(ChessError::InvalidMove(chess_move))?;
        if piece.color != color {
            return Err(ChessError::WrongColor(from));
        }
        if !validate_move(&self.board, from, to, piece) {
            return Err(ChessError::InvalidMove(chess_move));
        }

        let outcome = apply_move(&self.board, from, to)?;
        self.last_move = Some(chess_move);
        if let Some(captured) = outcome.captured {
            match color {
                Color::White => self.captured_by_white.push(captured),
                Color::Black => self.captured_by_black.push(captured),
            }
        }

        if outcome.king_captured {
            self.status = Self::victory_for(color);
            info!(status = ?self.status, moves = self.move_count, "king captured");
            return Ok(outcome);
        }

        self.board = outcome.board;
        self.move_count += 1;
        self.player_in_check = is_king_in_check(&self.board, Self::PLAYER);

        debug!(
            ?color,
            %chess_move,
            captured = ?outcome.captured.map(|piece| piece.kind),
            check = outcome.gives_check,
            "move applied"
        );

        let next = color.opponent();
        self.status = if legal_moves(&self.board, next).is_empty() {
            let status = Self::victory_for(color);
            info!(?status, moves = self.move_count, "no legal move");
            status
        } else if next == Self::PLAYER {
            ChessStatus::PlayerTurn
        } else {
            ChessStatus::AiTurn
        };

        Ok(outcome)
    }

    /// Ends the match if the side to move has no legal move.
    ///
    /// The opponent of the stalled side wins. A side that can still move keeps
    /// the turn. Returns the resulting status.
    pub fn declare_no_legal_move(&mut self) -> ChessStatus {
        let Some(side) = self.side_to_move() else {
            return self.status;
        };
        if legal_moves(&self.board, side).is_empty() {
            self.status = Self::victory_for(side.opponent());
            info!(status = ?self.status, moves = self.move_count, "no legal move");
        }
        self.status
    }

    /// Restores the starting position and clears all bookkeeping.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    const fn victory_for(color: Color) -> ChessStatus {
        match color {
            Color::White => ChessStatus::PlayerWins,
            Color::Black => ChessStatus::AiWins,
        }
    }
}

impl Default for ChessMatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{legal_moves, PieceKind};

    fn square(text: &str) -> Square {
        text.parse().expect("valid square")
    }

    #[test]
    fn turns_alternate_between_player_and_ai() {
        let mut game = ChessMatch::new();
        assert_eq!(
            game.play_ai(square("e7"), square("e5")),
            Err(ChessError::NotYourTurn)
        );

        let _ = game.play(square("e2"), square("e4")).expect("legal");
        assert_eq!(game.status(), ChessStatus::AiTurn);
        assert_eq!(
            game.play(square("d2"), square("d4")),
            Err(ChessError::NotYourTurn)
        );

        let _ = game.play_ai(square("e7"), square("e5")).expect("legal");
        assert_eq!(game.status(), ChessStatus::PlayerTurn);
        assert_eq!(game.move_count(), 2);
        assert_eq!(
            game.last_move(),
            Some(ChessMove::new(square("e7"), square("e5")))
        );
    }

    #[test]
    fn ownership_and_legality_are_enforced() {
        let mut game = ChessMatch::new();
        assert_eq!(
            game.play(square("e7"), square("e5")),
            Err(ChessError::WrongColor(square("e7")))
        );
        assert_eq!(
            game.play(square("e2"), square("e5")),
            Err(ChessError::InvalidMove(ChessMove::new(square("e2"), square("e5"))))
        );
        assert_eq!(
            game.play(square("e4"), square("e5")),
            Err(ChessError::InvalidMove(ChessMove::new(square("e4"), square("e5"))))
        );
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn king_capture_ends_the_match() {
        let board = Board::empty()
            .with_piece(square("e1"), Piece::new(PieceKind::King, Color::White))
            .with_piece(square("e8"), Piece::new(PieceKind::King, Color::Black))
            .with_piece(square("e2"), Piece::new(PieceKind::Rook, Color::White));
        let mut game = ChessMatch::from_board(board, ChessStatus::PlayerTurn);

        let outcome = game.play(square("e2"), square("e8")).expect("legal capture");
        assert!(outcome.king_captured);
        assert_eq!(game.status(), ChessStatus::PlayerWins);
        assert_eq!(game.board(), &board, "the capturing piece stays put");
        assert_eq!(game.move_count(), 0);
        assert_eq!(
            game.last_move(),
            Some(ChessMove::new(square("e2"), square("e8")))
        );
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(
            game.captured_by(Color::White),
            &[Piece::new(PieceKind::King, Color::Black)]
        );
        assert_eq!(
            game.play(square("e1"), square("e2")),
            Err(ChessError::GameOver)
        );
    }

    fn stalled_black() -> Board {
        Board::empty()
            .with_piece(square("e1"), Piece::new(PieceKind::King, Color::White))
            .with_piece(square("a6"), Piece::new(PieceKind::Pawn, Color::White))
            .with_piece(square("a7"), Piece::new(PieceKind::Pawn, Color::Black))
    }

    #[test]
    fn declaring_requires_a_stalled_side() {
        let mut game = ChessMatch::new();
        assert_eq!(legal_moves(game.board(), Color::White).len(), 20);
        assert_eq!(game.declare_no_legal_move(), ChessStatus::PlayerTurn);
        assert!(game.play(square("e2"), square("e4")).is_ok());

        let mut game = ChessMatch::from_board(stalled_black(), ChessStatus::AiTurn);
        assert_eq!(game.declare_no_legal_move(), ChessStatus::PlayerWins);
        assert_eq!(game.declare_no_legal_move(), ChessStatus::PlayerWins);
    }

    #[test]
    fn blocking_the_last_reply_wins() {
        let board = stalled_black()
            .without_piece(square("a6"))
            .with_piece(square("a5"), Piece::new(PieceKind::Pawn, Color::White));
        let mut game = ChessMatch::from_board(board, ChessStatus::PlayerTurn);

        let _ = game.play(square("a5"), square("a6")).expect("legal push");
        assert_eq!(game.status(), ChessStatus::PlayerWins);
        assert_eq!(game.board(), &stalled_black());
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn check_on_player_is_tracked_and_reset_restores_start() {
        let board = Board::empty()
            .with_piece(square("e1"), Piece::new(PieceKind::King, Color::White))
            .with_piece(square("a8"), Piece::new(PieceKind::King, Color::Black))
            .with_piece(square("d8"), Piece::new(PieceKind::Rook, Color::Black));
        let mut game = ChessMatch::from_board(board, ChessStatus::AiTurn);

        let _ = game.play_ai(square("d8"), square("e8")).expect("legal");
        assert!(game.player_in_check());

        game.reset();
        assert_eq!(game.board(), &Board::initial());
        assert_eq!(game.status(), ChessStatus::PlayerTurn);
        assert!(!game.player_in_check());
        assert!(game.captured_by(Color::Black).is_empty());
    }
}
