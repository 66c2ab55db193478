//! Move validation, check detection and move application.
//!
//! Validation is purely geometric: a move that leaves the mover's own king
//! attacked is still accepted.

use crate::{Board, ChessError, ChessMove, Color, Piece, PieceKind, Square};

/// Result of applying a move to a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after the move.
    pub board: Board,
    /// Piece that moved, before any promotion.
    pub mover: Piece,
    /// Piece removed from the destination square.
    pub captured: Option<Piece>,
    /// Whether the opponent's king is attacked afterwards.
    pub gives_check: bool,
    /// Whether the captured piece was a king.
    pub king_captured: bool,
    /// Whether a pawn was promoted to a queen.
    pub promoted: bool,
}

/// Reports whether `piece` standing on `from` may move to `to`.
///
/// Turn order and piece ownership are not checked here.
#[must_use]
pub fn validate_move(board: &Board, from: Square, to: Square, piece: Piece) -> bool {
    if from == to {
        return false;
    }

    let target = board.piece_at(to);
    if target.is_some_and(|target| target.color == piece.color) {
        return false;
    }

    let rows = i16::from(to.row()) - i16::from(from.row());
    let cols = i16::from(to.col()) - i16::from(from.col());
    let (dy, dx) = (rows.abs(), cols.abs());

    match piece.kind {
        PieceKind::Pawn => {
            let direction = i16::from(piece.color.pawn_direction());
            if cols == 0 && target.is_none() {
                if rows == direction {
                    return true;
                }
                if from.row() == piece.color.pawn_row() && rows == 2 * direction {
                    let middle = from.offset(piece.color.pawn_direction(), 0);
                    return middle.is_some_and(|middle| board.piece_at(middle).is_none());
                }
            }
            dx == 1 && rows == direction && target.is_some()
        }
        PieceKind::Rook => (dx == 0 || dy == 0) && path_clear(board, from, to),
        PieceKind::Bishop => dx == dy && path_clear(board, from, to),
        PieceKind::Queen => (dx == dy || dx == 0 || dy == 0) && path_clear(board, from, to),
        PieceKind::Knight => (dx == 2 && dy == 1) || (dx == 1 && dy == 2),
        PieceKind::King => dx <= 1 && dy <= 1,
    }
}

/// Steps from `from` toward `to` along a straight or diagonal line and
/// reports whether every square strictly between them is empty.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let row_step = (i16::from(to.row()) - i16::from(from.row())).signum() as i8;
    let col_step = (i16::from(to.col()) - i16::from(from.col())).signum() as i8;

    let mut cursor = from.offset(row_step, col_step);
    while let Some(square) = cursor {
        if square == to {
            return true;
        }
        if board.piece_at(square).is_some() {
            return false;
        }
        cursor = square.offset(row_step, col_step);
    }
    false
}

/// Reports whether any piece of the opponent can move onto the king of `color`.
///
/// A board without a king of `color` is never in check.
#[must_use]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };

    board
        .pieces(color.opponent())
        .any(|(square, piece)| validate_move(board, square, king, piece))
}

/// Moves the piece on `from` to `to`, returning the resulting board.
///
/// The move is not validated. A pawn landing on its promotion row becomes a
/// queen of the same color.
pub fn apply_move(board: &Board, from: Square, to: Square) -> Result<MoveOutcome, ChessError> {
    let mover = board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
    let captured = board.piece_at(to);

    let promoted = mover.kind == PieceKind::Pawn && to.row() == mover.color.promotion_row();
    let placed = if promoted {
        Piece::new(PieceKind::Queen, mover.color)
    } else {
        mover
    };

    let next = board.without_piece(from).with_piece(to, placed);

    Ok(MoveOutcome {
        board: next,
        mover,
        captured,
        gives_check: is_king_in_check(&next, mover.color.opponent()),
        king_captured: captured.is_some_and(|piece| piece.kind == PieceKind::King),
        promoted,
    })
}

/// Every valid move for `color`, own pieces in row-major order and then
/// destinations in row-major order.
#[must_use]
pub fn legal_moves(board: &Board, color: Color) -> Vec<ChessMove> {
    board
        .pieces(color)
        .flat_map(|(from, piece)| {
            Square::all()
                .filter(move |to| validate_move(board, from, *to, piece))
                .map(move |to| ChessMove::new(from, to))
        })
        .collect()
}

/// Destinations reachable by the piece on `from`, empty when the square is vacant.
#[must_use]
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    Square::all()
        .filter(|to| validate_move(board, from, *to, piece))
        .collect()
}
