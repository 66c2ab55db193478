use quest_arcade_chess::{
    apply_move, is_king_in_check, legal_moves, validate_move, Board, Color, Piece, PieceKind,
    Square,
};

fn square(text: &str) -> Square {
    text.parse().expect("valid square")
}

fn deltas(from: Square, to: Square) -> (i16, i16) {
    (
        i16::from(to.row()) - i16::from(from.row()),
        i16::from(to.col()) - i16::from(from.col()),
    )
}

fn geometric_rule(kind: PieceKind, color: Color, from: Square, to: Square) -> bool {
    let (rows, cols) = deltas(from, to);
    let (dy, dx) = (rows.abs(), cols.abs());
    if dx == 0 && dy == 0 {
        return false;
    }
    match kind {
        PieceKind::Rook => dx == 0 || dy == 0,
        PieceKind::Bishop => dx == dy,
        PieceKind::Queen => dx == 0 || dy == 0 || dx == dy,
        PieceKind::Knight => (dx, dy) == (1, 2) || (dx, dy) == (2, 1),
        PieceKind::King => dx <= 1 && dy <= 1,
        PieceKind::Pawn => {
            let step = i16::from(color.pawn_direction());
            cols == 0
                && (rows == step
                    || (from.row() == color.pawn_row() && rows == 2 * step))
        }
    }
}

#[test]
fn lone_pieces_follow_their_closed_form_geometry() {
    let kinds = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    for color in [Color::White, Color::Black] {
        for kind in kinds {
            let piece = Piece::new(kind, color);
            for from in Square::all() {
                let board = Board::empty().with_piece(from, piece);
                for to in Square::all() {
                    assert_eq!(
                        validate_move(&board, from, to, piece),
                        geometric_rule(kind, color, from, to),
                        "{piece} {from}{to}"
                    );
                }
            }
        }
    }
}

#[test]
fn sliding_pieces_are_blocked_by_any_intermediate_piece() {
    let blockers = [
        Piece::new(PieceKind::Pawn, Color::White),
        Piece::new(PieceKind::Pawn, Color::Black),
    ];

    for kind in [PieceKind::Rook, PieceKind::Bishop, PieceKind::Queen] {
        let piece = Piece::new(kind, Color::White);
        let from = square("d4");
        for to in Square::all() {
            if !geometric_rule(kind, Color::White, from, to) {
                continue;
            }
            let (rows, cols) = deltas(from, to);
            let distance = rows.abs().max(cols.abs());
            if distance < 2 {
                continue;
            }
            let step = (rows.signum() as i8, cols.signum() as i8);
            let between = from.offset(step.0, step.1).expect("on board");

            for blocker in blockers {
                let board = Board::empty()
                    .with_piece(from, piece)
                    .with_piece(between, blocker);
                assert!(
                    !validate_move(&board, from, to, piece),
                    "{piece} {from}{to} jumped {between}"
                );
            }
        }
    }
}

#[test]
fn pawns_promote_to_queens_on_every_path() {
    let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
    let black_pawn = Piece::new(PieceKind::Pawn, Color::Black);
    let knight = |color| Piece::new(PieceKind::Knight, color);

    let board = Board::empty()
        .with_piece(square("b7"), white_pawn)
        .with_piece(square("c8"), knight(Color::Black))
        .with_piece(square("g2"), black_pawn)
        .with_piece(square("f1"), knight(Color::White));

    let cases = [
        ("b7", "b8", Color::White),
        ("b7", "c8", Color::White),
        ("g2", "g1", Color::Black),
        ("g2", "f1", Color::Black),
    ];

    for (from, to, color) in cases {
        let (from, to) = (square(from), square(to));
        let piece = board.piece_at(from).expect("pawn present");
        assert!(validate_move(&board, from, to, piece), "{from}{to}");

        let outcome = apply_move(&board, from, to).expect("piece present");
        assert!(outcome.promoted);
        assert_eq!(
            outcome.board.piece_at(to),
            Some(Piece::new(PieceKind::Queen, color))
        );
        assert_eq!(outcome.board.piece_at(from), None);
    }
}

#[test]
fn check_requires_an_attacking_piece() {
    let white_king = Piece::new(PieceKind::King, Color::White);
    let black_king = Piece::new(PieceKind::King, Color::Black);
    let kings_only = Board::empty()
        .with_piece(square("e1"), white_king)
        .with_piece(square("e8"), black_king);
    assert!(!is_king_in_check(&kings_only, Color::White));
    assert!(!is_king_in_check(&kings_only, Color::Black));

    let bishop_check = kings_only.with_piece(square("b4"), Piece::new(PieceKind::Bishop, Color::Black));
    assert!(is_king_in_check(&bishop_check, Color::White));

    let blocked = bishop_check.with_piece(square("d2"), Piece::new(PieceKind::Pawn, Color::White));
    assert!(!is_king_in_check(&blocked, Color::White));

    let pawn_check = kings_only.with_piece(square("d7"), Piece::new(PieceKind::Pawn, Color::White));
    assert!(is_king_in_check(&pawn_check, Color::Black));

    assert!(!is_king_in_check(&Board::empty(), Color::White));
}

#[test]
fn moving_into_check_is_not_prevented() {
    let board = Board::empty()
        .with_piece(square("e1"), Piece::new(PieceKind::King, Color::White))
        .with_piece(square("d8"), Piece::new(PieceKind::Rook, Color::Black));
    let king = Piece::new(PieceKind::King, Color::White);

    assert!(validate_move(&board, square("e1"), square("d1"), king));
    let outcome = apply_move(&board, square("e1"), square("d1")).expect("piece present");
    assert!(is_king_in_check(&outcome.board, Color::White));
}

#[test]
fn opening_pawn_push_is_legal_and_gives_no_check() {
    let board = Board::initial();
    let moves = legal_moves(&board, Color::White);
    assert!(moves
        .iter()
        .any(|candidate| candidate.from == square("e2") && candidate.to == square("e4")));

    let outcome = apply_move(&board, square("e2"), square("e4")).expect("piece present");
    assert!(!outcome.gives_check);
    assert_eq!((square("e4").row(), square("e4").col()), (4, 4));
}
