//! Applying a move with all of its side effects.

use crate::board::{BOARD_SIZE, Board, BoardError, Move, Position};
use crate::codec;
use crate::piece::{Color, Piece, PieceKind};

impl Board {
    /// Plays `mv` on this board.
    ///
    /// Legality is not checked; callers pick moves from [`Board::legal_moves`].
    /// Order matters: captures are detected first, then every piece ticks, then
    /// the mover's promotion, capture or quiet-move effects are resolved.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), BoardError> {
        let Move { from, to } = mv;
        let Some(mover) = self.piece_at(from) else {
            return Err(BoardError::IllegalMoveRequested(from));
        };

        let mut capture = false;
        if self.en_passant_moves(from).contains(&to) {
            self.remove_en_passant_victim(to, mover.color);
            capture = true;
        }
        if self.is_opponent(to, mover.color) {
            capture = true;
        }
        let castle = if capture {
            None
        } else {
            self.castle_rook_move(mv)
        };

        self.tick_all_pieces();

        let Some(mut mover) = self.piece_at(from) else {
            return Err(BoardError::IllegalMoveRequested(from));
        };
        let cluster = self.cluster_kinds(from);
        let mut forced = self.forced_move();

        if mover.kind == PieceKind::Pawn && (to.row == 0 || to.row == BOARD_SIZE - 1) {
            let promoted = codec::promotion_piece(to)?;
            self.remove(from);
            self.place(to, Some(promoted));
        } else if capture {
            mover.on_capture();
            if cluster.contains(&PieceKind::Panda) {
                mover.immortal = true;
            }
            if mover.kind == PieceKind::Dog || cluster.contains(&PieceKind::Dog) {
                forced = match forced {
                    None => Some(to),
                    Some(_) => None,
                };
            }

            let splits = mover.kind.is_blob() || cluster.iter().any(|kind| kind.can_split());
            if splits && mover.kind == PieceKind::Chicken {
                // Lays an egg in place; the target survives and nothing is left to follow up.
                self.place(from, Some(Piece::new(PieceKind::Egg, mover.color)));
                forced = None;
            } else if let Some(half) = mover.kind.split_into().filter(|_| splits) {
                let half = Piece::new(half, mover.color);
                self.place(from, Some(half));
                self.place(to, Some(half));
            } else {
                self.relocate(from, to, mover);
            }
        } else {
            forced = None;
            mover.on_move();
            if let Some(rook_move) = castle {
                if let Some(mut rook) = self.remove(rook_move.from) {
                    rook.on_move();
                    self.place(rook_move.to, Some(rook));
                }
            } else if mover.kind == PieceKind::Pawn && from.row.abs_diff(to.row) >= 2 {
                mover.en_passant_eligible = true;
            }
            self.relocate(from, to, mover);
        }

        self.set_forced_move(forced);
        if forced.is_none() {
            self.advance_turn();
        }
        Ok(())
    }

    /// A copy of this board with `mv` played.
    pub fn successor(&self, mv: Move) -> Result<Board, BoardError> {
        let mut next = self.clone();
        next.apply_move(mv)?;
        Ok(next)
    }

    fn relocate(&mut self, from: Position, to: Position, piece: Piece) {
        self.remove(from);
        self.place(to, Some(piece));
    }

    /// Removes the pawn passed by an en passant capture landing on `landing`.
    fn remove_en_passant_victim(&mut self, landing: Position, by: Color) {
        let backwards = -by.forwards();
        for distance in 1..=2 {
            if let Some(pos) = landing.offset(backwards * distance, 0) {
                if self.is_en_passant_target(pos, by) {
                    self.remove(pos);
                    return;
                }
            }
        }
    }
}
