//! Check detection and the self-check filter over pseudo-legal moves.

use crate::board::{Board, Move, Position};
use crate::piece::{Color, PieceKind};

impl Board {
    /// Is the side to move in check.
    ///
    /// With `double_hops` set, a dog (or dog-borrowing chicken) that could
    /// capture twice in a row and reach the king also counts. A side without a
    /// king is always in check.
    pub fn is_check(&self, double_hops: bool) -> bool {
        self.is_color_in_check(self.side_to_move(), double_hops)
    }

    pub fn is_color_in_check(&self, color: Color, double_hops: bool) -> bool {
        let Ok(king) = self.king_position(color) else {
            return true;
        };
        let attackers = color.opponent();

        if self
            .pieces_of(attackers)
            .any(|(pos, _)| self.pseudo_captures(pos).contains(&king))
        {
            return true;
        }
        if !double_hops {
            return false;
        }

        self.double_hop_origins(attackers).into_iter().any(|origin| {
            self.pseudo_captures(origin).into_iter().any(|first| {
                let mut after = self.clone();
                after.apply_move(Move::new(origin, first)).is_ok()
                    && after.pseudo_captures(first).contains(&king)
            })
        })
    }

    /// Would playing `mv` leave the mover's own side in check.
    ///
    /// A first capture by a double-hop piece is only refused when every
    /// follow-up it is then forced to make still ends in check. Taking the
    /// enemy king is never refused.
    pub fn would_check_self(&self, mv: Move) -> bool {
        let Some(mover) = self.piece_at(mv.from) else {
            return false;
        };
        if self
            .piece_at(mv.to)
            .is_some_and(|target| target.kind == PieceKind::King && target.color != mover.color)
        {
            return false;
        }

        let mut after = self.clone();
        if after.apply_move(mv).is_err() {
            return true;
        }

        let first_of_double_hop = self.forced_move().is_none()
            && self.is_double_hop(mv.from)
            && self.pseudo_captures(mv.from).contains(&mv.to);
        if first_of_double_hop {
            return after.pseudo_legal_moves(mv.to).into_iter().all(|next| {
                let mut further = after.clone();
                if further.apply_move(Move::new(mv.to, next)).is_err() {
                    return true;
                }
                further.set_side_to_move(mover.color);
                further.is_check(false)
            });
        }

        after.set_side_to_move(mover.color);
        after.is_check(true)
    }

    /// Every destination for the piece at `origin` before the self-check filter.
    ///
    /// Empty unless the piece belongs to the side to move and is the forced
    /// piece when one is pending.
    pub fn pseudo_legal_moves(&self, origin: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(origin) else {
            return Vec::new();
        };
        if piece.color != self.side_to_move()
            || self.forced_move().is_some_and(|forced| forced != origin)
        {
            return Vec::new();
        }

        let mut moves = self.pseudo_moves(origin);
        moves.extend(self.pseudo_captures(origin));
        moves.extend(self.castle_moves(origin));
        moves.extend(self.en_passant_moves(origin));
        moves.sort();
        moves.dedup();
        moves
    }

    /// Legal destinations for the piece at `origin`, cached until the next mutation.
    pub fn legal_moves(&self, origin: Position) -> Vec<Position> {
        if let Some(moves) = self.cached_legal_moves(origin) {
            return moves;
        }
        let moves: Vec<Position> = self
            .pseudo_legal_moves(origin)
            .into_iter()
            .filter(|&to| !self.would_check_self(Move::new(origin, to)))
            .collect();
        self.cache_legal_moves(origin, moves.clone());
        moves
    }

    /// Every legal move for the side to move, in row-major origin order.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        Position::all()
            .flat_map(|from| {
                self.legal_moves(from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves(mv.from).contains(&mv.to)
    }
}
