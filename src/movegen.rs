//! Pseudo-legal move generation.
//!
//! Everything here ignores whose turn it is and whether the mover's own king
//! ends up attacked; [`crate::legality`] layers those rules on top.

use crate::board::{Board, Move, Position};
use crate::piece::{Color, KING_STEPS, Offset, Piece, PieceKind};
use std::collections::BTreeSet;

/// En passant probes from the rank next to the midline: diagonal and sideways.
const EN_PASSANT_WIDE: [Offset; 4] = [(1, 1), (1, -1), (0, 1), (0, -1)];
/// En passant probes from the midline rank itself: diagonal only.
const EN_PASSANT_DIAGONAL: [Offset; 2] = [(1, 1), (1, -1)];

const KINGSIDE_ROOK_COL: usize = 9;
const PANDASIDE_ROOK_COL: usize = 0;
const KING_HOME_COL: usize = 5;

impl Board {
    /// Quiet destinations reachable from `origin`.
    pub fn pseudo_moves(&self, origin: Position) -> Vec<Position> {
        let mut moves: Vec<Position> = self
            .actors(origin)
            .iter()
            .flat_map(|actor| self.geometry_moves(origin, actor))
            .collect();
        moves.sort();
        moves.dedup();
        moves
    }

    /// Capturing destinations reachable from `origin`.
    pub fn pseudo_captures(&self, origin: Position) -> Vec<Position> {
        let mut captures: Vec<Position> = self
            .actors(origin)
            .iter()
            .flat_map(|actor| self.geometry_captures(origin, actor))
            .collect();
        captures.sort();
        captures.dedup();
        captures
    }

    /// The pieces whose geometry applies at `origin`.
    ///
    /// Normally just the occupant. A chicken instead acts as every distinct kind
    /// in its adjacency cluster, keeping its own moved flag for a borrowed pawn.
    fn actors(&self, origin: Position) -> Vec<Piece> {
        let Some(piece) = self.piece_at(origin) else {
            return Vec::new();
        };
        if piece.kind != PieceKind::Chicken {
            return vec![piece];
        }
        self.cluster_kinds(origin)
            .into_iter()
            .map(|kind| {
                let mut actor = Piece::new(kind, piece.color);
                if kind == PieceKind::Pawn {
                    actor.has_moved = piece.has_moved;
                }
                actor
            })
            .collect()
    }

    fn geometry_moves(&self, origin: Position, actor: &Piece) -> Vec<Position> {
        let mut moves = Vec::new();

        for &(dr, dc) in actor.movement_offsets() {
            if let Some(to) = origin.offset(dr, dc) {
                if self.is_empty(to) {
                    moves.push(to);
                }
            }
        }

        for slide in actor.move_slides() {
            let (dr, dc) = slide.direction;
            for step in 1..=slide.reach {
                match origin.offset(dr * step, dc * step) {
                    Some(to) if self.is_empty(to) => moves.push(to),
                    _ => break,
                }
            }
        }

        for &((gr, gc), (tr, tc)) in actor.dependent_moves() {
            if let (Some(gate), Some(to)) = (origin.offset(gr, gc), origin.offset(tr, tc)) {
                if self.is_empty(gate) && self.is_empty(to) {
                    moves.push(to);
                }
            }
        }

        moves
    }

    fn geometry_captures(&self, origin: Position, actor: &Piece) -> Vec<Position> {
        let mut captures = Vec::new();

        for &(dr, dc) in actor.capture_offsets() {
            if let Some(to) = origin.offset(dr, dc) {
                if self.is_capturable(to, actor.color) {
                    captures.push(to);
                }
            }
        }

        for slide in actor.capture_slides() {
            let (dr, dc) = slide.direction;
            for step in 1..=slide.reach {
                let Some(to) = origin.offset(dr * step, dc * step) else {
                    break;
                };
                if self.is_empty(to) {
                    continue;
                }
                if self.is_capturable(to, actor.color) {
                    captures.push(to);
                }
                break;
            }
        }

        // Hops only need an open gate; immortality is not consulted here.
        for &((gr, gc), (tr, tc)) in actor.dependent_captures() {
            if let (Some(gate), Some(to)) = (origin.offset(gr, gc), origin.offset(tr, tc)) {
                if self.is_empty(gate) && self.is_opponent(to, actor.color) {
                    captures.push(to);
                }
            }
        }

        captures
    }

    fn is_capturable(&self, pos: Position, by: Color) -> bool {
        self.piece_at(pos)
            .is_some_and(|target| target.color != by && !target.immortal)
    }

    /// Squares linked to the chicken at `origin` through chains of adjacent chickens.
    ///
    /// Includes the chickens themselves and every occupied square touching one of
    /// them, of either color. Any other occupant forms a cluster of one.
    pub fn adjacency_cluster(&self, origin: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(origin) else {
            return Vec::new();
        };
        if piece.kind != PieceKind::Chicken {
            return vec![origin];
        }

        let mut cluster = BTreeSet::from([origin]);
        let mut frontier = vec![origin];
        while let Some(pos) = frontier.pop() {
            for &(dr, dc) in &KING_STEPS {
                let Some(next) = pos.offset(dr, dc) else {
                    continue;
                };
                let Some(neighbour) = self.piece_at(next) else {
                    continue;
                };
                if cluster.insert(next) && neighbour.kind == PieceKind::Chicken {
                    frontier.push(next);
                }
            }
        }
        cluster.into_iter().collect()
    }

    /// Distinct borrowable kinds in the cluster of a chicken at `origin`.
    ///
    /// Empty for anything that is not a chicken.
    pub fn cluster_kinds(&self, origin: Position) -> Vec<PieceKind> {
        if !self
            .piece_at(origin)
            .is_some_and(|piece| piece.kind == PieceKind::Chicken)
        {
            return Vec::new();
        }
        let mut kinds = Vec::new();
        for pos in self.adjacency_cluster(origin) {
            if let Some(piece) = self.piece_at(pos) {
                if piece.kind.is_borrowable() && !kinds.contains(&piece.kind) {
                    kinds.push(piece.kind);
                }
            }
        }
        kinds
    }

    /// True when the occupant is, or borrows from, a piece of `kind`.
    pub(crate) fn acts_as(&self, origin: Position, kind: PieceKind) -> bool {
        self.piece_at(origin)
            .is_some_and(|piece| piece.kind == kind || self.cluster_kinds(origin).contains(&kind))
    }

    /// Can the piece at `origin` chain a second capture after its first one.
    pub fn is_double_hop(&self, origin: Position) -> bool {
        self.acts_as(origin, PieceKind::Dog)
    }

    pub fn double_hop_origins(&self, color: Color) -> Vec<Position> {
        self.pieces_of(color)
            .map(|(pos, _)| pos)
            .filter(|&pos| self.is_double_hop(pos))
            .collect()
    }

    /// Castling destinations for an unmoved king on its home square.
    ///
    /// Only the king's first step towards each rook is tested for check.
    pub fn castle_moves(&self, origin: Position) -> Vec<Position> {
        let Some(king) = self.piece_at(origin) else {
            return Vec::new();
        };
        let row = king.color.home_row();
        if king.kind != PieceKind::King
            || king.has_moved
            || origin != Position::new(row, KING_HOME_COL)
            || self.is_color_in_check(king.color, true)
        {
            return Vec::new();
        }

        let mut moves = Vec::new();
        if self.has_unmoved_rook(Position::new(row, PANDASIDE_ROOK_COL), king.color)
            && (1..=4).all(|col| self.is_empty(Position::new(row, col)))
            && !self.would_check_self(Move::new(origin, Position::new(row, 4)))
        {
            moves.push(Position::new(row, 3));
        }
        if self.has_unmoved_rook(Position::new(row, KINGSIDE_ROOK_COL), king.color)
            && (6..=8).all(|col| self.is_empty(Position::new(row, col)))
            && !self.would_check_self(Move::new(origin, Position::new(row, 6)))
        {
            moves.push(Position::new(row, 7));
        }
        moves
    }

    fn has_unmoved_rook(&self, pos: Position, color: Color) -> bool {
        self.piece_at(pos).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved
        })
    }

    /// The rook relocation implied by `mv` if it is a castling king move.
    pub(crate) fn castle_rook_move(&self, mv: Move) -> Option<Move> {
        let king = self.piece_at(mv.from)?;
        let row = king.color.home_row();
        if king.kind != PieceKind::King
            || king.has_moved
            || mv.from != Position::new(row, KING_HOME_COL)
            || mv.to.row != row
        {
            return None;
        }
        let (rook_from, rook_to) = match mv.to.col {
            7 => (KINGSIDE_ROOK_COL, 6),
            3 => (PANDASIDE_ROOK_COL, 4),
            _ => return None,
        };
        let rook_from = Position::new(row, rook_from);
        self.has_unmoved_rook(rook_from, king.color)
            .then(|| Move::new(rook_from, Position::new(row, rook_to)))
    }

    /// En passant destinations for a pawn, or a chicken with a pawn in its cluster.
    ///
    /// White captures from ranks 3 and 4, black from ranks 6 and 5. From the
    /// outer rank sideways targets count as well as diagonal ones.
    pub fn en_passant_moves(&self, origin: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(origin) else {
            return Vec::new();
        };
        if !self.acts_as(origin, PieceKind::Pawn) {
            return Vec::new();
        }
        let (probes, landing_row): (&[Offset], usize) = match (piece.color, origin.row) {
            (Color::White, 3) => (&EN_PASSANT_WIDE[..], 2),
            (Color::White, 4) => (&EN_PASSANT_DIAGONAL[..], 3),
            (Color::Black, 6) => (&EN_PASSANT_WIDE[..], 7),
            (Color::Black, 5) => (&EN_PASSANT_DIAGONAL[..], 6),
            _ => return Vec::new(),
        };

        let mut moves = Vec::new();
        for &(dr, dc) in probes {
            let Some(target) = origin.offset(dr, dc) else {
                continue;
            };
            if self.is_en_passant_target(target, piece.color) {
                moves.push(Position::new(landing_row, target.col));
            }
        }
        moves
    }

    pub(crate) fn is_en_passant_target(&self, pos: Position, by: Color) -> bool {
        self.piece_at(pos)
            .is_some_and(|target| target.color != by && target.en_passant_eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from;

    fn at(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_rook_slides_stop_at_first_blocker() {
        let board = board_from(
            &[(5, 5, 'r'), (5, 8, 'p'), (2, 5, 'P'), (0, 0, 'K'), (9, 0, 'k')],
            Color::White,
        );
        let moves = board.pseudo_moves(at(5, 5));
        assert!(moves.contains(&at(5, 7)));
        assert!(!moves.contains(&at(5, 8)));
        assert!(moves.contains(&at(3, 5)));
        assert!(!moves.contains(&at(2, 5)));
        assert!(moves.contains(&at(9, 5)));
        assert_eq!(board.pseudo_captures(at(5, 5)), vec![at(2, 5)]);
    }

    #[test]
    fn test_immortal_pieces_cannot_be_captured() {
        let board = board_from(&[(5, 5, 'r'), (2, 5, 'I')], Color::White);
        assert!(board.piece_at(at(2, 5)).unwrap().immortal);
        assert!(board.pseudo_captures(at(5, 5)).is_empty());
    }

    #[test]
    fn test_pawn_steps_forward_and_captures_diagonally() {
        let board = board_from(&[(6, 5, 'p'), (5, 4, 'P'), (4, 5, 'P')], Color::White);
        assert_eq!(board.pseudo_moves(at(6, 5)), vec![at(5, 5)]);
        assert_eq!(board.pseudo_captures(at(6, 5)), vec![at(5, 4)]);

        let black = board_from(&[(1, 2, 'P')], Color::Black);
        assert_eq!(
            black.pseudo_moves(at(1, 2)),
            vec![at(2, 2), at(3, 2), at(4, 2)]
        );
    }

    #[test]
    fn test_cleric_moves_anywhere_but_captures_on_diagonals() {
        let board = board_from(&[(5, 5, 'c'), (5, 6, 'P'), (3, 3, 'P')], Color::White);
        assert_eq!(board.pseudo_moves(at(5, 5)).len(), 97);
        assert_eq!(board.pseudo_captures(at(5, 5)), vec![at(3, 3)]);
    }

    #[test]
    fn test_blob_hop_needs_an_open_gate() {
        let open = board_from(&[(5, 5, 'z'), (7, 6, 'P')], Color::White);
        assert!(open.pseudo_captures(at(5, 5)).contains(&at(7, 6)));
        assert!(open.pseudo_moves(at(5, 5)).contains(&at(6, 7)));

        let gated = board_from(&[(5, 5, 'z'), (6, 6, 'p'), (7, 6, 'P')], Color::White);
        assert!(!gated.pseudo_captures(at(5, 5)).contains(&at(7, 6)));
    }

    #[test]
    fn test_chicken_borrows_through_chains() {
        let board = board_from(&[(5, 5, 'o'), (5, 6, 'o'), (5, 7, 'r')], Color::White);
        assert_eq!(
            board.adjacency_cluster(at(5, 5)),
            vec![at(5, 5), at(5, 6), at(5, 7)]
        );
        assert_eq!(board.cluster_kinds(at(5, 5)), vec![PieceKind::Rook]);
        let moves = board.pseudo_moves(at(5, 5));
        assert!(moves.contains(&at(5, 0)));
        assert!(moves.contains(&at(0, 5)));
    }

    #[test]
    fn test_chicken_borrows_dog_and_becomes_double_hop() {
        let board = board_from(&[(5, 5, 'o'), (5, 6, 'D'), (3, 4, 'P')], Color::White);
        assert_eq!(board.cluster_kinds(at(5, 5)), vec![PieceKind::Dog]);
        assert!(board.pseudo_captures(at(5, 5)).contains(&at(3, 4)));
        assert!(board.is_double_hop(at(5, 5)));
        assert_eq!(board.double_hop_origins(Color::White), vec![at(5, 5)]);
    }

    #[test]
    fn test_lonely_chicken_cannot_move() {
        let board = board_from(&[(5, 5, 'h')], Color::White);
        assert!(board.pseudo_moves(at(5, 5)).is_empty());
        assert!(board.pseudo_captures(at(5, 5)).is_empty());
    }

    #[test]
    fn test_borrowed_pawn_keeps_chicken_moved_flag() {
        let fresh = board_from(&[(6, 5, 'h'), (6, 6, 'p')], Color::White);
        assert_eq!(
            fresh.pseudo_moves(at(6, 5)),
            vec![at(3, 5), at(4, 5), at(5, 5)]
        );
        let moved = board_from(&[(6, 5, 'o'), (6, 6, 'p')], Color::White);
        assert_eq!(moved.pseudo_moves(at(6, 5)), vec![at(5, 5)]);
    }

    #[test]
    fn test_en_passant_targets() {
        let board = board_from(&[(3, 4, '/'), (3, 5, 'E'), (4, 3, 'E')], Color::White);
        assert_eq!(board.en_passant_moves(at(3, 4)), vec![at(2, 3), at(2, 5)]);

        let stale = board_from(&[(3, 4, '/'), (3, 5, '?')], Color::White);
        assert!(stale.en_passant_moves(at(3, 4)).is_empty());

        let wrong_rank = board_from(&[(5, 4, '/'), (5, 5, 'E')], Color::White);
        assert!(wrong_rank.en_passant_moves(at(5, 4)).is_empty());
    }

    #[test]
    fn test_castling_towards_unmoved_rooks() {
        let both = board_from(
            &[(9, 5, 'k'), (9, 9, 'r'), (9, 0, 'r'), (0, 0, 'K')],
            Color::White,
        );
        assert_eq!(both.castle_moves(at(9, 5)), vec![at(9, 3), at(9, 7)]);
        assert_eq!(
            both.castle_rook_move(Move::new(at(9, 5), at(9, 7))),
            Some(Move::new(at(9, 9), at(9, 6)))
        );
        assert_eq!(
            both.castle_rook_move(Move::new(at(9, 5), at(9, 3))),
            Some(Move::new(at(9, 0), at(9, 4)))
        );
        assert_eq!(both.castle_rook_move(Move::new(at(9, 5), at(9, 6))), None);

        let moved_rook = board_from(&[(9, 5, 'k'), (9, 9, 'm'), (0, 0, 'K')], Color::White);
        assert!(moved_rook.castle_moves(at(9, 5)).is_empty());

        let returned_king = board_from(&[(9, 5, '('), (9, 9, 'r'), (0, 0, 'K')], Color::White);
        assert!(returned_king.castle_moves(at(9, 5)).is_empty());

        let blocked = board_from(
            &[(9, 5, 'k'), (9, 9, 'r'), (9, 8, 'd'), (0, 0, 'K')],
            Color::White,
        );
        assert!(blocked.castle_moves(at(9, 5)).is_empty());
    }

    #[test]
    fn test_no_castling_out_of_check() {
        let board = board_from(
            &[(9, 5, 'k'), (9, 9, 'r'), (9, 0, 'r'), (0, 5, 'R'), (0, 0, 'K')],
            Color::White,
        );
        assert!(board.is_color_in_check(Color::White, true));
        assert!(board.castle_moves(at(9, 5)).is_empty());
    }

    #[test]
    fn test_chicken_takes_en_passant_through_pawn() {
        let board = board_from(
            &[(3, 4, 'o'), (3, 3, 'p'), (3, 5, 'E'), (9, 0, 'k'), (0, 9, 'K')],
            Color::White,
        );
        assert_eq!(board.en_passant_moves(at(3, 4)), vec![at(2, 5)]);

        let wrong_rank = board_from(&[(5, 4, 'o'), (5, 3, 'p'), (5, 5, 'E')], Color::White);
        assert!(wrong_rank.en_passant_moves(at(5, 4)).is_empty());
    }

    #[test]
    fn test_no_castling_through_attacked_first_step() {
        let board = board_from(
            &[(9, 5, 'k'), (9, 9, 'r'), (0, 6, 'R'), (0, 0, 'K')],
            Color::White,
        );
        assert!(board.castle_moves(at(9, 5)).is_empty());
    }
}
