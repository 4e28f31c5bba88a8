//! Material minimax and forced mate search.
//!
//! Every branch works on its own cloned board; nothing here mutates `self`.

use crate::board::{Board, Move};
use crate::piece::Color;
use serde::{Deserialize, Serialize};

/// Outcome of a minimax search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` when the search depth was zero or no move was available.
    pub best_move: Option<Move>,
    /// The position after `best_move`, or the searched position itself.
    pub board: Board,
    pub score: i32,
}

/// A forcing line ending in checkmate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MateLine {
    /// Alternating moves, starting with whichever side was to move.
    pub moves: Vec<Move>,
    /// Number of moves the winner plays before the defender is mated.
    pub mate_in: u32,
}

impl Board {
    /// Every legal move paired with the position it leads to.
    pub fn successors(&self) -> Vec<(Move, Board)> {
        self.all_legal_moves()
            .into_iter()
            .filter_map(|mv| self.successor(mv).ok().map(|next| (mv, next)))
            .collect()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check(true) && self.all_legal_moves().is_empty()
    }

    /// Minimax over material difference to `depth` plies.
    ///
    /// White maximizes, black minimizes; whose turn it is comes from each
    /// board, so a pending forced move keeps the same side choosing. Ties keep
    /// the first move found.
    pub fn minimax(&self, depth: u32) -> SearchResult {
        let leaf = || SearchResult {
            best_move: None,
            board: self.clone(),
            score: self.material_difference(),
        };
        if depth == 0 {
            return leaf();
        }

        let maximizing = self.side_to_move() == Color::White;
        let mut best: Option<SearchResult> = None;
        for (mv, next) in self.successors() {
            let score = next.minimax(depth - 1).score;
            let improves = best.as_ref().is_none_or(|current| {
                if maximizing {
                    score > current.score
                } else {
                    score < current.score
                }
            });
            if improves {
                best = Some(SearchResult {
                    best_move: Some(mv),
                    board: next,
                    score,
                });
            }
        }
        best.unwrap_or_else(leaf)
    }

    /// A line forcing checkmate of `winner`'s opponent within `depth` winner moves.
    ///
    /// On the winner's turn only checking moves are explored and the first mate
    /// found is taken. On the defender's turn every reply must still lose; the
    /// reply that postpones mate longest is kept.
    pub fn mate_line(&self, depth: u32, winner: Color) -> Option<MateLine> {
        if depth == 0 {
            return None;
        }

        if self.side_to_move() == winner {
            for (mv, next) in self.successors() {
                if next.is_checkmate() {
                    return Some(MateLine {
                        moves: vec![mv],
                        mate_in: 1,
                    });
                }
                if !next.is_check(true) {
                    continue;
                }
                if let Some(rest) = next.mate_line(depth - 1, winner) {
                    let mut moves = vec![mv];
                    moves.extend(rest.moves);
                    return Some(MateLine {
                        moves,
                        mate_in: rest.mate_in + 1,
                    });
                }
            }
            return None;
        }

        let mut longest: Option<MateLine> = None;
        for (reply, next) in self.successors() {
            let rest = next.mate_line(depth, winner)?;
            if longest.as_ref().is_none_or(|line| rest.mate_in > line.mate_in) {
                let mut moves = vec![reply];
                moves.extend(rest.moves);
                longest = Some(MateLine {
                    moves,
                    mate_in: rest.mate_in,
                });
            }
        }
        Some(longest.unwrap_or(MateLine {
            moves: Vec::new(),
            mate_in: 0,
        }))
    }

    /// The first move of a forced mate for `winner` within `depth` winner moves.
    ///
    /// On `winner`'s turn this is the mating move to play. On the defender's
    /// turn a mate exists only if every reply loses, and the reply returned is
    /// the one that holds out longest. A defender with no replies at all gets
    /// `None`; use [`Board::mate_line`] to tell that case apart.
    pub fn find_mate_in(&self, depth: u32, winner: Color) -> Option<Move> {
        self.mate_line(depth, winner)
            .and_then(|line| line.moves.first().copied())
    }
}
