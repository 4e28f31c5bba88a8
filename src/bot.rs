use crate::board::{Board, Move};
use crate::piece::Color;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Trait that all bots must implement
pub trait Bot: Send {
    /// Get the name of the bot
    fn name(&self) -> &str;

    /// Get the next move for the current position
    /// The bot has a time limit to respond
    fn get_move(&mut self, board: &Board, time_limit: Duration) -> Option<Move>;

    /// Notified when the game starts
    fn game_start(&mut self, _color: Color) {}

    /// Notified when a move is made (by either player)
    fn notify_move(&mut self, _mv: Move) {}

    /// Notified when the game ends
    fn game_end(&mut self) {}
}

/// Plays a uniformly random legal move
pub struct RandomBot {
    name: String,
    rng: StdRng,
}

impl RandomBot {
    pub fn new(name: String) -> Self {
        RandomBot {
            name,
            rng: StdRng::from_entropy(),
        }
    }

    /// A bot whose choices are reproducible
    pub fn with_seed(name: String, seed: u64) -> Self {
        RandomBot {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board, _time_limit: Duration) -> Option<Move> {
        board.all_legal_moves().choose(&mut self.rng).copied()
    }
}

/// Takes whatever wins the most material right now
pub struct GreedyBot {
    name: String,
}

impl GreedyBot {
    pub fn new(name: String) -> Self {
        GreedyBot { name }
    }
}

impl Bot for GreedyBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board, _time_limit: Duration) -> Option<Move> {
        let sign = board.side_to_move().sign();
        board
            .successors()
            .into_iter()
            .max_by_key(|(_, next)| sign * next.material_difference())
            .map(|(mv, _)| mv)
    }
}

/// Fixed-depth material minimax
pub struct MinimaxBot {
    name: String,
    depth: u32,
}

impl MinimaxBot {
    pub fn new(name: String, depth: u32) -> Self {
        MinimaxBot { name, depth }
    }
}

impl Bot for MinimaxBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board, _time_limit: Duration) -> Option<Move> {
        board.minimax(self.depth).best_move
    }
}

/// Plays a forced mate when one exists, otherwise falls back to minimax
pub struct MateHunterBot {
    name: String,
    mate_depth: u32,
    depth: u32,
}

impl MateHunterBot {
    pub fn new(name: String, mate_depth: u32, depth: u32) -> Self {
        MateHunterBot {
            name,
            mate_depth,
            depth,
        }
    }
}

impl Bot for MateHunterBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, board: &Board, _time_limit: Duration) -> Option<Move> {
        board
            .find_mate_in(self.mate_depth, board.side_to_move())
            .or_else(|| board.minimax(self.depth).best_move)
    }
}
