use crate::board::{Board, Move};
use crate::bot::Bot;
use crate::game::{Game, GameResult};
use crate::piece::Color;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub time_per_move: Duration,
    pub max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    WhiteWins { winner_name: String, moves: usize },
    BlackWins { winner_name: String, moves: usize },
    Draw { moves: usize },
    Timeout { violator: String, winner: String },
    IllegalMove { violator: String, winner: String },
}

impl MatchResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::WhiteWins { winner_name, .. } => Some(winner_name),
            MatchResult::BlackWins { winner_name, .. } => Some(winner_name),
            MatchResult::Timeout { winner, .. } => Some(winner),
            MatchResult::IllegalMove { winner, .. } => Some(winner),
            MatchResult::Draw { .. } => None,
        }
    }
}

/// Two bots playing one game
pub struct Match {
    config: MatchConfig,
    game: Game,
    white_bot: Box<dyn Bot>,
    black_bot: Box<dyn Bot>,
    verbose: bool,
}

impl Match {
    pub fn new(
        white_bot: Box<dyn Bot>,
        black_bot: Box<dyn Bot>,
        config: MatchConfig,
        verbose: bool,
    ) -> Self {
        Self::from_board(
            white_bot,
            black_bot,
            Board::starting_position(),
            config,
            verbose,
        )
    }

    pub fn from_board(
        white_bot: Box<dyn Bot>,
        black_bot: Box<dyn Bot>,
        board: Board,
        config: MatchConfig,
        verbose: bool,
    ) -> Self {
        Match {
            config,
            game: Game::from_board(board),
            white_bot,
            black_bot,
            verbose,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn play(&mut self) -> MatchResult {
        // Notify bots that game is starting
        self.white_bot.game_start(Color::White);
        self.black_bot.game_start(Color::Black);

        if self.verbose {
            println!("Match starting:");
            println!("  White: {}", self.white_bot.name());
            println!("  Black: {}", self.black_bot.name());
            println!("\nInitial board:");
            println!("{}", self.game.display_board());
        }

        while !self.game.is_game_over() && self.game.move_count() < self.config.max_moves {
            if let Some(result) = self.play_move(self.game.side_to_move()) {
                return result;
            }
        }

        // Game ended normally
        self.white_bot.game_end();
        self.black_bot.game_end();

        let moves = self.game.move_count();

        match self.game.result() {
            Some(GameResult::WhiteWins) => {
                if self.verbose {
                    println!("\n{} wins as White!", self.white_bot.name());
                }
                MatchResult::WhiteWins {
                    winner_name: self.white_bot.name().to_string(),
                    moves,
                }
            }
            Some(GameResult::BlackWins) => {
                if self.verbose {
                    println!("\n{} wins as Black!", self.black_bot.name());
                }
                MatchResult::BlackWins {
                    winner_name: self.black_bot.name().to_string(),
                    moves,
                }
            }
            Some(GameResult::Draw) => {
                if self.verbose {
                    println!("\nGame is a draw!");
                }
                MatchResult::Draw { moves }
            }
            None => {
                // Max moves reached
                if self.verbose {
                    println!("\nMax moves ({}) reached - Draw!", self.config.max_moves);
                }
                MatchResult::Draw { moves }
            }
        }
    }

    fn play_move(&mut self, side: Color) -> Option<MatchResult> {
        let bot = match side {
            Color::White => &mut self.white_bot,
            Color::Black => &mut self.black_bot,
        };

        if self.verbose {
            println!("\nMove {}: {} to play", self.game.move_count() + 1, bot.name());
            println!("Legal moves: {}", self.game.legal_moves().len());
            if let Some(forced) = self.game.board().forced_move() {
                println!("Forced to continue from {}", forced);
            }
        }

        // Get move from bot with time limit
        let start = Instant::now();
        let mv = bot.get_move(self.game.board(), self.config.time_per_move);
        let elapsed = start.elapsed();

        self.handle_move_result(mv, elapsed, side)
    }

    fn bot_names(&self, side: Color) -> (String, String) {
        let (own, other) = match side {
            Color::White => (&self.white_bot, &self.black_bot),
            Color::Black => (&self.black_bot, &self.white_bot),
        };
        (own.name().to_string(), other.name().to_string())
    }

    fn handle_move_result(
        &mut self,
        mv: Option<Move>,
        elapsed: Duration,
        side: Color,
    ) -> Option<MatchResult> {
        let (bot_name, opponent_name) = self.bot_names(side);

        // Check timeout
        if elapsed > self.config.time_per_move {
            if self.verbose {
                println!(
                    "TIMEOUT: {} took {:?} (limit: {:?})",
                    bot_name, elapsed, self.config.time_per_move
                );
            }

            return Some(MatchResult::Timeout {
                violator: bot_name,
                winner: opponent_name,
            });
        }

        // Check if bot returned a move
        let Some(mv) = mv else {
            if self.verbose {
                println!("{} returned no move", bot_name);
            }

            return Some(MatchResult::Draw {
                moves: self.game.move_count(),
            });
        };

        if self.verbose {
            println!("{} plays: {} (took {:?})", bot_name, mv, elapsed);
        }

        // Make the move
        if let Err(e) = self.game.make_move(mv) {
            if self.verbose {
                println!("ILLEGAL MOVE: {} - {}", bot_name, e);
            }

            return Some(MatchResult::IllegalMove {
                violator: bot_name,
                winner: opponent_name,
            });
        }

        // Notify both bots of the move
        self.white_bot.notify_move(mv);
        self.black_bot.notify_move(mv);

        if self.verbose {
            println!("{}", self.game.display_board());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Position, board_from};
    use crate::bot::{GreedyBot, MateHunterBot, RandomBot};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Always asks to move a piece that is not there
    struct BlunderBot;

    impl Bot for BlunderBot {
        fn name(&self) -> &str {
            "Blunder"
        }

        fn get_move(&mut self, _board: &Board, _time_limit: Duration) -> Option<Move> {
            Some(Move::new(Position::new(5, 5), Position::new(4, 5)))
        }
    }

    /// Sleeps past any short limit before answering
    struct SlowBot;

    impl Bot for SlowBot {
        fn name(&self) -> &str {
            "Slow"
        }

        fn get_move(&mut self, board: &Board, _time_limit: Duration) -> Option<Move> {
            std::thread::sleep(Duration::from_millis(20));
            board.all_legal_moves().first().copied()
        }
    }

    #[test]
    fn test_random_match_respects_move_cap() {
        let config = MatchConfig {
            max_moves: 12,
            ..MatchConfig::default()
        };
        let mut game = Match::new(
            Box::new(RandomBot::with_seed("A".to_string(), 1)),
            Box::new(RandomBot::with_seed("B".to_string(), 2)),
            config,
            false,
        );
        let result = game.play();
        match result {
            MatchResult::Draw { moves }
            | MatchResult::WhiteWins { moves, .. }
            | MatchResult::BlackWins { moves, .. } => assert!(moves <= 12),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_match_from_random_position() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::random_position(&mut rng, 300, Color::White);
        let config = MatchConfig {
            max_moves: 8,
            ..MatchConfig::default()
        };
        let mut game = Match::from_board(
            Box::new(RandomBot::with_seed("A".to_string(), 4)),
            Box::new(GreedyBot::new("B".to_string())),
            board,
            config,
            false,
        );
        let result = game.play();
        assert!(!matches!(
            result,
            MatchResult::Timeout { .. } | MatchResult::IllegalMove { .. }
        ));
        assert!(game.game().move_count() <= 8);
    }

    #[test]
    fn test_mate_hunter_wins() {
        let board = board_from(
            &[(1, 9, 'm'), (5, 8, 'm'), (0, 0, 'K'), (9, 0, 'k')],
            Color::White,
        );
        let mut game = Match::from_board(
            Box::new(MateHunterBot::new("Hunter".to_string(), 1, 1)),
            Box::new(RandomBot::with_seed("Prey".to_string(), 3)),
            board,
            MatchConfig::default(),
            false,
        );
        let result = game.play();
        assert_eq!(
            result,
            MatchResult::WhiteWins {
                winner_name: "Hunter".to_string(),
                moves: 1
            }
        );
        assert_eq!(result.winner(), Some("Hunter"));
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let mut game = Match::new(
            Box::new(BlunderBot),
            Box::new(RandomBot::new("Random".to_string())),
            MatchConfig::default(),
            false,
        );
        assert_eq!(
            game.play(),
            MatchResult::IllegalMove {
                violator: "Blunder".to_string(),
                winner: "Random".to_string()
            }
        );
    }

    #[test]
    fn test_timeout_forfeits() {
        let config = MatchConfig {
            time_per_move: Duration::from_millis(1),
            max_moves: 10,
        };
        let mut game = Match::new(
            Box::new(SlowBot),
            Box::new(RandomBot::new("Random".to_string())),
            config,
            false,
        );
        let result = game.play();
        assert!(matches!(
            result,
            MatchResult::Timeout { ref violator, .. } if violator == "Slow"
        ));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = MatchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.time_per_move, Duration::from_secs(5));
        assert_eq!(restored.max_moves, 200);
    }
}
