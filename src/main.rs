use chess_plus::*;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search a position of the 10x10 chess variant", long_about = None)]
struct Args {
    /// 100-character board string, row-major from row 0
    #[arg(default_value_t = String::from(STARTING_POSITION))]
    board: String,

    /// "0" for black to move, anything else for white
    #[arg(default_value_t = String::from("1"))]
    side: String,

    /// Minimax depth in plies
    #[arg(default_value_t = 3)]
    depth: u32,

    /// Forced mate search depth in winner moves (defaults to the minimax depth)
    #[arg(long)]
    mate_depth: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchReport {
    board: String,
    side_to_move: Color,
    depth: u32,
    best_move: Option<Move>,
    score: i32,
    resulting_board: String,
    in_check: bool,
    checkmate: bool,
    mate: Option<MateLine>,
}

fn main() {
    let args = Args::parse();

    let side = if args.side == "0" {
        Color::Black
    } else {
        Color::White
    };

    let (board, warnings) = match Board::parse_board_string(&args.board, side) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    let result = board.minimax(args.depth);
    let mate_depth = args.mate_depth.unwrap_or(args.depth);
    let report = SearchReport {
        board: board.to_board_string(),
        side_to_move: side,
        depth: args.depth,
        best_move: result.best_move,
        score: result.score,
        resulting_board: result.board.to_board_string(),
        in_check: board.is_check(true),
        checkmate: board.is_checkmate(),
        mate: board.mate_line(mate_depth, side),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("{}", board.display_board());
    if report.checkmate {
        println!("{} is checkmated", side);
    } else if report.in_check {
        println!("{} is in check", side);
    }

    match report.best_move {
        Some(mv) => {
            println!("Best move at depth {}: {} (score {})", args.depth, mv, report.score);
            println!("{}", result.board.display_board());
        }
        None => println!("No move available (score {})", report.score),
    }

    match &report.mate {
        Some(line) => {
            let moves: Vec<String> = line.moves.iter().map(|m| m.to_string()).collect();
            println!("Mate in {}: {}", line.mate_in, moves.join(", "));
        }
        None => println!("No forced mate within {} moves", mate_depth),
    }
}
