pub mod arena;
pub mod board;
pub mod bot;
pub mod codec;
pub mod execute;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod piece;
pub mod search;

pub use arena::*;
pub use board::*;
pub use bot::*;
pub use codec::*;
pub use game::*;
pub use piece::*;
pub use search::*;
