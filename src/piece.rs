use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative (row, column) step.
pub type Offset = (i32, i32);

/// A gate offset that must be empty, paired with the target it unlocks.
pub type Hop = (Offset, Offset);

/// Number of ticks a freshly laid egg waits before hatching.
pub const EGG_INCUBATION: u8 = 6;

/// A sliding direction and how many squares it may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub direction: Offset,
    pub reach: i32,
}

impl Slide {
    const fn new(direction: Offset, reach: i32) -> Self {
        Slide { direction, reach }
    }
}

/// The eight surrounding squares.
pub const KING_STEPS: [Offset; 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const ORTHOGONAL_STEPS: [Offset; 4] = [(1, 0), (0, 1), (0, -1), (-1, 0)];

const DOG_LEAPS: [Offset; 8] = [
    (2, 1),
    (2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

const FROG_LEAPS: [Offset; 20] = [
    (3, 0),
    (2, 2),
    (2, 0),
    (2, -2),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 3),
    (0, 2),
    (0, 1),
    (0, -1),
    (0, -2),
    (0, -3),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (-2, 2),
    (-2, 0),
    (-2, -2),
    (-3, 0),
];

/// Every non-zero offset that can land anywhere on a 10x10 board from anywhere.
const CLERIC_MOVES: [Offset; 360] = everywhere();

const fn everywhere() -> [Offset; 360] {
    let mut table = [(0, 0); 360];
    let mut i = 0;
    let mut row = -9;
    while row <= 9 {
        let mut col = -9;
        while col <= 9 {
            if row != 0 || col != 0 {
                table[i] = (row, col);
                i += 1;
            }
            col += 1;
        }
        row += 1;
    }
    table
}

const ROOK_SLIDES: [Slide; 4] = [
    Slide::new((1, 0), 10),
    Slide::new((0, 1), 10),
    Slide::new((-1, 0), 10),
    Slide::new((0, -1), 10),
];

const DIAGONAL_SLIDES: [Slide; 4] = [
    Slide::new((1, 1), 10),
    Slide::new((1, -1), 10),
    Slide::new((-1, 1), 10),
    Slide::new((-1, -1), 10),
];

const SHORT_ORTHOGONAL_SLIDES: [Slide; 4] = [
    Slide::new((1, 0), 2),
    Slide::new((0, 1), 2),
    Slide::new((0, -1), 2),
    Slide::new((-1, 0), 2),
];

const BLOB0_HOPS: [Hop; 8] = [
    ((1, 1), (2, 1)),
    ((1, 1), (1, 2)),
    ((1, -1), (2, -1)),
    ((1, -1), (1, -2)),
    ((-1, 1), (-1, 2)),
    ((-1, 1), (-2, 1)),
    ((-1, -1), (-1, -2)),
    ((-1, -1), (-2, -1)),
];

const WHITE_PAWN_STEP: [Offset; 1] = [(-1, 0)];
const BLACK_PAWN_STEP: [Offset; 1] = [(1, 0)];
const WHITE_PAWN_CAPTURES: [Offset; 2] = [(-1, -1), (-1, 1)];
const BLACK_PAWN_CAPTURES: [Offset; 2] = [(1, -1), (1, 1)];
const WHITE_PAWN_RUSH: [Slide; 1] = [Slide::new((-1, 0), 3)];
const BLACK_PAWN_RUSH: [Slide; 1] = [Slide::new((1, 0), 3)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for white, -1 for black. Applied to material and integer codes.
    pub fn sign(&self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row delta of a pawn step. White advances towards row 0.
    pub fn forwards(&self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this side's king and rooks at the start of a game.
    pub fn home_row(&self) -> usize {
        match self {
            Color::White => 9,
            Color::Black => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    King,
    Cleric,
    Panda,
    Frog,
    Dog,
    Chicken,
    Egg,
    Blob0,
    Blob1,
    Blob2,
    Blob3,
}

impl PieceKind {
    /// Material weight, always positive.
    pub fn base_value(&self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Rook => 4,
            PieceKind::King => 100,
            PieceKind::Cleric => 4,
            PieceKind::Panda => 3,
            PieceKind::Frog => 5,
            PieceKind::Dog => 6,
            PieceKind::Chicken => 4,
            PieceKind::Egg => 3,
            PieceKind::Blob0 => 5,
            PieceKind::Blob1 => 3,
            PieceKind::Blob2 => 2,
            PieceKind::Blob3 => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Rook => "Rook",
            PieceKind::King => "King",
            PieceKind::Cleric => "Cleric",
            PieceKind::Panda => "Panda",
            PieceKind::Frog => "Frog",
            PieceKind::Dog => "Dog",
            PieceKind::Chicken => "Chicken",
            PieceKind::Egg => "Egg",
            PieceKind::Blob0 => "Blob0",
            PieceKind::Blob1 => "Blob1",
            PieceKind::Blob2 => "Blob2",
            PieceKind::Blob3 => "Blob3",
        }
    }

    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            PieceKind::Blob0 | PieceKind::Blob1 | PieceKind::Blob2 | PieceKind::Blob3
        )
    }

    /// Blobs that still split when they capture.
    pub fn can_split(&self) -> bool {
        self.split_into().is_some()
    }

    /// The weaker blob left on both squares after a capturing split.
    pub fn split_into(&self) -> Option<PieceKind> {
        match self {
            PieceKind::Blob0 => Some(PieceKind::Blob1),
            PieceKind::Blob1 => Some(PieceKind::Blob2),
            PieceKind::Blob2 => Some(PieceKind::Blob3),
            _ => None,
        }
    }

    /// Kinds a chicken can borrow movement from.
    pub fn is_borrowable(&self) -> bool {
        !matches!(self, PieceKind::Chicken | PieceKind::Egg)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single piece together with the state its behaviour depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
    pub immortal: bool,
    pub en_passant_eligible: bool,
    /// Only meaningful for eggs; zero for everything else.
    pub hatch_countdown: u8,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            has_moved: false,
            immortal: false,
            en_passant_eligible: false,
            hatch_countdown: if kind == PieceKind::Egg {
                EGG_INCUBATION
            } else {
                0
            },
        }
    }

    pub fn egg(color: Color, countdown: u8) -> Self {
        Piece {
            hatch_countdown: countdown,
            ..Piece::new(PieceKind::Egg, color)
        }
    }

    /// The same piece with its moved flag set.
    pub fn moved(mut self) -> Self {
        self.has_moved = true;
        self
    }

    pub fn is_kind(&self, kind: PieceKind) -> bool {
        self.kind == kind
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.color.name(), self.kind.name())
    }

    /// Signed material value, positive for white.
    pub fn value(&self) -> i32 {
        self.color.sign() * self.kind.base_value()
    }

    /// Unsigned integer code reflecting the visible state of the piece.
    pub fn as_int(&self) -> i32 {
        match self.kind {
            PieceKind::Pawn => match (self.has_moved, self.en_passant_eligible) {
                (false, _) => 1,
                (true, true) => 2,
                (true, false) => 3,
            },
            PieceKind::Rook => {
                if self.has_moved {
                    5
                } else {
                    4
                }
            }
            PieceKind::King => {
                if self.has_moved {
                    7
                } else {
                    6
                }
            }
            PieceKind::Dog => 8,
            PieceKind::Frog => 9,
            PieceKind::Cleric => 10,
            PieceKind::Panda => {
                if self.immortal {
                    12
                } else {
                    11
                }
            }
            PieceKind::Chicken => match (self.has_moved, self.immortal) {
                (false, _) => 13,
                (true, false) => 14,
                (true, true) => 15,
            },
            PieceKind::Egg => 22 - i32::from(self.hatch_countdown.clamp(1, EGG_INCUBATION)),
            PieceKind::Blob0 => 22,
            PieceKind::Blob1 => 23,
            PieceKind::Blob2 => 24,
            PieceKind::Blob3 => 25,
        }
    }

    /// Single-step destinations usable only onto empty squares.
    pub fn movement_offsets(&self) -> &'static [Offset] {
        match self.kind {
            PieceKind::Pawn => match self.color {
                Color::White => &WHITE_PAWN_STEP,
                Color::Black => &BLACK_PAWN_STEP,
            },
            PieceKind::King | PieceKind::Panda | PieceKind::Blob0 | PieceKind::Blob2 => {
                &KING_STEPS
            }
            PieceKind::Cleric => &CLERIC_MOVES,
            PieceKind::Frog => &FROG_LEAPS,
            PieceKind::Dog => &DOG_LEAPS,
            PieceKind::Blob3 => &ORTHOGONAL_STEPS,
            PieceKind::Rook
            | PieceKind::Blob1
            | PieceKind::Chicken
            | PieceKind::Egg => &[],
        }
    }

    pub fn capture_offsets(&self) -> &'static [Offset] {
        match self.kind {
            PieceKind::Pawn => match self.color {
                Color::White => &WHITE_PAWN_CAPTURES,
                Color::Black => &BLACK_PAWN_CAPTURES,
            },
            PieceKind::Cleric => &[],
            _ => self.movement_offsets(),
        }
    }

    pub fn move_slides(&self) -> &'static [Slide] {
        match self.kind {
            PieceKind::Pawn if !self.has_moved => match self.color {
                Color::White => &WHITE_PAWN_RUSH,
                Color::Black => &BLACK_PAWN_RUSH,
            },
            PieceKind::Rook => &ROOK_SLIDES,
            PieceKind::Panda | PieceKind::Blob0 | PieceKind::Blob1 => &SHORT_ORTHOGONAL_SLIDES,
            _ => &[],
        }
    }

    pub fn capture_slides(&self) -> &'static [Slide] {
        match self.kind {
            PieceKind::Pawn | PieceKind::Panda => &[],
            PieceKind::Cleric => &DIAGONAL_SLIDES,
            _ => self.move_slides(),
        }
    }

    pub fn dependent_moves(&self) -> &'static [Hop] {
        match self.kind {
            PieceKind::Blob0 => &BLOB0_HOPS,
            _ => &[],
        }
    }

    pub fn dependent_captures(&self) -> &'static [Hop] {
        self.dependent_moves()
    }

    /// Hook run when this piece completes a capture.
    pub fn on_capture(&mut self) {
        self.has_moved = true;
        if self.kind == PieceKind::Panda {
            self.immortal = true;
        }
    }

    /// Hook run when this piece completes a quiet move.
    pub fn on_move(&mut self) {
        self.has_moved = true;
    }

    /// Hook run once per executed move for every piece on the board.
    pub fn on_turn_tick(&mut self) {
        match self.kind {
            PieceKind::Panda => self.immortal = false,
            PieceKind::Pawn => self.en_passant_eligible = false,
            PieceKind::Egg => self.hatch_countdown = self.hatch_countdown.saturating_sub(1),
            _ => {}
        }
    }

    pub fn is_ready_to_hatch(&self) -> bool {
        self.kind == PieceKind::Egg && self.hatch_countdown == 0
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_signed_by_color() {
        assert_eq!(Piece::new(PieceKind::King, Color::White).value(), 100);
        assert_eq!(Piece::new(PieceKind::Dog, Color::Black).value(), -6);
        assert_eq!(Piece::new(PieceKind::Blob3, Color::Black).value(), -1);
    }

    #[test]
    fn test_pawn_codes_follow_state() {
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White);
        assert_eq!(pawn.as_int(), 1);
        pawn.has_moved = true;
        pawn.en_passant_eligible = true;
        assert_eq!(pawn.as_int(), 2);
        pawn.on_turn_tick();
        assert_eq!(pawn.as_int(), 3);
    }

    #[test]
    fn test_pawn_rush_only_before_first_move() {
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        assert_eq!(pawn.move_slides(), &[Slide::new((1, 0), 3)]);
        assert!(pawn.moved().move_slides().is_empty());
        assert!(pawn.capture_slides().is_empty());
    }

    #[test]
    fn test_capture_geometry_defaults_to_movement() {
        let dog = Piece::new(PieceKind::Dog, Color::White);
        assert_eq!(dog.capture_offsets(), dog.movement_offsets());

        let blob = Piece::new(PieceKind::Blob0, Color::White);
        assert_eq!(blob.dependent_captures().len(), 8);
        assert_eq!(blob.capture_slides(), blob.move_slides());
    }

    #[test]
    fn test_cleric_moves_everywhere_but_captures_diagonally() {
        let cleric = Piece::new(PieceKind::Cleric, Color::White);
        assert_eq!(cleric.movement_offsets().len(), 360);
        assert!(!cleric.movement_offsets().contains(&(0, 0)));
        assert!(cleric.capture_offsets().is_empty());
        assert!(
            cleric
                .capture_slides()
                .iter()
                .all(|slide| slide.direction.0 != 0 && slide.direction.1 != 0)
        );
    }

    #[test]
    fn test_panda_immortality_lasts_until_next_tick() {
        let mut panda = Piece::new(PieceKind::Panda, Color::Black);
        panda.on_capture();
        assert!(panda.immortal);
        assert!(panda.has_moved);
        assert_eq!(panda.as_int(), 12);
        panda.on_turn_tick();
        assert!(!panda.immortal);
        assert!(panda.capture_slides().is_empty());
    }

    #[test]
    fn test_egg_counts_down_to_hatching() {
        let mut egg = Piece::egg(Color::White, 2);
        assert_eq!(egg.as_int(), 20);
        egg.on_turn_tick();
        assert!(!egg.is_ready_to_hatch());
        egg.on_turn_tick();
        assert!(egg.is_ready_to_hatch());
        assert_eq!(Piece::new(PieceKind::Egg, Color::Black).as_int(), 16);
    }

    #[test]
    fn test_blob_split_chain() {
        assert_eq!(PieceKind::Blob0.split_into(), Some(PieceKind::Blob1));
        assert_eq!(PieceKind::Blob2.split_into(), Some(PieceKind::Blob3));
        assert!(!PieceKind::Blob3.can_split());
        assert!(PieceKind::Blob3.is_blob());
        assert!(!PieceKind::Chicken.is_borrowable());
    }
}
