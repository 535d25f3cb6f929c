//! Simple-endgame detection: drawn pawnless material patterns, KBN-vs-K,
//! lone-king-vs-material corner drives, and king-vs-pawn key squares.

use crate::geometry;
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};

const SIMPLE_ENDGAME_SCORE: i32 = 1300;

/// `eg_scale` values on the 0-128 scale `taper` expects.
const DRAWN_SCALE: i32 = 0;
const DRAWISH_SCALE: i32 = 32;
const NO_SCALING: i32 = 128;

struct MaterialCount {
    knights: u32,
    bishops: u32,
    rooks: u32,
    queens: u32,
    light_bishops: u32,
    dark_bishops: u32,
}

fn count_material(pos: &Position, color: Color) -> MaterialCount {
    let bishops_bb = pos.piece_bitboards[Piece::of(PieceKind::Bishop, color).index()];
    let mut light_bishops = 0;
    let mut dark_bishops = 0;
    for sq in bishops_bb.iter() {
        if (sq.rank() + sq.file()) % 2 == 1 {
            light_bishops += 1;
        } else {
            dark_bishops += 1;
        }
    }
    MaterialCount {
        knights: pos.piece_bitboards[Piece::of(PieceKind::Knight, color).index()].popcount(),
        bishops: bishops_bb.popcount(),
        rooks: pos.piece_bitboards[Piece::of(PieceKind::Rook, color).index()].popcount(),
        queens: pos.piece_bitboards[Piece::of(PieceKind::Queen, color).index()].popcount(),
        light_bishops,
        dark_bishops,
    }
}

fn minors(m: &MaterialCount) -> u32 {
    m.knights + m.bishops
}

/// Is this a pawnless material pattern known to be a theoretical draw
/// regardless of placement? (2N vs <=1 minor, Q vs 2 same-kind minors,
/// R vs R+<=1 minor, 2R vs 2R, bare king vs a single minor, etc.)
fn is_drawn_pawnless_pattern(white: &MaterialCount, black: &MaterialCount) -> bool {
    let (stronger, weaker) = if white.queens + white.rooks + minors(white) >= black.queens + black.rooks + minors(black) {
        (white, black)
    } else {
        (black, white)
    };

    if stronger.queens == 0 && stronger.rooks == 0 {
        return minors(stronger) <= 2 && minors(weaker) <= 1;
    }
    if stronger.queens == 1 && stronger.rooks == 0 && weaker.queens == 0 {
        return minors(weaker) == 2 && (weaker.knights == 2 || weaker.bishops == 2);
    }
    if stronger.rooks == 1 && stronger.queens == 0 && weaker.rooks == 1 && weaker.queens == 0 {
        return minors(stronger) == 0 && minors(weaker) <= 1;
    }
    if stronger.rooks == 2 && stronger.queens == 0 && weaker.rooks == 2 && weaker.queens == 0 {
        return minors(stronger) == 0 && minors(weaker) == 0;
    }
    false
}

fn king_vs_pawn_is_winning(pos: &Position, pawn_color: Color, pawn_sq: Square) -> bool {
    let winning_king = pos.king_square(pawn_color);
    let defending_king = pos.king_square(pawn_color.opposite());
    let r = match pawn_color {
        Color::White => pawn_sq.rank(),
        Color::Black => 7 - pawn_sq.rank(),
    };
    let file = pawn_sq.file();

    if file == 0 || file == 7 {
        let defender_ahead = match pawn_color {
            Color::White => defending_king.rank() > pawn_sq.rank(),
            Color::Black => defending_king.rank() < pawn_sq.rank(),
        };
        if defending_king.file() == file && defender_ahead {
            return false;
        }
    }

    let winning_rank = match pawn_color {
        Color::White => winning_king.rank(),
        Color::Black => 7 - winning_king.rank(),
    };
    let file_diff = (winning_king.file() as i32 - file as i32).abs();
    let in_key_square = match r {
        1..=3 => winning_rank == r + 2 && file_diff <= 1,
        4 | 5 => {
            let diff = winning_rank as i32 - r as i32;
            diff > 0 && diff <= 2 && file_diff <= 1
        }
        6 => {
            let diff = winning_rank as i32 - r as i32;
            (0..=1).contains(&diff) && file_diff <= 1
        }
        _ => true,
    };
    in_key_square
}

/// Returns `Some(score)` from the side-to-move's perspective if a simple
/// endgame pattern is recognized, short-circuiting the rest of the
/// evaluator.
#[must_use]
pub fn detect(pos: &Position) -> Option<i32> {
    let white_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, Color::White).index()];
    let black_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, Color::Black).index()];

    if white_pawns.is_empty() && black_pawns.is_empty() {
        let white = count_material(pos, Color::White);
        let black = count_material(pos, Color::Black);

        if is_drawn_pawnless_pattern(&white, &black) {
            return Some(0);
        }

        for (strong_color, strong, weak) in [(Color::White, &white, &black), (Color::Black, &black, &white)] {
            if weak.knights == 0 && weak.bishops == 0 && weak.rooks == 0 && weak.queens == 0 {
                let weak_color = strong_color.opposite();
                if strong.knights == 1 && strong.bishops == 1 && strong.rooks == 0 && strong.queens == 0 {
                    let bishop_light = strong.light_bishops == 1;
                    let defender_king = pos.king_square(weak_color);
                    let winner_king = pos.king_square(strong_color);
                    let score = SIMPLE_ENDGAME_SCORE
                        - geometry::distance_to_nearest_same_color_corner(defender_king, bishop_light)
                        - defender_king.chebyshev_distance(winner_king);
                    return Some(if pos.color_to_move == strong_color { score } else { -score });
                }
                if minors(strong) + strong.rooks + strong.queens > 0 {
                    let defender_king = pos.king_square(weak_color);
                    let winner_king = pos.king_square(strong_color);
                    let score = SIMPLE_ENDGAME_SCORE + geometry::distance_to_nearest_corner(defender_king) * 10
                        - defender_king.chebyshev_distance(winner_king) * 4;
                    return Some(if pos.color_to_move == strong_color { score } else { -score });
                }
            }
        }
        return None;
    }

    let total_pawns = white_pawns.popcount() + black_pawns.popcount();
    let total_pieces = pos.occupancy.popcount();
    if total_pawns == 1 && total_pieces == 3 {
        let (pawn_color, pawn_bb) = if !white_pawns.is_empty() { (Color::White, white_pawns) } else { (Color::Black, black_pawns) };
        let pawn_sq = pawn_bb.iter().next().expect("exactly one pawn");
        let winning = king_vs_pawn_is_winning(pos, pawn_color, pawn_sq);
        let score = if winning { SIMPLE_ENDGAME_SCORE } else { 0 };
        return Some(if pos.color_to_move == pawn_color { score } else { -score });
    }

    None
}

/// Damping factor for `strong`'s endgame score against drawish material
/// imbalances that fall short of `detect`'s exact short-circuit patterns —
/// a continuum `detect` can't express as a single binary verdict. Grounded
/// on the teacher's `get_draw_multiplier`, rescaled from its 0-64 range onto
/// `taper`'s 0-128 `eg_scale`.
#[must_use]
pub(crate) fn eg_scale(pos: &Position, strong: Color) -> i32 {
    let weak = strong.opposite();
    let s = count_material(pos, strong);
    let w = count_material(pos, weak);
    let s_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, strong).index()].popcount();
    let w_pawns = pos.piece_bitboards[Piece::of(PieceKind::Pawn, weak).index()].popcount();
    let s_minor = minors(&s);
    let s_major = s.rooks + s.queens;
    let w_minor = minors(&w);
    let w_major = w.rooks + w.queens;

    if s_pawns == 0 {
        if s_major == 0 && s_minor <= 1 {
            return DRAWN_SCALE;
        }
        if s_major == 0 && s.knights == 2 && s.bishops == 0 && w_minor == 0 && w_major == 0 && w_pawns == 0 {
            return DRAWISH_SCALE;
        }
    }

    if s_pawns == 0 && w_pawns == 0 {
        if s.rooks == 1 && s.queens == 0 && s_minor == 0 && w.rooks == 0 && w.queens == 0 && w_minor == 1 {
            return DRAWISH_SCALE;
        }
        if s.rooks == 1 && s.queens == 0 && s_minor == 1 && w.rooks == 1 && w.queens == 0 && w_minor == 0 {
            return DRAWISH_SCALE;
        }
        if s.queens == 1 && s.rooks == 0 && s_minor == 1 && w.queens == 1 && w.rooks == 0 && w_minor == 0 {
            return DRAWISH_SCALE;
        }
        if s.rooks == w.rooks && s.queens == w.queens && s_minor == 0 && w_minor == 0 {
            return DRAWISH_SCALE;
        }
        if s_major == 0 && w_major == 0 && s_minor == w_minor {
            return DRAWISH_SCALE;
        }
    }

    if s_pawns == 0 && s_major == 0 && s_minor == 2 && w_major == 0 && w_minor == 1 && w_pawns == 0 && !(s.bishops == 2 && w.knights == 1)
    {
        return DRAWISH_SCALE;
    }

    NO_SCALING
}
