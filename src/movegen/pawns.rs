//! Pawn pushes, double pushes, diagonal captures, promotions and en passant.

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::moves::{Move, MoveSpec};
use crate::position::Position;
use crate::types::{Color, Piece, PieceKind, Square};

use super::MoveStage;

const PROMOTION_KINDS: [PieceKind; 4] = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

fn promotion_rank(color: Color) -> usize {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

fn emit(pos: &mut Position, spec: MoveSpec, is_promotion: bool) {
    if !is_promotion {
        pos.push_generated_move(Move::new(spec));
        return;
    }
    let color = spec.piece.color().expect("pawn always has a color");
    for kind in PROMOTION_KINDS {
        let mut promo = spec;
        promo.promoted = Piece::of(kind, color);
        pos.push_generated_move(Move::new(promo));
    }
}

pub(super) fn generate(pos: &mut Position, stage: MoveStage, from_mask: Bitboard, to_mask: Bitboard, destination_mask: Bitboard) {
    let us = pos.color_to_move;
    let them = us.opposite();
    let pawn = Piece::of(PieceKind::Pawn, us);
    let own_pawns = pos.piece_bitboards[pawn.index()] & from_mask;
    let dir: isize = if us == Color::White { 1 } else { -1 };
    let start_rank: usize = if us == Color::White { 1 } else { 6 };
    let promo_rank = promotion_rank(us);

    for from in own_pawns.iter() {
        let rank = from.rank() as isize;
        let file = from.file();

        if stage != MoveStage::OnlyCaptures {
            let single_rank = rank + dir;
            if (0..8).contains(&single_rank) {
                let single = Square::new(single_rank as usize, file);
                if !pos.occupancy.contains(single) {
                    if destination_mask.contains(single) {
                        emit(
                            pos,
                            MoveSpec {
                                from,
                                to: single,
                                piece: pawn,
                                is_pawn_move: true,
                                ..Default::default()
                            },
                            single.rank() == promo_rank,
                        );
                    }
                    if from.rank() == start_rank {
                        let double_rank = rank + 2 * dir;
                        let double_sq = Square::new(double_rank as usize, file);
                        if !pos.occupancy.contains(double_sq) && destination_mask.contains(double_sq) {
                            emit(
                                pos,
                                MoveSpec {
                                    from,
                                    to: double_sq,
                                    piece: pawn,
                                    is_pawn_move: true,
                                    is_double_pawn_move: true,
                                    ..Default::default()
                                },
                                false,
                            );
                        }
                    }
                }
            }
        }

        if stage != MoveStage::OnlyNonCaptures {
            let attacks = geometry::PAWN_ATTACK_MASK[us.index()][from.as_index()];
            for target in (attacks & destination_mask).iter() {
                if pos.color_occupancy[them.index()].contains(target) {
                    let captured = pos.get_piece(target);
                    emit(
                        pos,
                        MoveSpec {
                            from,
                            to: target,
                            piece: pawn,
                            captured,
                            is_pawn_move: true,
                            ..Default::default()
                        },
                        target.rank() == promo_rank,
                    );
                }
            }

            let ep_sq = pos.en_passant_square;
            if ep_sq.is_legal() && to_mask.contains(ep_sq) && attacks.contains(ep_sq) {
                emit(
                    pos,
                    MoveSpec {
                        from,
                        to: ep_sq,
                        piece: pawn,
                        captured: Piece::of(PieceKind::Pawn, them),
                        is_pawn_move: true,
                        is_en_passant_capture: true,
                        ..Default::default()
                    },
                    false,
                );
            }
        }
    }
}
