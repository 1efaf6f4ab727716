use std::hash::{Hash, Hasher};

use log::debug;
use rustc_hash::FxHashSet;

use crate::{
    board::Board,
    color::Color,
    piece::{Piece, PieceId, PieceInfo, PieceKind},
    status::GameStatus,
};

/// A tactical fact, filed under the color that profits from it.
#[derive(Debug, Clone)]
pub enum Observation {
    PinnedToKing {
        pinned: PieceInfo,
        attacker: PieceInfo,
    },
    Pinned {
        pinned: PieceInfo,
        attacker: PieceInfo,
        covered: PieceInfo,
    },
    FreePiece {
        free: PieceInfo,
        attacker: PieceInfo,
    },
    Fork {
        victims: Vec<PieceInfo>,
        attacker: PieceInfo,
    },
    DiscoveredAttack {
        victim: PieceInfo,
        attacker: PieceInfo,
    },
    Check {
        attackers: Vec<PieceInfo>,
    },
    Checkmate {
        attackers: Vec<PieceInfo>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObservationKind {
    PinnedToKing,
    Pinned,
    FreePiece,
    Fork,
    DiscoveredAttack,
    Check,
    Checkmate,
}

/// Identity of an observation: its kind and the ids of the pieces taking part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObservationKey {
    PinnedToKing(PieceId, PieceId),
    Pinned(PieceId, PieceId, PieceId),
    FreePiece(PieceId, PieceId),
    Fork(Vec<PieceId>, PieceId),
    DiscoveredAttack(PieceId, PieceId),
    Check(Vec<PieceId>),
    Checkmate(Vec<PieceId>),
}

fn id_set(pieces: &[PieceInfo]) -> Vec<PieceId> {
    let mut ids: Vec<_> = pieces.iter().map(|piece| piece.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
impl Observation {
    pub fn key(&self) -> ObservationKey {
        match self {
            Observation::PinnedToKing { pinned, attacker } => {
                ObservationKey::PinnedToKing(pinned.id, attacker.id)
            }
            Observation::Pinned {
                pinned,
                attacker,
                covered,
            } => ObservationKey::Pinned(pinned.id, attacker.id, covered.id),
            Observation::FreePiece { free, attacker } => {
                ObservationKey::FreePiece(free.id, attacker.id)
            }
            Observation::Fork { victims, attacker } => {
                ObservationKey::Fork(id_set(victims), attacker.id)
            }
            Observation::DiscoveredAttack { victim, attacker } => {
                ObservationKey::DiscoveredAttack(victim.id, attacker.id)
            }
            Observation::Check { attackers } => ObservationKey::Check(id_set(attackers)),
            Observation::Checkmate { attackers } => ObservationKey::Checkmate(id_set(attackers)),
        }
    }
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::PinnedToKing { .. } => ObservationKind::PinnedToKing,
            Observation::Pinned { .. } => ObservationKind::Pinned,
            Observation::FreePiece { .. } => ObservationKind::FreePiece,
            Observation::Fork { .. } => ObservationKind::Fork,
            Observation::DiscoveredAttack { .. } => ObservationKind::DiscoveredAttack,
            Observation::Check { .. } => ObservationKind::Check,
            Observation::Checkmate { .. } => ObservationKind::Checkmate,
        }
    }
}
impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for Observation {}
impl Hash for Observation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observations {
    pub white: FxHashSet<Observation>,
    pub black: FxHashSet<Observation>,
}
impl Observations {
    pub fn of(&self, color: Color) -> &FxHashSet<Observation> {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
    fn push(&mut self, color: Color, observation: Observation) {
        match color {
            Color::White => self.white.insert(observation),
            Color::Black => self.black.insert(observation),
        };
    }
}

/// Scans the position for pins, forks, free pieces, discovered attacks and checks.
pub fn analyze(board: &Board) -> Observations {
    let mut observations = Observations::default();
    let king_attackers = |color: Color| {
        board
            .king(color)
            .map(|king| king.calculated(board).possible_attackers.clone())
            .unwrap_or_default()
    };
    match board.status() {
        GameStatus::Checkmate { winner } => {
            let attackers = king_attackers(!winner);
            observations.push(winner, Observation::Checkmate { attackers });
            return observations;
        }
        GameStatus::Check { attacker } => {
            let attackers = king_attackers(!attacker);
            observations.push(attacker, Observation::Check { attackers });
        }
        GameStatus::Normal | GameStatus::Stalemate => (),
    }
    for piece in board.all_pieces() {
        if let Some(pin) = piece.calculated(board).pin_info {
            let observation = if pin.covered.kind == PieceKind::King {
                Observation::PinnedToKing {
                    pinned: piece.info(),
                    attacker: pin.attacker,
                }
            } else {
                Observation::Pinned {
                    pinned: piece.info(),
                    attacker: pin.attacker,
                    covered: pin.covered,
                }
            };
            observations.push(!piece.color(), observation);
        }
    }
    for piece in board.all_pieces() {
        if let Some(fork) = fork(board, piece) {
            observations.push(piece.color(), fork);
        }
    }
    for piece in board.all_pieces() {
        if piece.kind() == PieceKind::King {
            continue;
        }
        let calculated = piece.calculated(board);
        if !calculated.defenders.is_empty() {
            continue;
        }
        if let Some(attacker) = calculated.possible_attackers.first() {
            observations.push(
                !piece.color(),
                Observation::FreePiece {
                    free: piece.info(),
                    attacker: *attacker,
                },
            );
        }
    }
    discovered_attacks(board, &mut observations);
    debug!(
        "found {} observations for white and {} for black",
        observations.white.len(),
        observations.black.len(),
    );
    observations
}
/// A threat one color poses, as ranked by [`Threat::value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Threat {
    Checkmate,
    Fork {
        attacker: PieceInfo,
        victims: Vec<PieceInfo>,
    },
    Pin {
        attacker: PieceInfo,
        pinned: PieceInfo,
        covered: PieceInfo,
    },
    FreePiece {
        attacker: PieceInfo,
        victim: PieceInfo,
    },
}
impl Threat {
    /// Checkmate is worth 100, a fork its cheapest victim, a pin the pinned piece, and a
    /// free piece 1.
    pub fn value(&self) -> u8 {
        match self {
            Threat::Checkmate => 100,
            Threat::Fork { victims, .. } => victims
                .iter()
                .map(|victim| victim.kind.weight())
                .min()
                .unwrap_or(0),
            Threat::Pin { pinned, .. } => pinned.kind.weight(),
            Threat::FreePiece { .. } => 1,
        }
    }
}

/// Threats posed by `color`: its forks and single attacks first, in piece order, then the
/// enemy pieces it pins. Only `Checkmate` when the other color is mated.
///
/// Unlike [`analyze`] this does not ask whether the attacker itself is safe.
pub fn threats(board: &Board, color: Color) -> Vec<Threat> {
    if board.is_check(!color) && !board.has_moves(!color) {
        return vec![Threat::Checkmate];
    }
    let mut threats = Vec::new();
    for piece in board.pieces(color) {
        let mut victims: Vec<_> = piece
            .calculated(board)
            .possible_victims
            .iter()
            .filter(|victim| {
                victim.kind.weight() > piece.kind().weight() || is_undefended(board, victim)
            })
            .copied()
            .collect();
        let attacker = piece.info();
        match victims.len() {
            0 => (),
            1 => threats.push(Threat::FreePiece {
                attacker,
                victim: victims.remove(0),
            }),
            _ => threats.push(Threat::Fork { attacker, victims }),
        }
    }
    for piece in board.pieces(!color) {
        let Some(pin) = piece.calculated(board).pin_info else {
            continue;
        };
        if pin.attacker.kind.weight() < piece.kind().weight() {
            threats.push(Threat::Pin {
                attacker: pin.attacker,
                pinned: piece.info(),
                covered: pin.covered,
            });
        }
    }
    threats
}
fn is_undefended(board: &Board, piece: &PieceInfo) -> bool {
    board
        .calculated(piece.square)
        .is_none_or(|calculated| calculated.defenders.is_empty())
}
fn fork(board: &Board, attacker: &Piece) -> Option<Observation> {
    let calculated = attacker.calculated(board);
    let threats = &calculated.possible_attackers;
    let defenders = calculated.defenders.len();
    let safe = threats.is_empty()
        || defenders > threats.len()
        || (defenders > 0 && threats.iter().all(|threat| threat.kind == PieceKind::King));
    if !safe {
        return None;
    }
    let victims: Vec<_> = calculated
        .possible_victims
        .iter()
        .filter(|victim| {
            victim.kind.weight() > attacker.kind().weight() || is_undefended(board, victim)
        })
        .copied()
        .collect();
    (victims.len() >= 2).then(|| Observation::Fork {
        victims,
        attacker: attacker.info(),
    })
}
fn discovered_attacks(board: &Board, observations: &mut Observations) {
    let Some(last) = board.moves_history().last() else {
        return;
    };
    let vacated: Vec<_> = last.vacated_squares(board).collect();
    if vacated.is_empty() {
        return;
    }
    for attacker in board.all_pieces() {
        if !attacker.kind().is_long_range()
            || last.moved_pieces.iter().any(|moved| moved.id == attacker.id())
        {
            continue;
        }
        for victim in &attacker.calculated(board).possible_victims {
            if victim.kind == PieceKind::King {
                continue;
            }
            let worth_it =
                victim.kind.weight() > attacker.kind().weight() || is_undefended(board, victim);
            let uncovered = vacated
                .iter()
                .any(|square| square.is_between(attacker.square(), victim.square));
            if worth_it && uncovered {
                observations.push(
                    attacker.color(),
                    Observation::DiscoveredAttack {
                        victim: *victim,
                        attacker: attacker.info(),
                    },
                );
            }
        }
    }
}
