use std::fmt::{self, Display, Formatter};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Normal,
    Check {
        attacker: Color,
    },
    Checkmate {
        winner: Color,
    },
    /// The color on move has no legal move and is not in check. A rule set that only knows
    /// checkmate would report this position as checkmate.
    Stalemate,
}
impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}
impl Display for GameStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Normal => write!(f, "normal")?,
            GameStatus::Check { attacker } => write!(f, "{} king in check", !*attacker)?,
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins")?,
            GameStatus::Stalemate => write!(f, "stalemate")?,
        }
        Ok(())
    }
}
