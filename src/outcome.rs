use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    FirstWin,
    SecondWin,
    Draw,
}

impl GameOutcome {
    pub fn win_for(player: Player) -> Self {
        match player {
            Player::First => GameOutcome::FirstWin,
            Player::Second => GameOutcome::SecondWin,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::FirstWin => Some(Player::First),
            GameOutcome::SecondWin => Some(Player::Second),
            GameOutcome::Draw => None,
        }
    }

    pub fn encode_winner_absolute(&self) -> f32 {
        match self {
            GameOutcome::FirstWin => 1.0,
            GameOutcome::SecondWin => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }

    pub fn encode_winner_from_perspective(&self, perspective: Player) -> f32 {
        match self.winner() {
            Some(winner) if winner == perspective => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, GameOutcome::Draw)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winner() {
            Some(player) => write!(f, "Win for {}", player),
            None => write!(f, "Draw"),
        }
    }
}
