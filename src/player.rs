#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Player {
    First = 1,
    Second = -1,
}

impl Player {
    pub fn opposite(&self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Player to move after `moves_played` plies.
    pub fn from_ply(moves_played: u32) -> Player {
        if moves_played % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Player::First => 'o',
            Player::Second => 'x',
        }
    }

    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'o' | 'O' => Some(Player::First),
            'x' | 'X' => Some(Player::Second),
            _ => None,
        }
    }

    pub fn from_int(i: i8) -> Option<Player> {
        match i {
            1 => Some(Player::First),
            -1 => Some(Player::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ply_alternates() {
        assert_eq!(Player::from_ply(0), Player::First);
        assert_eq!(Player::from_ply(1), Player::Second);
        assert_eq!(Player::from_ply(42), Player::First);
    }

    #[test]
    fn test_char_round_trip() {
        for player in [Player::First, Player::Second] {
            assert_eq!(Player::from_char(player.to_char()), Some(player));
            assert_eq!(Player::from_int(player as i8), Some(player));
        }
        assert_eq!(Player::from_char('.'), None);
    }
}
