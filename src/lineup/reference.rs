use crate::drawing::TeamSide;

use super::PlayerRecord;

// (side, x, y, name, number)
const REFERENCE: [(TeamSide, f32, f32, &str, &str); 22] = [
    (TeamSide::Home, 0.9, 0.5, "Alisson", "1"),
    (TeamSide::Home, 0.8, 0.25, "Alexander-Arnold", "2"),
    (TeamSide::Home, 0.8, 0.4, "Van Dijk", "3"),
    (TeamSide::Home, 0.8, 0.6, "Konate", "4"),
    (TeamSide::Home, 0.75, 0.85, "Robertson", "5"),
    (TeamSide::Home, 0.65, 0.3, "Fabinho", "6"),
    (TeamSide::Home, 0.65, 0.6, "Henderson", "7"),
    (TeamSide::Home, 0.55, 0.7, "Thiago", "8"),
    (TeamSide::Home, 0.45, 0.85, "Salah", "9"),
    (TeamSide::Home, 0.55, 0.5, "Firmino", "10"),
    (TeamSide::Home, 0.65, 0.85, "Mane", "11"),
    (TeamSide::Away, 0.1, 0.5, "De Gea", "1"),
    (TeamSide::Away, 0.2, 0.25, "Wan-Bissaka", "2"),
    (TeamSide::Away, 0.2, 0.4, "Maguire", "3"),
    (TeamSide::Away, 0.2, 0.6, "Varane", "4"),
    (TeamSide::Away, 0.25, 0.15, "Shaw", "5"),
    (TeamSide::Away, 0.35, 0.3, "McTominay", "6"),
    (TeamSide::Away, 0.35, 0.7, "Fred", "7"),
    (TeamSide::Away, 0.45, 0.8, "Pogba", "8"),
    (TeamSide::Away, 0.45, 0.3, "Fernandes", "9"),
    (TeamSide::Away, 0.55, 0.4, "Sancho", "10"),
    (TeamSide::Away, 0.65, 0.5, "Ronaldo", "11"),
];

/// The fixed 22-player lineup used whenever nothing usable was recognised.
pub fn reference_lineup() -> Vec<PlayerRecord> {
    REFERENCE
        .iter()
        .map(|&(side, x, y, name, number)| PlayerRecord {
            side,
            name: Some(name.to_string()),
            number: Some(number.to_string()),
            position: [x, y],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_has_eleven_per_side_with_unique_numbers() {
        let lineup = reference_lineup();
        assert_eq!(lineup.len(), 22);
        for side in [TeamSide::Home, TeamSide::Away] {
            let numbers: HashSet<_> = lineup
                .iter()
                .filter(|r| r.side == side)
                .map(|r| r.number.clone().unwrap())
                .collect();
            assert_eq!(numbers.len(), 11);
        }
        assert_eq!(lineup[0].name.as_deref(), Some("Alisson"));
    }
}
