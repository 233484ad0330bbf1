//! The eight lines of three on the board

use super::{BOARD_CELLS, Cell, Player};

/// Rows, then columns, then the two diagonals
#[rustfmt::skip]
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8],
    [0, 3, 6], [1, 4, 7], [2, 5, 8],
    [0, 4, 8], [2, 4, 6],
];

pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Whether `player` holds all three cells of some line
    pub fn has_won(cells: &[Cell; BOARD_CELLS], player: Player) -> bool {
        Self::winning_line(cells, player).is_some()
    }

    /// First line completely held by `player`, in `WINNING_LINES` order
    pub fn winning_line(cells: &[Cell; BOARD_CELLS], player: Player) -> Option<[usize; 3]> {
        let mark = player.to_cell();
        WINNING_LINES
            .into_iter()
            .find(|line| line.iter().all(|&pos| cells[pos] == mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::BoardState;

    fn cells(s: &str) -> [Cell; BOARD_CELLS] {
        s.parse::<BoardState>().unwrap().cells
    }

    #[test]
    fn every_line_is_detected() {
        for line in WINNING_LINES {
            let mut board = [Cell::Empty; BOARD_CELLS];
            for pos in line {
                board[pos] = Cell::O;
            }
            assert_eq!(LineAnalyzer::winning_line(&board, Player::O), Some(line));
            assert!(!LineAnalyzer::has_won(&board, Player::X));
        }
    }

    #[test]
    fn first_line_wins_when_two_are_held() {
        // Full top row and left column
        assert_eq!(
            LineAnalyzer::winning_line(&cells("XXXXOOXO."), Player::X),
            Some([0, 1, 2])
        );
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let board = cells("XOX......");
        assert_eq!(LineAnalyzer::winning_line(&board, Player::X), None);
        assert_eq!(LineAnalyzer::winning_line(&board, Player::O), None);
        assert!(!LineAnalyzer::has_won(&[Cell::Empty; BOARD_CELLS], Player::X));
    }
}
