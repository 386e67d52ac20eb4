//! Position notation codec.
//!
//! The notation is FEN-shaped but dimension-free: rank segments are
//! separated by `/`, most significant rank first, digit runs denote
//! consecutive empty squares (multi-digit runs are legal on boards wider
//! than nine files), and any other character is a piece symbol whose
//! case picks the owning side. A second whitespace-separated token names
//! the side to move. Extra FEN fields (castling, en passant, clocks) are
//! accepted and ignored; the fast-path checker keeps full FEN strings of
//! its own.

use crate::side::Side;

/// An occupied square: a raw symbol plus the side derived from its case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub symbol: char,
    pub side: Side,
}

/// A fully parsed board position. Never mutated in place; transitions
/// always come from parsing a fresh notation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    ranks: Vec<Vec<Option<Occupant>>>,
    side_to_move: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("notation must include piece placement and side to move")]
    MissingField,
    #[error("rank {rank} is empty or missing")]
    EmptyRank { rank: usize },
    #[error("could not determine file count from the first rank")]
    NoFiles,
    #[error("rank {rank} has a non-positive empty-square run")]
    NonPositiveRun { rank: usize },
    #[error("rank {rank} overflows {files} files")]
    RankOverflow { rank: usize, files: usize },
    #[error("rank {rank} sums to {got} squares, expected {files}")]
    RankSum {
        rank: usize,
        got: usize,
        files: usize,
    },
    #[error("unrecognized side-to-move token '{0}'")]
    UnknownSide(String),
}

impl Position {
    /// Parse a notation string. The file count is derived from the first
    /// rank and every other rank must sum to it exactly.
    pub fn parse(notation: &str) -> Result<Self, PositionError> {
        let mut fields = notation.split_whitespace();
        let placement = fields.next().ok_or(PositionError::MissingField)?;
        let side_token = fields.next().ok_or(PositionError::MissingField)?;

        let side_to_move = Side::from_notation_token(side_token)
            .ok_or_else(|| PositionError::UnknownSide(side_token.to_string()))?;

        let rank_strs: Vec<&str> = placement.split('/').collect();

        let num_files = rank_width(rank_strs[0], 1, usize::MAX)?;
        if num_files == 0 {
            return Err(PositionError::NoFiles);
        }

        let mut ranks = Vec::with_capacity(rank_strs.len());
        for (idx, rank_str) in rank_strs.iter().enumerate() {
            ranks.push(parse_rank(rank_str, idx + 1, num_files)?);
        }

        Ok(Self {
            ranks,
            side_to_move,
        })
    }

    /// Serialize back to notation. `parse(p.to_notation()) == p` for any
    /// position this type can hold.
    pub fn to_notation(&self) -> String {
        let mut out = String::new();
        for (idx, rank) in self.ranks.iter().enumerate() {
            if idx > 0 {
                out.push('/');
            }
            let mut empty_run = 0usize;
            for square in rank {
                match square {
                    Some(occupant) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        out.push(occupant.symbol);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
        }
        out.push(' ');
        out.push(self.side_to_move.notation_token());
        out
    }

    pub fn num_ranks(&self) -> usize {
        self.ranks.len()
    }

    pub fn num_files(&self) -> usize {
        self.ranks.first().map_or(0, Vec::len)
    }

    pub fn side_to_move(&self) -> &Side {
        &self.side_to_move
    }

    /// The occupant of a square, if any. `row` 0 is the top rank.
    pub fn get(&self, row: usize, col: usize) -> Option<&Occupant> {
        self.ranks.get(row)?.get(col)?.as_ref()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Occupant>]> {
        self.ranks.iter().map(Vec::as_slice)
    }
}

fn parse_rank(
    rank_str: &str,
    rank: usize,
    num_files: usize,
) -> Result<Vec<Option<Occupant>>, PositionError> {
    if rank_str.is_empty() {
        return Err(PositionError::EmptyRank { rank });
    }

    let mut squares = Vec::with_capacity(num_files);
    let mut run = String::new();
    for c in rank_str.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            continue;
        }
        flush_run(&mut run, &mut squares, rank, num_files)?;
        if squares.len() >= num_files {
            return Err(PositionError::RankOverflow {
                rank,
                files: num_files,
            });
        }
        let side = if c.is_uppercase() {
            Side::white()
        } else {
            Side::black()
        };
        squares.push(Some(Occupant { symbol: c, side }));
    }
    flush_run(&mut run, &mut squares, rank, num_files)?;

    if squares.len() != num_files {
        return Err(PositionError::RankSum {
            rank,
            got: squares.len(),
            files: num_files,
        });
    }
    Ok(squares)
}

fn flush_run(
    run: &mut String,
    squares: &mut Vec<Option<Occupant>>,
    rank: usize,
    num_files: usize,
) -> Result<(), PositionError> {
    if run.is_empty() {
        return Ok(());
    }
    if run.starts_with('0') {
        return Err(PositionError::NonPositiveRun { rank });
    }
    let count: usize = run
        .parse()
        .map_err(|_| PositionError::NonPositiveRun { rank })?;
    run.clear();
    if squares.len() + count > num_files {
        return Err(PositionError::RankOverflow {
            rank,
            files: num_files,
        });
    }
    squares.extend(std::iter::repeat_with(|| None).take(count));
    Ok(())
}

/// Width of a rank segment without building it, used to derive the file
/// count from the first rank.
fn rank_width(rank_str: &str, rank: usize, cap: usize) -> Result<usize, PositionError> {
    if rank_str.is_empty() {
        return Err(PositionError::EmptyRank { rank });
    }
    let mut width = 0usize;
    let mut run = String::new();
    for c in rank_str.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            width += take_run(&mut run, rank)?;
            width += 1;
        }
        if width > cap {
            return Err(PositionError::RankOverflow { rank, files: cap });
        }
    }
    width += take_run(&mut run, rank)?;
    Ok(width)
}

fn take_run(run: &mut String, rank: usize) -> Result<usize, PositionError> {
    if run.is_empty() {
        return Ok(0);
    }
    if run.starts_with('0') {
        return Err(PositionError::NonPositiveRun { rank });
    }
    let count = run
        .parse()
        .map_err(|_| PositionError::NonPositiveRun { rank })?;
    run.clear();
    Ok(count)
}

/// True only for a plain 8x8 board whose placement uses the standard
/// six-piece alphabet and single digits 1-8. Gates the fast path.
pub fn is_standard_setup(notation: &str, num_files: usize, num_ranks: usize) -> bool {
    if num_files != 8 || num_ranks != 8 {
        return false;
    }
    let Some(placement) = notation.split_whitespace().next() else {
        return false;
    };
    for c in placement.chars() {
        match c {
            '/' => {}
            '1'..='8' => {}
            'p' | 'r' | 'n' | 'b' | 'q' | 'k' => {}
            'P' | 'R' | 'N' | 'B' | 'Q' | 'K' => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn parses_initial_position() {
        let pos = Position::parse(INITIAL).unwrap();
        assert_eq!(pos.num_ranks(), 8);
        assert_eq!(pos.num_files(), 8);
        assert_eq!(pos.side_to_move(), &Side::white());
        assert_eq!(pos.get(0, 0).unwrap().symbol, 'r');
        assert_eq!(pos.get(0, 0).unwrap().side, Side::black());
        assert_eq!(pos.get(7, 4).unwrap().symbol, 'K');
        assert!(pos.get(4, 4).is_none());
    }

    #[test]
    fn rank_sum_must_match_first_rank() {
        // Second rank has only seven squares.
        let err = Position::parse("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w").unwrap_err();
        assert!(matches!(err, PositionError::RankSum { rank: 2, got: 7, files: 8 }));
    }

    #[test]
    fn rank_overflow_is_rejected_mid_scan() {
        // Nine occupied-plus-empty squares on an eight-file board.
        let err = Position::parse("8/p8 w").unwrap_err();
        assert!(matches!(err, PositionError::RankOverflow { rank: 2, .. }));

        let err = Position::parse("8/9 w").unwrap_err();
        assert!(matches!(err, PositionError::RankOverflow { rank: 2, .. }));
    }

    #[test]
    fn empty_rank_is_rejected() {
        let err = Position::parse("8//8 w").unwrap_err();
        assert!(matches!(err, PositionError::EmptyRank { rank: 2 }));
    }

    #[test]
    fn zero_run_is_rejected() {
        let err = Position::parse("0r7/8 w").unwrap_err();
        assert!(matches!(err, PositionError::NonPositiveRun { rank: 1 }));
    }

    #[test]
    fn side_token_is_validated() {
        assert!(matches!(
            Position::parse("8/8 x").unwrap_err(),
            PositionError::UnknownSide(_)
        ));
        assert!(matches!(
            Position::parse("8/8").unwrap_err(),
            PositionError::MissingField
        ));
    }

    #[test]
    fn non_square_boards_parse() {
        let pos = Position::parse("10/10/10 b").unwrap();
        assert_eq!(pos.num_ranks(), 3);
        assert_eq!(pos.num_files(), 10);
        assert_eq!(pos.side_to_move(), &Side::black());
    }

    #[test]
    fn unknown_symbols_parse_with_case_derived_side() {
        let pos = Position::parse("W7/7z w").unwrap();
        assert_eq!(pos.get(0, 0).unwrap().side, Side::white());
        assert_eq!(pos.get(1, 7).unwrap().side, Side::black());
    }

    #[test]
    fn serializes_initial_position() {
        let pos = Position::parse(INITIAL).unwrap();
        assert_eq!(
            pos.to_notation(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
        );
    }

    #[test]
    fn standard_setup_gate() {
        assert!(is_standard_setup(INITIAL, 8, 8));
        // Werewolf on the board.
        assert!(!is_standard_setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPW/RNBQKBNR w", 8, 8));
        // Wrong dimensions.
        assert!(!is_standard_setup("10/10/10 w", 10, 3));
        // Multi-digit run can never be standard.
        assert!(!is_standard_setup("9r/10 w", 10, 2));
    }

    fn symbol_strategy() -> impl Strategy<Value = char> + Clone {
        prop::sample::select(vec![
            'p', 'r', 'n', 'b', 'q', 'k', 'w', 'P', 'R', 'N', 'B', 'Q', 'K', 'W', 'z', 'A',
        ])
    }

    fn position_strategy() -> impl Strategy<Value = String> {
        let square = prop::option::of(symbol_strategy());
        let files = 1usize..12;
        let ranks = 1usize..12;
        (files, ranks)
            .prop_flat_map(move |(files, ranks)| {
                let rank = prop::collection::vec(square.clone(), files);
                (
                    prop::collection::vec(rank, ranks),
                    prop::bool::ANY,
                )
            })
            .prop_map(|(grid, white_to_move)| {
                let mut out = String::new();
                for (idx, rank) in grid.iter().enumerate() {
                    if idx > 0 {
                        out.push('/');
                    }
                    let mut empty = 0usize;
                    for square in rank {
                        match square {
                            Some(sym) => {
                                if empty > 0 {
                                    out.push_str(&empty.to_string());
                                    empty = 0;
                                }
                                out.push(*sym);
                            }
                            None => empty += 1,
                        }
                    }
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                    }
                }
                out.push(' ');
                out.push(if white_to_move { 'w' } else { 'b' });
                out
            })
    }

    proptest! {
        #[test]
        fn round_trip_law(notation in position_strategy()) {
            let parsed = Position::parse(&notation).unwrap();
            let serialized = parsed.to_notation();
            let reparsed = Position::parse(&serialized).unwrap();
            prop_assert_eq!(parsed, reparsed);
            prop_assert_eq!(serialized.clone(), Position::parse(&serialized).unwrap().to_notation());
        }
    }
}
