//! Fast-path legality checking.
//!
//! Wraps the embedded standard rules engine (cozy-chess). Only invoked
//! when the current position passes the standard-setup gate; everything
//! else is delegated to the oracle. Input that cannot be read as a
//! standard move is never an error, it simply falls through.

use cozy_chess::{Board, Color, File, GameStatus, Move, Piece, Rank, Square};

use crate::side::Side;

/// A locally resolved standard move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardMove {
    pub san: String,
    pub fen_after: String,
}

/// Authoritative status of a canonical position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Checkmate { winner: Side },
    Stalemate,
    Draw,
}

/// Try to read `input` as a standard legal move from `fen`: first as a
/// coordinate pair (`e2e4`, `e2 to e4`, `e2xe4`, optional promotion
/// letter), then as short algebraic notation matched against the legal
/// move list.
pub fn try_standard_move(fen: &str, input: &str) -> Option<StandardMove> {
    let board = parse_board(fen)?;
    let legal = legal_moves(&board);

    if let Some((from, to, promotion)) = parse_coordinate_pair(input) {
        let mv = normalize_castling(
            Move {
                from,
                to,
                promotion,
            },
            &legal,
        );
        if legal.contains(&mv) {
            return Some(resolve(&board, mv, &legal));
        }
    }

    let wanted = normalize_san_input(input)?;
    for mv in &legal {
        if san_for(&board, *mv, &legal) == wanted {
            return Some(resolve(&board, *mv, &legal));
        }
    }
    None
}

/// Status of a canonical position. Unreadable positions report as
/// ongoing; termination for such boards is inferred from narrative
/// keywords instead.
pub fn game_status(fen: &str) -> GameOutcome {
    let Some(board) = parse_board(fen) else {
        return GameOutcome::Ongoing;
    };
    match board.status() {
        GameStatus::Ongoing => GameOutcome::Ongoing,
        GameStatus::Won => {
            let winner = match board.side_to_move() {
                Color::White => Side::black(),
                Color::Black => Side::white(),
            };
            GameOutcome::Checkmate { winner }
        }
        GameStatus::Drawn => {
            if legal_moves(&board).is_empty() && board.checkers().is_empty() {
                GameOutcome::Stalemate
            } else {
                GameOutcome::Draw
            }
        }
    }
}

/// SAN labels for every legal move, fed to the oracle when it picks the
/// opponent's reply on the standard path.
pub fn legal_moves_san(fen: &str) -> Vec<String> {
    let Some(board) = parse_board(fen) else {
        return Vec::new();
    };
    let legal = legal_moves(&board);
    legal.iter().map(|mv| san_for(&board, *mv, &legal)).collect()
}

/// Parse a FEN string, tolerating missing trailing fields (the position
/// codec serializes placement and side to move only).
fn parse_board(fen: &str) -> Option<Board> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next()?;
    let stm = fields.next().unwrap_or("w");
    let castling = fields.next().unwrap_or("-");
    let en_passant = fields.next().unwrap_or("-");
    let halfmove = fields.next().unwrap_or("0");
    let fullmove = fields.next().unwrap_or("1");
    format!("{placement} {stm} {castling} {en_passant} {halfmove} {fullmove}")
        .parse()
        .ok()
}

fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|mvs| {
        moves.extend(mvs);
        false
    });
    moves
}

fn resolve(board: &Board, mv: Move, legal: &[Move]) -> StandardMove {
    let mut san = san_for(board, mv, legal);
    let mut next = board.clone();
    next.play_unchecked(mv);
    if !next.checkers().is_empty() {
        san.push(if next.status() == GameStatus::Won {
            '#'
        } else {
            '+'
        });
    }
    StandardMove {
        san,
        fen_after: next.to_string(),
    }
}

/// Generate SAN for a legal move, with file/rank disambiguation but no
/// check suffix (appended separately once the move is played).
fn san_for(board: &Board, mv: Move, legal: &[Move]) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return format!("{}{}", mv.from, mv.to);
    };

    // cozy-chess encodes castling as king-takes-own-rook.
    if piece == Piece::King && board.color_on(mv.to) == Some(board.side_to_move()) {
        return if (mv.to.file() as usize) > (mv.from.file() as usize) {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let is_capture = board.piece_on(mv.to).is_some()
        || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    let mut san = String::new();
    match piece {
        Piece::Pawn => {
            if is_capture {
                san.push(file_char(mv.from.file()));
            }
        }
        _ => {
            san.push(piece_char(piece));
            san.push_str(&disambiguation(board, mv, piece, legal));
        }
    }
    if is_capture {
        san.push('x');
    }
    san.push(file_char(mv.to.file()));
    san.push_str(&(mv.to.rank() as usize + 1).to_string());
    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(piece_char(promo));
    }
    san
}

fn disambiguation(board: &Board, mv: Move, piece: Piece, legal: &[Move]) -> String {
    let rivals: Vec<&Move> = legal
        .iter()
        .filter(|other| {
            other.to == mv.to && other.from != mv.from && board.piece_on(other.from) == Some(piece)
        })
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|other| other.from.file() != mv.from.file()) {
        return file_char(mv.from.file()).to_string();
    }
    if rivals.iter().all(|other| other.from.rank() != mv.from.rank()) {
        return (mv.from.rank() as usize + 1).to_string();
    }
    format!("{}{}", file_char(mv.from.file()), mv.from.rank() as usize + 1)
}

/// Convert a king-moves-two-squares castling attempt to cozy-chess's
/// king-takes-rook representation when that matches a legal move.
fn normalize_castling(mv: Move, legal: &[Move]) -> Move {
    let on_back_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    if !(on_back_rank && mv.from.file() == File::E && mv.promotion.is_none()) {
        return mv;
    }
    let rook_file = match mv.to.file() {
        File::G => File::H,
        File::C => File::A,
        _ => return mv,
    };
    let converted = Move {
        from: mv.from,
        to: Square::new(rook_file, mv.from.rank()),
        promotion: None,
    };
    if legal.contains(&converted) {
        converted
    } else {
        mv
    }
}

fn parse_coordinate_pair(input: &str) -> Option<(Square, Square, Option<Piece>)> {
    let lowered = input.trim().to_ascii_lowercase();
    let (from, rest) = take_square(&lowered)?;
    let rest = skip_separators(rest);
    let (to, rest) = take_square(rest)?;
    let promotion = take_promotion(rest)?;
    Some((from, to, promotion))
}

fn take_square(s: &str) -> Option<(Square, &str)> {
    let mut chars = s.char_indices();
    let (_, file_char) = chars.next()?;
    let (_, rank_char) = chars.next()?;
    let file = parse_file(file_char)?;
    let rank = parse_rank(rank_char)?;
    Some((Square::new(file, rank), &s[2..]))
}

fn skip_separators(mut s: &str) -> &str {
    loop {
        let trimmed = s.trim_start();
        s = if let Some(rest) = trimmed.strip_prefix("takes") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("to") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix('x') {
            rest
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            rest
        } else {
            return trimmed;
        };
    }
}

fn take_promotion(rest: &str) -> Option<Option<Piece>> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Some(None);
    }
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    let mut chars = rest.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    promotion_piece(c).map(Some)
}

fn promotion_piece(c: char) -> Option<Piece> {
    match c {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}

fn normalize_san_input(input: &str) -> Option<String> {
    let mut s = input.trim().to_string();
    while s.ends_with(['+', '#', '!', '?']) {
        s.pop();
    }
    if s.is_empty() {
        return None;
    }
    match s.as_str() {
        "0-0" | "o-o" => Some("O-O".to_string()),
        "0-0-0" | "o-o-o" => Some("O-O-O".to_string()),
        _ => Some(s),
    }
}

fn parse_file(c: char) -> Option<File> {
    match c {
        'a' => Some(File::A),
        'b' => Some(File::B),
        'c' => Some(File::C),
        'd' => Some(File::D),
        'e' => Some(File::E),
        'f' => Some(File::F),
        'g' => Some(File::G),
        'h' => Some(File::H),
        _ => None,
    }
}

fn parse_rank(c: char) -> Option<Rank> {
    match c {
        '1' => Some(Rank::First),
        '2' => Some(Rank::Second),
        '3' => Some(Rank::Third),
        '4' => Some(Rank::Fourth),
        '5' => Some(Rank::Fifth),
        '6' => Some(Rank::Sixth),
        '7' => Some(Rank::Seventh),
        '8' => Some(Rank::Eighth),
        _ => None,
    }
}

fn file_char(f: File) -> char {
    match f {
        File::A => 'a',
        File::B => 'b',
        File::C => 'c',
        File::D => 'd',
        File::E => 'e',
        File::F => 'f',
        File::G => 'g',
        File::H => 'h',
    }
}

fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn resolves_san_pawn_push() {
        let mv = try_standard_move(INITIAL, "e4").unwrap();
        assert_eq!(mv.san, "e4");
        assert!(mv.fen_after.starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
    }

    #[test]
    fn resolves_coordinate_pairs() {
        for input in ["e2e4", "e2 e4", "e2 to e4", "e2-e4", "E2 TO E4"] {
            let mv = try_standard_move(INITIAL, input).expect(input);
            assert_eq!(mv.san, "e4", "input: {input}");
        }
    }

    #[test]
    fn resolves_knight_san() {
        let mv = try_standard_move(INITIAL, "Nf3").unwrap();
        assert_eq!(mv.san, "Nf3");
    }

    #[test]
    fn resolves_capture_notation() {
        // After 1. e4 d5 white can take on d5.
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        let by_san = try_standard_move(fen, "exd5").unwrap();
        assert_eq!(by_san.san, "exd5");
        let by_coord = try_standard_move(fen, "e4xd5").unwrap();
        assert_eq!(by_coord.san, "exd5");
        let spelled = try_standard_move(fen, "e4 takes d5").unwrap();
        assert_eq!(spelled.san, "exd5");
    }

    #[test]
    fn resolves_promotion() {
        let fen = "8/P7/8/8/8/8/8/K1k5 w - - 0 1";
        let mv = try_standard_move(fen, "a7a8=q").unwrap();
        assert_eq!(mv.san, "a8=Q");
        let by_san = try_standard_move(fen, "a8=Q").unwrap();
        assert_eq!(by_san.san, "a8=Q");
    }

    #[test]
    fn resolves_castling_in_both_notations() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
        let uci_style = try_standard_move(fen, "e1g1").unwrap();
        assert_eq!(uci_style.san, "O-O");
        let san_style = try_standard_move(fen, "O-O").unwrap();
        assert_eq!(san_style.san, "O-O");
        let zeros = try_standard_move(fen, "0-0").unwrap();
        assert_eq!(zeros.san, "O-O");
    }

    #[test]
    fn illegal_or_unreadable_input_returns_none() {
        assert!(try_standard_move(INITIAL, "e5").is_none());
        assert!(try_standard_move(INITIAL, "e2e5").is_none());
        assert!(try_standard_move(INITIAL, "my pawns grow wings").is_none());
        assert!(try_standard_move(INITIAL, "").is_none());
        // Unparseable FEN: not a fast-path move either.
        assert!(try_standard_move("W7/8 w", "e4").is_none());
    }

    #[test]
    fn check_suffix_is_appended() {
        // Scholar's mate delivery.
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/8/PPPP1PPP/RNBQK1NR w KQkq - 0 1";
        let mv = try_standard_move(fen, "Qh5").unwrap();
        assert_eq!(mv.san, "Qh5");
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1";
        let mate = try_standard_move(fen, "Qxf7").unwrap();
        assert_eq!(mate.san, "Qxf7#");
    }

    #[test]
    fn status_of_fresh_game_is_ongoing() {
        assert_eq!(game_status(INITIAL), GameOutcome::Ongoing);
    }

    #[test]
    fn detects_checkmate_winner() {
        // Fool's mate.
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert_eq!(
            game_status(fen),
            GameOutcome::Checkmate {
                winner: Side::black()
            }
        );
    }

    #[test]
    fn detects_stalemate() {
        let fen = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";
        assert_eq!(game_status(fen), GameOutcome::Stalemate);
    }

    #[test]
    fn unreadable_position_reports_ongoing() {
        assert_eq!(game_status("W7/8 w"), GameOutcome::Ongoing);
    }

    #[test]
    fn legal_move_list_has_twenty_openers() {
        let sans = legal_moves_san(INITIAL);
        assert_eq!(sans.len(), 20);
        assert!(sans.contains(&"e4".to_string()));
        assert!(sans.contains(&"Nf3".to_string()));
    }

    #[test]
    fn disambiguates_sibling_knights() {
        let fen = "k7/8/8/8/8/8/8/K4N1N w - - 0 1";
        let mv = try_standard_move(fen, "Nhg3").unwrap();
        assert_eq!(mv.san, "Nhg3");
        assert!(try_standard_move(fen, "Nfg3").is_some());
    }
}
