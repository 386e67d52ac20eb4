//! Coordinate helpers for dynamically sized boards.
//!
//! Rows are counted from the top of the board (most significant rank
//! first, matching notation order); algebraic ranks count from the
//! bottom. File labels are bijective base-26: `a`..`z`, then `aa`.

/// A square addressed by grid indices. `row` 0 is the top rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// Label for a zero-based file index: 0 is `a`, 25 is `z`, 26 is `aa`.
pub fn file_label(col: usize) -> String {
    let mut n = col + 1;
    let mut label = String::new();
    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    label
}

/// Inverse of [`file_label`]. `None` for anything but lowercase ASCII.
pub fn file_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut n = 0usize;
    for c in label.chars() {
        if !c.is_ascii_lowercase() {
            return None;
        }
        let digit = (c as usize) - ('a' as usize) + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    Some(n - 1)
}

/// Parse an algebraic coordinate like `e4`, `j10` or `aa3` against the
/// given board dimensions. Returns `None` for anything out of range.
pub fn parse_algebraic(square: &str, num_files: usize, num_ranks: usize) -> Option<Coord> {
    let split = square.find(|c: char| !c.is_ascii_lowercase())?;
    let (file_part, rank_part) = square.split_at(split);
    let col = file_index(file_part)?;

    let rank: usize = rank_part.parse().ok()?;
    if rank == 0 || rank > num_ranks || col >= num_files {
        return None;
    }

    Some(Coord {
        row: num_ranks - rank,
        col,
    })
}

/// Format grid indices as an algebraic coordinate.
pub fn to_algebraic(row: usize, col: usize, num_ranks: usize) -> String {
    format!("{}{}", file_label(col), num_ranks - row)
}
