//! 1-D compaction and merge: the routine every directional move reduces to.

use super::{Score, Tile};

/// A merge that happened while processing one line.
///
/// `position` is in original (non-reversed) line coordinates, `value` is
/// the doubled tile left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePoint {
    pub position: usize,
    pub value: Tile,
}

/// Result of processing one row or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    pub line: Vec<Tile>,
    pub moved: bool,
    pub score: Score,
    pub merges: Vec<MergePoint>,
}

/// Pack a line leftward and merge adjacent equal tiles, single pass.
///
/// With `reverse` the input is flipped before packing and flipped back
/// after, which turns the leftward routine into a rightward one; merge
/// positions are translated back to the caller's coordinates.
///
/// Each tile merges at most once per call: `[2, 2, 2, 2]` becomes
/// `[4, 4, 0, 0]` with score 8, never `[8, 0, 0, 0]`.
///
/// ```
/// use twenty48_core::engine::line::process_line;
/// let res = process_line(&[2, 2, 2, 2], false);
/// assert_eq!(res.line, vec![4, 4, 0, 0]);
/// assert_eq!(res.score, 8);
/// ```
pub fn process_line(line: &[Tile], reverse: bool) -> LineResult {
    let size = line.len();
    let mut oriented: Vec<Tile> = line.to_vec();
    if reverse {
        oriented.reverse();
    }

    // First pack: drop zeros, keep relative order.
    let mut packed: Vec<Tile> = oriented.iter().copied().filter(|&t| t != 0).collect();
    packed.resize(size, 0);
    let mut moved = packed != oriented;

    // Single merge pass, left to right. A merged cell is zeroed and the
    // scan continues past it, so the doubled tile never merges again.
    let mut score: Score = 0;
    let mut merges = Vec::new();
    for i in 0..size.saturating_sub(1) {
        if packed[i] != 0 && packed[i] == packed[i + 1] {
            packed[i] *= 2;
            packed[i + 1] = 0;
            score += Score::from(packed[i]);
            moved = true;
            let position = if reverse { size - 1 - i } else { i };
            merges.push(MergePoint {
                position,
                value: packed[i],
            });
        }
    }

    // Second pack: close the hole each merge left.
    let mut out: Vec<Tile> = packed.iter().copied().filter(|&t| t != 0).collect();
    out.resize(size, 0);
    if reverse {
        out.reverse();
    }

    LineResult {
        line: out,
        moved,
        score,
        merges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_packs_without_merging() {
        let res = process_line(&[0, 0, 2, 0], false);
        assert_eq!(res.line, vec![2, 0, 0, 0]);
        assert!(res.moved);
        assert_eq!(res.score, 0);
        assert!(res.merges.is_empty());
    }

    #[test]
    fn it_detects_noop_lines() {
        let res = process_line(&[2, 0, 0, 0], false);
        assert_eq!(res.line, vec![2, 0, 0, 0]);
        assert!(!res.moved);

        let res = process_line(&[0, 0, 0, 0], false);
        assert!(!res.moved);
        assert_eq!(res.score, 0);

        // Fully packed and unmergeable.
        let res = process_line(&[2, 4, 2, 4], false);
        assert!(!res.moved);
    }

    #[test]
    fn it_merges_single_pass() {
        let res = process_line(&[2, 2, 2, 2], false);
        assert_eq!(res.line, vec![4, 4, 0, 0]);
        assert_eq!(res.score, 8);
        assert_eq!(
            res.merges,
            vec![
                MergePoint { position: 0, value: 4 },
                MergePoint { position: 2, value: 4 },
            ]
        );

        // No cascading: the 4 produced at index 0 must not eat the next 4.
        let res = process_line(&[2, 2, 4, 0], false);
        assert_eq!(res.line, vec![4, 4, 0, 0]);
        assert_eq!(res.score, 4);
    }

    #[test]
    fn it_merges_across_gaps() {
        let res = process_line(&[2, 0, 0, 2], false);
        assert_eq!(res.line, vec![4, 0, 0, 0]);
        assert_eq!(res.score, 4);
        assert!(res.moved);
    }

    #[test]
    fn it_reverses_for_rightward_lines() {
        let res = process_line(&[0, 2, 2, 0], true);
        assert_eq!(res.line, vec![0, 0, 0, 4]);
        assert_eq!(res.score, 4);
        // Position translated back into original coordinates.
        assert_eq!(res.merges, vec![MergePoint { position: 3, value: 4 }]);

        let res = process_line(&[2, 2, 4, 4], true);
        assert_eq!(res.line, vec![0, 0, 4, 8]);
        assert_eq!(res.score, 12);
    }

    #[test]
    fn it_handles_non_default_sizes() {
        let res = process_line(&[2, 2], false);
        assert_eq!(res.line, vec![4, 0]);

        let res = process_line(&[2, 2, 2, 2, 2], false);
        assert_eq!(res.line, vec![4, 4, 2, 0, 0]);
        assert_eq!(res.score, 8);
    }
}
