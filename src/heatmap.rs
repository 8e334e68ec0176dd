use crate::scoreline::ScoreEntry;

/// Largest grid built (8 MB of cells); only keys that would exhaust memory go past it.
pub const MAX_HEATMAP_CELLS: usize = 1_000_000;

/// `grid[home_goals][away_goals]`, zero where no scoreline was listed.
pub type Heatmap = Vec<Vec<f64>>;

pub fn build_heatmap(scores: &[ScoreEntry]) -> Heatmap {
    let Some((rows, cols)) = heatmap_dims(scores) else {
        return Vec::new();
    };
    let mut grid = vec![vec![0.0; cols]; rows];
    for s in scores {
        let (Ok(h), Ok(a)) = (usize::try_from(s.home_goals), usize::try_from(s.away_goals)) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(h).and_then(|row| row.get_mut(a)) {
            *cell = s.probability;
        }
    }
    grid
}

fn heatmap_dims(scores: &[ScoreEntry]) -> Option<(usize, usize)> {
    let max_h = scores.iter().map(|s| s.home_goals).max()?;
    let max_a = scores.iter().map(|s| s.away_goals).max()?;
    let rows = usize::try_from(max_h).ok()?.checked_add(1)?;
    let cols = usize::try_from(max_a).ok()?.checked_add(1)?;
    let cells = rows.checked_mul(cols)?;
    if cells > MAX_HEATMAP_CELLS {
        return None;
    }
    Some((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_gives_empty_grid() {
        assert!(build_heatmap(&[]).is_empty());
    }

    #[test]
    fn grid_is_sized_to_max_goals() {
        let scores = [ScoreEntry::new(3, 0, 0.1), ScoreEntry::new(0, 1, 0.2)];
        let grid = build_heatmap(&scores);
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert_eq!(grid[3][0], 0.1);
        assert_eq!(grid[0][1], 0.2);
        assert_eq!(grid[0][0], 0.0);
        assert_eq!(grid[3][1], 0.0);
    }

    #[test]
    fn duplicate_scoreline_keeps_last_write() {
        let scores = [ScoreEntry::new(1, 1, 0.1), ScoreEntry::new(1, 1, 0.3)];
        let grid = build_heatmap(&scores);
        assert_eq!(grid[1][1], 0.3);
    }

    #[test]
    fn large_but_plausible_grid_is_built() {
        let scores = [ScoreEntry::new(100, 0, 0.01), ScoreEntry::new(0, 100, 0.02)];
        let grid = build_heatmap(&scores);
        assert_eq!(grid.len(), 101);
        assert!(grid.iter().all(|row| row.len() == 101));
        assert_eq!(grid[100][0], 0.01);
        assert_eq!(grid[0][100], 0.02);
    }

    #[test]
    fn oversized_grid_is_refused() {
        let scores = [ScoreEntry::new(2000, 0, 0.1), ScoreEntry::new(0, 2000, 0.1)];
        assert!(build_heatmap(&scores).is_empty());
        let wide = [ScoreEntry::new(0, u32::MAX, 0.1)];
        assert!(build_heatmap(&wide).is_empty());
    }
}
