//! Bucket fill over one layer of cell stacks.

use crate::history::CellChange;
use crate::map::{visible_gid, CellStack, Gid};

/// Repaint the 4-connected region around `(start_x, start_y)` whose visible
/// value equals the start cell's.
///
/// Each filled cell gets its topmost tile replaced by `replacement` (an empty
/// cell gets a one-tile stack; filling with 0 removes the top tile). Returns
/// one change per filled cell in visit order, or nothing when the start cell
/// already shows `replacement` or lies off the map.
pub fn flood_fill(
    cells: &mut [CellStack],
    width: u32,
    height: u32,
    start_x: u32,
    start_y: u32,
    replacement: Gid,
) -> Vec<CellChange> {
    let (w, h) = (width as i64, height as i64);
    if start_x as i64 >= w || start_y as i64 >= h || cells.len() < (w * h) as usize {
        return Vec::new();
    }

    let target = visible_gid(&cells[(start_y * width + start_x) as usize]);
    if target == replacement {
        return Vec::new();
    }

    let mut changes = Vec::new();
    let mut visited = vec![false; (w * h) as usize];
    let mut stack = vec![(start_x as i64, start_y as i64)];

    while let Some((x, y)) = stack.pop() {
        if x < 0 || x >= w || y < 0 || y >= h {
            continue;
        }
        let idx = (y * w + x) as usize;
        if visited[idx] || visible_gid(&cells[idx]) != target {
            continue;
        }
        visited[idx] = true;

        let old = cells[idx].clone();
        replace_top(&mut cells[idx], replacement);
        changes.push(CellChange::new(x as u32, y as u32, old, cells[idx].clone()));

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    changes
}

fn replace_top(stack: &mut CellStack, gid: Gid) {
    match stack.iter().rposition(|&g| g > 0) {
        Some(i) if gid == 0 => {
            stack.truncate(i);
        }
        Some(i) => stack[i] = gid,
        None if gid == 0 => {}
        None => stack.push(gid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn replaces_only_the_top_tile() {
        let mut cells: Vec<CellStack> = vec![smallvec![1, 5], smallvec![5], smallvec![2]];
        let changes = flood_fill(&mut cells, 3, 1, 0, 0, 9);
        assert_eq!(changes.len(), 2);
        assert_eq!(cells[0].as_slice(), &[1, 9]);
        assert_eq!(cells[1].as_slice(), &[9]);
        assert_eq!(cells[2].as_slice(), &[2]);
        assert!(changes.iter().all(|c| c.old_value() == 5));
    }

    #[test]
    fn empty_cells_get_a_single_tile() {
        let mut cells: Vec<CellStack> = vec![CellStack::new(); 4];
        let changes = flood_fill(&mut cells, 2, 2, 1, 1, 3);
        assert_eq!(changes.len(), 4);
        assert!(cells.iter().all(|c| c.as_slice() == [3]));
    }

    #[test]
    fn filling_with_zero_removes_the_top_tile() {
        let mut cells: Vec<CellStack> = vec![smallvec![4, 6], smallvec![6]];
        flood_fill(&mut cells, 2, 1, 0, 0, 0);
        assert_eq!(cells[0].as_slice(), &[4]);
        assert!(cells[1].is_empty());
    }

    #[test]
    fn start_outside_map_is_a_no_op() {
        let mut cells: Vec<CellStack> = vec![CellStack::new(); 4];
        assert!(flood_fill(&mut cells, 2, 2, 2, 0, 1).is_empty());
    }
}
