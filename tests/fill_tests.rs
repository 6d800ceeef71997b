use smallvec::smallvec;
use tilemap_editor_core::fill::flood_fill;
use tilemap_editor_core::{CellStack, MapGrid};

fn uniform(w: u32, h: u32, gid: u32) -> Vec<CellStack> {
    vec![smallvec![gid]; (w * h) as usize]
}

#[test]
fn fills_three_by_three_from_center() {
    let mut cells = uniform(3, 3, 5);
    let changes = flood_fill(&mut cells, 3, 3, 1, 1, 9);
    assert_eq!(changes.len(), 9);
    assert!(changes.iter().all(|c| c.old_value() == 5 && c.new_value() == 9));
    assert!(cells.iter().all(|c| c.as_slice() == [9]));
}

#[test]
fn filling_with_the_same_value_changes_nothing() {
    let mut cells = uniform(4, 4, 2);
    let before = cells.clone();
    assert!(flood_fill(&mut cells, 4, 4, 0, 3, 2).is_empty());
    assert_eq!(cells, before);
}

#[test]
fn large_region_visits_each_cell_once() {
    let mut cells = uniform(50, 50, 1);
    // a wall down column 25 splits the map; only the left half is reachable
    for y in 0..50 {
        cells[y * 50 + 25] = smallvec![7];
    }
    let changes = flood_fill(&mut cells, 50, 50, 0, 0, 3);
    assert_eq!(changes.len(), 25 * 50);

    let mut seen = std::collections::HashSet::new();
    assert!(changes.iter().all(|c| seen.insert((c.x, c.y))));
    assert!(changes.iter().all(|c| c.x < 25));
    assert_eq!(cells[26].as_slice(), &[1]);
}

#[test]
fn whole_fifty_by_fifty_grid() {
    let mut cells = vec![CellStack::new(); 2500];
    let changes = flood_fill(&mut cells, 50, 50, 49, 49, 4);
    assert_eq!(changes.len(), 2500);
    assert!(cells.iter().all(|c| c.as_slice() == [4]));
}

#[test]
fn diagonal_neighbours_are_not_connected() {
    let mut map = MapGrid::with_layers(3, 3, &["ground"]);
    // checkerboard of 1s; only the start cell matches its 4-neighbourhood
    for (x, y) in [(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)] {
        map.paint(0, x, y, 1).unwrap();
    }
    let delta = map.fill(0, 1, 1, 8).unwrap().expect("changed");
    assert_eq!(delta.changes().len(), 1);
    assert_eq!(map.cell(0, 0, 0).unwrap().as_slice(), &[1]);
}

#[test]
fn map_fill_is_a_no_op_when_already_filled() {
    let mut map = MapGrid::with_layers(2, 2, &["ground"]);
    assert!(map.fill(0, 0, 0, 0).unwrap().is_none());
    assert!(map.fill(0, 0, 0, 6).unwrap().is_some());
    assert!(map.fill(0, 1, 1, 6).unwrap().is_none());
}
