use rand::prelude::*;

use crate::model::*;

// シャッフル済みの物理牌136枚
pub fn create_wall(rng: &mut StdRng) -> Vec<Tile136> {
    let mut wall: Vec<Tile136> = (0..TILE136).filter_map(|id| Tile136::new(id).ok()).collect();
    wall.shuffle(rng);
    wall
}

pub fn move_tiles(source: &mut Vec<Tile136>, target: &mut Vec<Tile136>, count: usize) {
    for _ in 0..count {
        if let Some(t) = source.pop() {
            target.push(t);
        }
    }
}

#[test]
fn test_wall() {
    let mut rng: StdRng = SeedableRng::seed_from_u64(0);
    let wall = create_wall(&mut rng);
    assert_eq!(wall.len(), TILE136);
    let mut ids: Vec<usize> = wall.iter().map(|t| t.id()).collect();
    ids.sort();
    assert_eq!(ids, (0..TILE136).collect::<Vec<usize>>());

    let mut rng2: StdRng = SeedableRng::seed_from_u64(0);
    assert_eq!(wall, create_wall(&mut rng2));

    let mut source = wall.clone();
    let mut hand = vec![];
    move_tiles(&mut source, &mut hand, 13);
    assert_eq!(hand.len(), 13);
    assert_eq!(source.len(), TILE136 - 13);
}
