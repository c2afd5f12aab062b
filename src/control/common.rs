use crate::model::*;
use crate::util::misc::vec_count;

// [TileTable]

#[inline]
pub fn count_tile(tt: &TileTable, t: Tile) -> usize {
    tt[t.0][t.1]
}

#[inline]
pub fn inc_tile(tt: &mut TileTable, t: Tile) {
    tt[t.0][t.1] += 1;
}

#[inline]
pub fn dec_tile(tt: &mut TileTable, t: Tile) {
    assert!(tt[t.0][t.1] != 0, "no {} in tile table", t);
    tt[t.0][t.1] -= 1;
}

pub fn tiles_to_tile_table(tiles: &[Tile136]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t.class());
    }
    tt
}

pub fn classes_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

// [Dora]

// ドラ表示牌からドラを返却
pub fn dora_from_indicator(d: Tile) -> Tile {
    let ni = if d.is_hornor() {
        match d.1 {
            WN => WE,
            DR => DW,
            i => i + 1,
        }
    } else {
        match d.1 {
            9 => 1,
            i => i + 1,
        }
    };
    Tile(d.0, ni)
}

// 牌の種類に対するドラ表示牌によるドラの数 (赤ドラを含まない)
pub fn count_dora_class(t: Tile, doras: &[Tile136]) -> usize {
    doras
        .iter()
        .filter(|d| dora_from_indicator(d.class()) == t)
        .count()
}

// 物理牌1枚のドラの数 (赤ドラを含む)
pub fn count_dora_tile(t: Tile136, doras: &[Tile136], has_aka_dora: bool) -> usize {
    count_dora_class(t.class(), doras) + t.is_red(has_aka_dora) as usize
}

// 手牌から指定した種類の物理牌を探す.
// 赤ドラ有効時の5は通常の5を優先し,赤5しかない場合のみ赤5を返却.
pub fn find_tile_in_hand(t: Tile, hand: &[Tile136], has_aka_dora: bool) -> Option<Tile136> {
    let mut found = None;
    for &t136 in hand {
        if t136.class() != t {
            continue;
        }
        if !t136.is_red(has_aka_dora) {
            return Some(t136);
        }
        found.get_or_insert(t136);
    }
    found
}

// [Hand shape]

// 前後2枚以内に同種の数牌がなく,同じ牌も他に持っていない
pub fn is_tile_strictly_isolated(tt: &TileTable, t: Tile) -> bool {
    let mut tt = *tt;
    let Tile(ti, ni) = t;
    tt[ti][ni] = tt[ti][ni].saturating_sub(1);

    if t.is_hornor() {
        return tt[ti][ni] == 0;
    }

    let lo = ni.saturating_sub(2).max(1);
    let hi = (ni + 2).min(9);
    (lo..=hi).all(|n| tt[ti][n] == 0)
}

// [Parse]

// 式から物理牌を割り当てる. 同じ物理牌は二度割り当てない.
#[derive(Debug)]
pub struct TileAllocator {
    used: [bool; TILE136],
    has_aka_dora: bool,
}

impl TileAllocator {
    pub fn new(has_aka_dora: bool) -> Self {
        Self {
            used: [false; TILE136],
            has_aka_dora,
        }
    }

    // is_red: 赤5を指定 (各5の0番目の物理牌)
    pub fn alloc(&mut self, t: Tile, is_red: bool) -> Result<Tile136, String> {
        let copies: Vec<usize> = if is_red {
            if t.is_hornor() || t.1 != 5 {
                return Err(format!("{} cannot be red", t));
            }
            vec![0]
        } else if t.is_suit() && t.1 == 5 && self.has_aka_dora {
            vec![1, 2, 3]
        } else {
            vec![0, 1, 2, 3]
        };

        for c in copies {
            let t136 = Tile136::from_copy(t, c)?;
            if !self.used[t136.id()] {
                self.used[t136.id()] = true;
                return Ok(t136);
            }
        }
        Err(format!("too many copies of {}", t))
    }
}

fn parse_symbols(exp: &str) -> Result<Vec<(Tile, bool, bool)>, String> {
    // (tile, is_red, has '+' suffix)
    let mut res: Vec<(Tile, bool, bool)> = vec![];
    let undef: usize = 255;
    let mut ti = undef;
    for c in exp.chars() {
        match c {
            'm' => ti = TM,
            'p' => ti = TP,
            's' => ti = TS,
            'z' => ti = TZ,
            '+' => match res.last_mut() {
                Some(last) => last.2 = true,
                None => return Err("invalid '+' suffix".to_string()),
            },
            '0'..='9' => {
                if ti == undef {
                    return Err("tile number befor tile type".to_string());
                }
                let ni = c.to_digit(10).unwrap_or_default() as usize;
                let t = Tile::from_symbol(&format!("{}{}", ['m', 'p', 's', 'z'][ti], ni))?;
                res.push((t, ni == 0, false));
            }
            _ => {
                return Err(format!("invalid char: '{}'", c));
            }
        }
    }
    Ok(res)
}

// 牌の種類のリスト (赤5は通常の5として扱う)
pub fn tile_classes_from_string(exp: &str) -> Result<Vec<Tile>, String> {
    Ok(parse_symbols(exp)?.into_iter().map(|(t, _, _)| t).collect())
}

pub fn tiles_from_string(exp: &str, alloc: &mut TileAllocator) -> Result<Vec<Tile136>, String> {
    let mut tiles = vec![];
    for (t, is_red, called) in parse_symbols(exp)? {
        if called {
            return Err(format!("'+' is only allowed in meld: {}", exp));
        }
        tiles.push(alloc.alloc(t, is_red)?);
    }
    Ok(tiles)
}

// 赤ドラの設定に応じた表記のリスト
pub fn tiles_to_string(tiles: &[Tile136], has_aka_dora: bool) -> String {
    let vs: Vec<String> = tiles.iter().map(|t| t.to_symbol(has_aka_dora)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// "m3+45", "z555+", "p5555" (暗槓) 形式
pub fn meld_from_string(exp: &str, alloc: &mut TileAllocator) -> Result<Meld, String> {
    let symbols = parse_symbols(exp)?;
    if vec_count(&symbols.iter().map(|s| s.2).collect::<Vec<bool>>(), &true) > 1 {
        return Err(format!("multiple called tiles: '{}'", exp));
    }

    let mut tiles = vec![];
    let mut called = None;
    for &(t, is_red, c) in &symbols {
        let t136 = alloc.alloc(t, is_red)?;
        if c {
            called = Some(t136);
        }
        tiles.push(t136);
    }

    let mut classes: Vec<Tile> = tiles.iter().map(|t| t.class()).collect();
    classes.sort();
    let is_same = classes.windows(2).all(|w| w[0] == w[1]);
    let is_sequence = classes.len() == 3
        && classes[0].is_suit()
        && classes[1].0 == classes[0].0
        && classes[2].0 == classes[0].0
        && classes[1].1 == classes[0].1 + 1
        && classes[2].1 == classes[0].1 + 2;

    let meld_type = match (classes.len(), is_same, is_sequence, called.is_some()) {
        (3, false, true, true) => MeldType::Chi,
        (3, true, _, true) => MeldType::Pon,
        (4, true, _, true) => MeldType::Minkan,
        (4, true, _, false) => MeldType::Ankan,
        _ => return Err(format!("invalid meld: '{}'", exp)),
    };

    Ok(Meld {
        meld_type,
        tiles,
        called,
    })
}

pub fn wind_from_char(c: char) -> Result<Tnum, String> {
    Ok(match c {
        'E' => WE,
        'S' => WS,
        'W' => WW,
        'N' => WN,
        _ => return Err(format!("invalid wind symbol: {}", c)),
    })
}

#[test]
fn test_dora_indicator() {
    assert_eq!(dora_from_indicator(Tile(TM, 9)), Tile(TM, 1));
    assert_eq!(dora_from_indicator(Tile(TP, 4)), Tile(TP, 5));
    assert_eq!(dora_from_indicator(Tile(TZ, WN)), Tile(TZ, WE));
    assert_eq!(dora_from_indicator(Tile(TZ, WS)), Tile(TZ, WW));
    assert_eq!(dora_from_indicator(Tile(TZ, DR)), Tile(TZ, DW));
    assert_eq!(dora_from_indicator(Tile(TZ, DW)), Tile(TZ, DG));
}

#[test]
fn test_count_dora() {
    let mut alloc = TileAllocator::new(true);
    let doras = tiles_from_string("m4m4z4", &mut alloc).unwrap();
    assert_eq!(count_dora_class(Tile(TM, 5), &doras), 2);
    assert_eq!(count_dora_class(Tile(TZ, WE), &doras), 1);
    assert_eq!(count_dora_class(Tile(TM, 6), &doras), 0);

    let red = alloc.alloc(Tile(TM, 5), true).unwrap();
    assert_eq!(count_dora_tile(red, &doras, true), 3);
    assert_eq!(count_dora_tile(red, &doras, false), 2);
}

#[test]
fn test_find_tile_in_hand() {
    let mut alloc = TileAllocator::new(true);
    let hand = tiles_from_string("m055", &mut alloc).unwrap();
    let t = find_tile_in_hand(Tile(TM, 5), &hand, true).unwrap();
    assert!(!t.is_red(true));

    let hand = tiles_from_string("p0", &mut alloc).unwrap();
    let t = find_tile_in_hand(Tile(TP, 5), &hand, true).unwrap();
    assert!(t.is_red(true));
    assert_eq!(find_tile_in_hand(Tile(TS, 5), &hand, true), None);
}

#[test]
fn test_isolated() {
    let mut alloc = TileAllocator::new(true);
    let tt = tiles_to_tile_table(&tiles_from_string("m136p19z112s5", &mut alloc).unwrap());
    assert!(is_tile_strictly_isolated(&tt, Tile(TP, 1)));
    assert!(is_tile_strictly_isolated(&tt, Tile(TS, 5)));
    assert!(is_tile_strictly_isolated(&tt, Tile(TZ, WS)));
    assert!(!is_tile_strictly_isolated(&tt, Tile(TM, 1)));
    assert!(!is_tile_strictly_isolated(&tt, Tile(TM, 3)));
    assert!(is_tile_strictly_isolated(&tt, Tile(TM, 6))); // 3mとは3つ離れている
    assert!(!is_tile_strictly_isolated(&tt, Tile(TZ, WE)));
}

#[test]
fn test_meld_from_string() {
    let mut alloc = TileAllocator::new(true);
    let m = meld_from_string("m3+45", &mut alloc).unwrap();
    assert_eq!(m.meld_type, MeldType::Chi);
    assert_eq!(m.called.unwrap().class(), Tile(TM, 3));
    let m = meld_from_string("z555+", &mut alloc).unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);
    let m = meld_from_string("p1111", &mut alloc).unwrap();
    assert_eq!(m.meld_type, MeldType::Ankan);
    assert!(!m.is_open());
    assert!(meld_from_string("m124+", &mut alloc).is_err());
    assert!(meld_from_string("s777", &mut alloc).is_err());
    assert!(meld_from_string("z5+55", &mut alloc).is_err()); // 5枚目
}

#[test]
fn test_tiles_to_string() {
    let mut alloc = TileAllocator::new(true);
    let tiles = tiles_from_string("m405", &mut alloc).unwrap();
    assert_eq!(tiles_to_string(&tiles, true), "[m4, m0, m5]");
    assert_eq!(tiles_to_string(&tiles, false), "[m4, m5, m5]");
}

#[test]
fn test_tile_allocator() {
    let mut alloc = TileAllocator::new(true);
    assert!(tiles_from_string("m5555", &mut alloc).is_err()); // 赤5を除くと3枚
    let mut alloc = TileAllocator::new(false);
    assert!(tiles_from_string("m5555", &mut alloc).is_ok());
    assert!(tiles_from_string("z8", &mut alloc).is_err());
    assert!(tiles_from_string("5m", &mut alloc).is_err());
}
