use serde::{de, ser};

use super::*;

// 牌の種類 (34種). 赤5の区別は物理牌(Tile136)が持つ.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

impl Tile {
    // 34種のindexから変換 (1m..9m, 1p..9p, 1s..9s, 東南西北白發中)
    pub fn from_34(i: usize) -> Result<Self, String> {
        if i >= TILE34 {
            return Err(format!("tile index out of range: {}", i));
        }
        Ok(Self(i / 9, i % 9 + 1))
    }

    #[inline]
    pub fn to_34(self) -> usize {
        self.0 * 9 + self.1 - 1
    }

    pub fn from_symbol(s: &str) -> Result<Self, String> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(format!("invalid tile symbol: {}", s));
        }
        let ti = match chars[0] {
            'm' => TM,
            'p' => TP,
            's' => TS,
            'z' => TZ,
            c => return Err(format!("invalid tile type: {}", c)),
        };
        let ni = match chars[1].to_digit(10) {
            Some(0) if ti != TZ => 5,
            Some(n) if n >= 1 && (n <= 7 || (ti != TZ && n <= 9)) => n as usize,
            _ => return Err(format!("invalid tile number: {}", s)),
        };
        Ok(Self(ti, ni))
    }

    // 全34種
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..TILE34).map(|i| Self(i / 9, i % 9 + 1))
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_hornor(&self) -> bool {
        self.0 == TZ
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 中張牌
    #[inline]
    pub fn is_simple(&self) -> bool {
        !self.is_end()
    }

    // 同じ種別でn離れた数牌 (範囲外や字牌の場合None)
    pub fn offset(&self, n: isize) -> Option<Tile> {
        if self.is_hornor() {
            return None;
        }
        let ni = self.1 as isize + n;
        if (1..=9).contains(&ni) {
            Some(Tile(self.0, ni as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ['m', 'p', 's', 'z'][self.0], self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_34().cmp(&other.to_34())
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Tile::from_symbol(v).map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [Tile136]
// 物理牌 (136枚). 種類は id / 4.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Tile136(usize);

impl Tile136 {
    pub fn new(id: usize) -> Result<Self, String> {
        if id >= TILE136 {
            return Err(format!("physical tile id out of range: {}", id));
        }
        Ok(Self(id))
    }

    // 種類とその中での番号(0~3)から生成
    pub fn from_copy(t: Tile, copy: usize) -> Result<Self, String> {
        if copy >= TILE {
            return Err(format!("invalid copy index: {}", copy));
        }
        Self::new(t.to_34() * TILE + copy)
    }

    #[inline]
    pub fn id(self) -> usize {
        self.0
    }

    #[inline]
    pub fn class(self) -> Tile {
        let i = self.0 / TILE;
        Tile(i / 9, i % 9 + 1)
    }

    // 赤5 (赤ドラ有効時のみ)
    #[inline]
    pub fn is_red(self, has_aka_dora: bool) -> bool {
        has_aka_dora && RED5_IDS.contains(&self.0)
    }

    // 赤5は"m0"のように表記. 赤ドラ無効時は通常の5
    pub fn to_symbol(self, has_aka_dora: bool) -> String {
        let t = self.class();
        if self.is_red(has_aka_dora) {
            format!("{}0", ['m', 'p', 's', 'z'][t.0])
        } else {
            t.to_string()
        }
    }
}

impl TryFrom<usize> for Tile136 {
    type Error = String;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<Tile136> for usize {
    fn from(t: Tile136) -> Self {
        t.0
    }
}

// 赤5の区別はセッションの設定によるため種類のみ表示 (to_symbolを参照)
impl fmt::Display for Tile136 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

impl fmt::Debug for Tile136 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self, self.0)
    }
}

// [TileTable]
// 種類ごとの枚数 table[type][number] (numberの0は未使用)
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

#[test]
fn test_tile_index() {
    for i in 0..TILE34 {
        assert_eq!(Tile::from_34(i).unwrap().to_34(), i);
    }
    assert!(Tile::from_34(TILE34).is_err());
    assert_eq!(Tile::from_34(27).unwrap(), Tile(TZ, WE));
    assert_eq!(Tile::from_34(33).unwrap(), Tile(TZ, DR));
    assert_eq!(Tile::from_symbol("m0").unwrap(), Tile(TM, 5));
    assert!(Tile::from_symbol("z8").is_err());
    assert!(Tile::from_symbol("z0").is_err());
}

#[test]
fn test_tile136() {
    let t = Tile136::new(16).unwrap();
    assert_eq!(t.class(), Tile(TM, 5));
    assert!(t.is_red(true));
    assert!(!t.is_red(false));
    assert!(!Tile136::new(17).unwrap().is_red(true));
    assert!(Tile136::new(TILE136).is_err());
    assert_eq!(Tile136::from_copy(Tile(TP, 5), 0).unwrap().id(), 52);
    assert_eq!(Tile136::new(135).unwrap().class(), Tile(TZ, DR));

    assert_eq!(t.to_string(), "m5");
    assert_eq!(t.to_symbol(true), "m0");
    assert_eq!(t.to_symbol(false), "m5");
    assert_eq!(Tile136::new(17).unwrap().to_symbol(true), "m5");

    let json = serde_json::to_string(&t).unwrap();
    assert_eq!(json, "16");
    assert!(serde_json::from_str::<Tile136>("200").is_err());
}
