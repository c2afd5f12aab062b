use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Chi,
    Pon,
    Minkan,
    Ankan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<Tile136>,
    pub called: Option<Tile136>, // 他家から鳴いた牌 (暗槓の場合None)
}

impl Meld {
    // 暗槓以外は門前を崩す
    #[inline]
    pub fn is_open(&self) -> bool {
        self.meld_type != MeldType::Ankan
    }

    // 刻子または槓子
    #[inline]
    pub fn is_pon_or_kan(&self) -> bool {
        self.meld_type != MeldType::Chi
    }

    // 構成牌の種類 (順子の場合は最小の牌)
    pub fn class(&self) -> Option<Tile> {
        self.tiles.iter().map(|t| t.class()).min()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self
            .tiles
            .iter()
            .map(|&t| {
                if Some(t) == self.called {
                    format!("{}+", t)
                } else {
                    format!("{}", t)
                }
            })
            .collect();
        write!(f, "{:?}[{}]", self.meld_type, s.join("|"))
    }
}
