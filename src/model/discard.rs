use std::collections::BTreeMap;

use super::*;
use crate::util::misc::vec_to_string;

// 打牌候補. 評価後は must_discard, must_keep 以外変更しない.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardCandidate {
    pub tile: Tile,                          // 打牌の種類
    pub tile136: Option<Tile136>,            // 門前から実際に切る物理牌
    pub shanten: Shanten,                    // 打牌後の向聴数
    pub waiting: Vec<Tile>,                  // 打牌後に向聴数を進める牌
    pub ukeire: usize,                       // 受け入れ枚数
    pub ukeire_second: usize,                // 2段目の受け入れ枚数 (1向聴のみ)
    pub wait_to_ukeire: BTreeMap<Tile, usize>, // 待ち牌ごとの受け入れ枚数
    pub valuation: i32,                      // 牌の価値 (低いほど切りやすい)
    pub count_of_dora: usize,                // この牌のドラの数 (赤ドラを含む)
    pub danger: i32,                         // 放銃危険度 (外部で算出)
    pub must_discard: bool,                  // 手に残す意味がない
    pub must_keep: bool,                     // 評価値に関わらず残す
}

impl fmt::Display for DiscardCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tile={}, shanten={}, ukeire={}, ukeire2={}, valuation={}, waiting={}",
            self.tile,
            self.shanten,
            self.ukeire,
            self.ukeire_second,
            self.valuation,
            vec_to_string(&self.waiting),
        )?;
        if self.must_discard {
            write!(f, " [must_discard]")?;
        }
        if self.must_keep {
            write!(f, " [must_keep]")?;
        }
        Ok(())
    }
}

// 鳴きの判断結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeldCall {
    pub meld_type: MeldType,
    pub tiles: Vec<Tile136>, // 鳴いた牌を含む副露の構成牌
    pub called: Tile136,     // 鳴いた牌
    pub shanten: Shanten,    // 鳴いて1枚切った後の向聴数
}

impl fmt::Display for MeldCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}{} shanten={}",
            self.meld_type,
            vec_to_string(&self.tiles),
            self.shanten
        )
    }
}
