use super::*;
use crate::control::common::*;
use crate::hand::calc_shanten;

// 打牌・鳴きの判断に必要な手牌と卓の情報
#[derive(Debug, Clone, Serialize)]
pub struct HandContext {
    pub tiles: Vec<Tile136>,           // 手牌全体 (副露牌を含む)
    pub closed_hand: Vec<Tile136>,     // 門前部分
    pub melds: Vec<Meld>,              // 副露
    pub revealed: TileTable,           // 場に見えている牌の枚数 (捨て牌,他家の副露,ドラ表示牌)
    pub dora_indicators: Vec<Tile136>, // ドラ表示牌
    pub valued_honors: Vec<Tile>,      // 役牌 (連風牌は2回含む)
    pub shanten: Shanten,              // 現在の向聴数
    pub round_step: usize,             // 巡目
    pub remaining_tiles: usize,        // 牌山の残り枚数
    pub has_aka_dora: bool,            // 赤ドラ有効
    pub in_riichi: bool,               // 立直中
}

// 三元牌, 自風, 場風
pub fn valued_honors(prevalent_wind: Tnum, seat_wind: Tnum) -> Vec<Tile> {
    vec![
        Tile(TZ, DW),
        Tile(TZ, DG),
        Tile(TZ, DR),
        Tile(TZ, seat_wind),
        Tile(TZ, prevalent_wind),
    ]
}

impl HandContext {
    pub fn new(
        closed_hand: Vec<Tile136>,
        melds: Vec<Meld>,
        prevalent_wind: Tnum,
        seat_wind: Tnum,
    ) -> Self {
        let mut tiles = closed_hand.clone();
        for m in &melds {
            tiles.extend(m.tiles.iter().copied());
        }
        let mut ctx = Self {
            tiles,
            closed_hand,
            melds,
            revealed: TileTable::default(),
            dora_indicators: vec![],
            valued_honors: valued_honors(prevalent_wind, seat_wind),
            shanten: 0,
            round_step: 0,
            remaining_tiles: 70,
            has_aka_dora: true,
            in_riichi: false,
        };
        ctx.update_shanten();
        ctx
    }

    // HAND[,MELD]*[/WINDS[,INDICATORS]][/STEP[,REVEALED[,REMAINING]]][/FLAG,...]
    // 例: "m123p406s789z1122,z555+/ES,m4/5,z11s9,40/riichi"
    pub fn from_expression(exp: &str) -> Result<Self, String> {
        let input = exp.replace(' ', "");
        let exps: Vec<&str> = input.split('/').collect();
        let len = exps.len();
        if len > 4 {
            return Err(format!("too many sections: {}", exp));
        }

        let mut has_aka_dora = true;
        let mut in_riichi = false;
        if len > 3 {
            for f in exps[3].split(',') {
                match f {
                    "riichi" => in_riichi = true,
                    "noaka" => has_aka_dora = false,
                    "" => {}
                    _ => return Err(format!("invalid flag: {}", f)),
                }
            }
        }

        let mut alloc = TileAllocator::new(has_aka_dora);
        let mut closed_hand = vec![];
        let mut melds = vec![];
        for (i, e) in exps[0].split(',').enumerate() {
            if i == 0 {
                closed_hand = tiles_from_string(e, &mut alloc)?;
            } else {
                melds.push(meld_from_string(e, &mut alloc)?);
            }
        }

        let (mut prevalent_wind, mut seat_wind) = (WE, WE);
        let mut dora_indicators = vec![];
        if len > 1 {
            let stage: Vec<&str> = exps[1].split(',').collect();
            let chars: Vec<char> = stage[0].chars().collect();
            if chars.len() != 2 {
                return Err(format!("stage info len is not 2: {}", stage[0]));
            }
            prevalent_wind = wind_from_char(chars[0])?;
            seat_wind = wind_from_char(chars[1])?;
            if stage.len() > 1 {
                dora_indicators = tiles_from_string(stage[1], &mut alloc)?;
            }
        }

        let mut ctx = Self::new(closed_hand, melds, prevalent_wind, seat_wind);
        ctx.dora_indicators = dora_indicators;
        ctx.has_aka_dora = has_aka_dora;
        ctx.in_riichi = in_riichi;

        if len > 2 {
            let table: Vec<&str> = exps[2].split(',').collect();
            if !table[0].is_empty() {
                ctx.round_step = table[0].parse::<usize>().map_err(|e| e.to_string())?;
            }
            if table.len() > 1 {
                ctx.revealed = classes_to_tile_table(&tile_classes_from_string(table[1])?);
            }
            if table.len() > 2 {
                ctx.remaining_tiles = table[2].parse::<usize>().map_err(|e| e.to_string())?;
            }
        }

        ctx.validate()?;
        Ok(ctx)
    }

    // 入力の整合性をチェック. 不正な状態で評価を続行しない.
    pub fn validate(&self) -> Result<(), String> {
        let mut used = [false; TILE136];
        for t in &self.tiles {
            if used[t.id()] {
                return Err(format!("duplicated tile: {:?}", t));
            }
            used[t.id()] = true;
        }

        let meld_len: usize = self.melds.iter().map(|m| m.tiles.len()).sum();
        if self.closed_hand.len() + meld_len != self.tiles.len() {
            return Err(format!(
                "hand size mismatch: closed={}, melds={}, total={}",
                self.closed_hand.len(),
                meld_len,
                self.tiles.len()
            ));
        }
        for t in self
            .closed_hand
            .iter()
            .chain(self.melds.iter().flat_map(|m| m.tiles.iter()))
        {
            if !self.tiles.contains(t) {
                return Err(format!("tile not in hand: {:?}", t));
            }
        }
        if self.closed_hand.len() % 3 == 0 {
            return Err(format!("invalid closed hand size: {}", self.closed_hand.len()));
        }

        let hand = self.hand_table();
        for ti in 0..TYPE {
            for ni in 0..TNUM {
                let valid = ni != 0 && (ti != TZ || ni <= DR);
                let n = self.revealed[ti][ni];
                if !valid && n != 0 {
                    return Err(format!("invalid revealed index: [{}][{}]", ti, ni));
                }
                if n + hand[ti][ni] > TILE {
                    return Err(format!("too many tiles: {}", Tile(ti, ni)));
                }
            }
        }

        for t in &self.valued_honors {
            if !t.is_hornor() || t.1 > DR {
                return Err(format!("valued honor is not an honor tile: {}", t));
            }
        }
        Ok(())
    }

    pub fn update_shanten(&mut self) {
        self.shanten = calc_shanten(&self.closed_table(), self.melds.len());
    }

    #[inline]
    pub fn is_open_hand(&self) -> bool {
        self.melds.iter().any(|m| m.is_open())
    }

    #[inline]
    pub fn hand_table(&self) -> TileTable {
        tiles_to_tile_table(&self.tiles)
    }

    #[inline]
    pub fn closed_table(&self) -> TileTable {
        tiles_to_tile_table(&self.closed_hand)
    }

    // 場に見えている枚数 + 門前の枚数
    pub fn total_tiles(&self, t: Tile) -> usize {
        count_tile(&self.revealed, t) + self.closed_hand.iter().filter(|x| x.class() == t).count()
    }

    // 役牌としての数 (連風牌は2)
    pub fn count_valued(&self, t: Tile) -> usize {
        self.valued_honors.iter().filter(|&&v| v == t).count()
    }

    #[inline]
    pub fn is_valued(&self, t: Tile) -> bool {
        self.valued_honors.contains(&t)
    }
}

#[test]
fn test_hand_context_expression() {
    let ctx = HandContext::from_expression("m123p406s789z11,z555+/ES,m4/5,z11s9,40/riichi").unwrap();
    assert_eq!(ctx.closed_hand.len(), 11);
    assert_eq!(ctx.tiles.len(), 14);
    assert!(ctx.is_open_hand());
    assert_eq!(ctx.valued_honors.len(), 5);
    assert_eq!(ctx.count_valued(Tile(TZ, WE)), 1);
    assert_eq!(ctx.count_valued(Tile(TZ, WS)), 1);
    assert_eq!(ctx.count_valued(Tile(TZ, DW)), 1);
    assert_eq!(ctx.dora_indicators[0].class(), Tile(TM, 4));
    assert_eq!(ctx.round_step, 5);
    assert_eq!(count_tile(&ctx.revealed, Tile(TZ, WE)), 2);
    assert_eq!(ctx.total_tiles(Tile(TZ, WE)), 4);
    assert_eq!(ctx.remaining_tiles, 40);
    assert!(ctx.in_riichi);
    assert!(ctx.has_aka_dora);
    assert!(ctx.closed_hand.iter().any(|t| t.is_red(true)));
}

#[test]
fn test_hand_context_double_wind() {
    let ctx = HandContext::from_expression("m123p456s789z11z22/EE").unwrap();
    assert_eq!(ctx.count_valued(Tile(TZ, WE)), 2);
    assert!(!ctx.is_valued(Tile(TZ, WS)));
    assert!(!ctx.is_open_hand());
}

#[test]
fn test_hand_context_invalid() {
    assert!(HandContext::from_expression("m123p456s789z11z22/EE/1,z111").is_err()); // z1が5枚
    assert!(HandContext::from_expression("m123p456s789z11z2/EE").is_err()); // 12枚
    assert!(HandContext::from_expression("m123p456s789z1122/XE").is_err());
    assert!(HandContext::from_expression("m123p456s789z1122/EE//hoge").is_err());

    let mut ctx = HandContext::from_expression("m123p456s789z1122").unwrap();
    ctx.valued_honors.push(Tile(TM, 1));
    assert!(ctx.validate().is_err());

    let mut ctx = HandContext::from_expression("m123p456s789z1122").unwrap();
    ctx.closed_hand.pop();
    assert!(ctx.validate().is_err());
}
