use super::*;
use crate::ai::meld::evaluate_meld_call;
use crate::debug;
use crate::util::misc::{vec_count, vec_unique};

pub struct YakuhaiBuilder;

impl StrategyBuilder for YakuhaiBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Yakuhai".to_string(),
            args: vec![Arg::int("min_shanten", 8)],
        }
    }

    fn create(&self, config: Config) -> Res<Strategy> {
        Ok(Strategy::Yakuhai(YakuhaiStrategy::from_config(config)?))
    }
}

// 役牌 (風牌,三元牌の刻子)
#[derive(Debug, Clone)]
pub struct YakuhaiStrategy {
    pub config: Config,
    pub base: StrategyBase,
    valued_pairs: Vec<Tile>,      // 手牌にある役牌の対子
    has_valued_pon: bool,         // 手牌に役牌の刻子(槓子)がある
    last_chance_calls: Vec<Tile>, // 出たら必ず鳴く役牌
}

impl YakuhaiStrategy {
    pub fn from_config(config: Config) -> Res<Self> {
        let min_shanten = config.get("min_shanten")?.as_int()?;
        if min_shanten < 0 {
            return Err(format!("negative argument: {}", config).into());
        }

        Ok(Self {
            base: StrategyBase::new(min_shanten),
            valued_pairs: vec![],
            has_valued_pon: false,
            last_chance_calls: vec![],
            config,
        })
    }

    pub fn valued_pairs(&self) -> &[Tile] {
        &self.valued_pairs
    }

    pub fn has_valued_pon(&self) -> bool {
        self.has_valued_pon
    }

    pub fn last_chance_calls(&self) -> &[Tile] {
        &self.last_chance_calls
    }

    pub fn should_activate(&mut self, ctx: &HandContext, candidate_hand: &[Tile136]) -> bool {
        let hand = ctx.hand_table();

        // 鳴けた,または対子が崩れた牌は対象外
        self.last_chance_calls.retain(|&t| count_tile(&hand, t) == 2);
        self.valued_pairs.clear();
        self.has_valued_pon = false;

        if !self.base.should_activate(ctx, candidate_hand) {
            return false;
        }

        let candidate = tiles_to_tile_table(candidate_hand);

        // 連風牌は2回現れる
        let pairs: Vec<Tile> = ctx
            .valued_honors
            .iter()
            .copied()
            .filter(|&t| count_tile(&hand, t) == 2)
            .collect();
        let double_east = vec_count(&pairs, &Tile(TZ, WE)) == 2;
        let double_other = pairs
            .iter()
            .any(|&t| t != Tile(TZ, WE) && vec_count(&pairs, &t) == 2);

        self.valued_pairs = vec_unique(&pairs);
        self.has_valued_pon = ctx
            .valued_honors
            .iter()
            .any(|&t| count_tile(&hand, t) >= 3);

        // 他家の打牌で刻子にできる
        let opportunity = self
            .valued_pairs
            .iter()
            .any(|&t| count_tile(&candidate, t) == count_tile(&hand, t) + 1);

        // 残りの牌がある対子
        let has_valued_pair = self
            .valued_pairs
            .iter()
            .any(|&t| opportunity || ctx.total_tiles(t) < TILE);

        if !has_valued_pair && !self.has_valued_pon {
            return false;
        }

        let n_pairs = self.valued_pairs.len();
        let dora = self.base.dora_count_total;

        // ダブ東は常に鳴く
        if double_east {
            debug!("yakuhai activated: double east");
            return true;
        }
        // 他の連風牌はドラか他の役牌の対子がある場合
        if double_other && (dora >= 1 || n_pairs >= 2) {
            debug!("yakuhai activated: double wind");
            return true;
        }
        if n_pairs >= 2 && dora >= 1 {
            debug!("yakuhai activated: {} pairs", n_pairs);
            return true;
        }
        if dora >= 2 {
            // 役牌以外の対子があれば後付けも狙う
            self.base.go_for_atodzuke = Tile::all()
                .any(|t| count_tile(&hand, t) >= 2 && !self.valued_pairs.contains(&t));
            debug!("yakuhai activated: dora={}", dora);
            return true;
        }
        if dora >= 1 && ctx.round_step > 5 {
            debug!("yakuhai activated: step={}", ctx.round_step);
            return true;
        }

        // 最後の1枚
        for &t in &self.valued_pairs {
            if opportunity && ctx.total_tiles(t) == TILE - 1 && ctx.shanten >= 1 {
                if !self.last_chance_calls.contains(&t) {
                    self.last_chance_calls.push(t);
                }
                debug!("yakuhai activated: last chance {}", t);
                return true;
            }
        }

        false
    }

    // 副露している場合のみ絞り込み
    pub fn rank_and_filter_discards(
        &self,
        mut candidates: Vec<DiscardCandidate>,
        ctx: &HandContext,
    ) -> Vec<DiscardCandidate> {
        if !ctx.is_open_hand() {
            return candidates;
        }

        let hand = ctx.hand_table();
        let pairs = vec_unique(
            &ctx.valued_honors
                .iter()
                .copied()
                .filter(|&t| count_tile(&hand, t) == 2)
                .collect::<Vec<Tile>>(),
        );
        let mut pons: Vec<Tile> = ctx
            .valued_honors
            .iter()
            .copied()
            .filter(|&t| count_tile(&hand, t) >= 3)
            .collect();
        for m in &ctx.melds {
            if let Some(t) = m.class() {
                if m.is_open() && m.is_pon_or_kan() && ctx.is_valued(t) {
                    pons.push(t);
                }
            }
        }
        let pons = vec_unique(&pons);

        // 唯一の役牌の対子,刻子は崩さない
        let mut acceptable = vec![];
        for c in &mut candidates {
            let is_sole = match pons.len() {
                0 => pairs.len() == 1 && pairs.contains(&c.tile),
                1 => pons.contains(&c.tile),
                _ => false,
            };
            if is_sole {
                c.must_keep = true;
            } else {
                acceptable.push(c.clone());
            }
        }

        if acceptable.is_empty() {
            return candidates;
        }

        // 役牌の対子が1つだけなら,その牌を待たない聴牌は避ける
        if pons.is_empty() && pairs.len() == 1 {
            let preferred: Vec<DiscardCandidate> = acceptable
                .iter()
                .filter(|c| c.shanten != 0 || c.waiting.contains(&pairs[0]))
                .cloned()
                .collect();
            if !preferred.is_empty() {
                return preferred;
            }
        }

        acceptable
    }

    #[inline]
    pub fn is_tile_suitable(&self, _t: Tile) -> bool {
        true
    }

    pub fn must_call_meld(&self, ctx: &HandContext, t: Tile) -> bool {
        // 役牌を鳴いている場合は向聴数が進む鳴きのみ
        if ctx.shanten < 2 {
            let has_open_pon = ctx.melds.iter().any(|m| {
                m.is_open() && m.is_pon_or_kan() && m.class().map_or(false, |c| ctx.is_valued(c))
            });
            if has_open_pon {
                return false;
            }
        }

        if self.last_chance_calls.contains(&t) {
            return true;
        }

        if !ctx.is_open_hand() {
            return false;
        }

        // 副露済みで役牌の刻子がないので対子の役牌は鳴く
        let hand = ctx.hand_table();
        ctx.is_valued(t) && count_tile(&hand, t) == 2
    }

    pub fn decide_meld_call(
        &self,
        ctx: &HandContext,
        called: Tile136,
        from_left: bool,
    ) -> Option<MeldCall> {
        let t = called.class();
        let must_call = self.must_call_meld(ctx, t);
        let call = || {
            evaluate_meld_call(ctx, called, from_left, |t| self.is_tile_suitable(t), must_call)
        };

        if self.has_valued_pon {
            return call();
        }

        // 門前で役牌以外を鳴くのは後付けの場合のみ
        if !ctx.is_open_hand() && !self.valued_pairs.contains(&t) {
            if self.base.go_for_atodzuke {
                return call();
            }
            return None;
        }

        call()
    }
}

#[cfg(test)]
fn yakuhai() -> YakuhaiStrategy {
    let b = YakuhaiBuilder {};
    YakuhaiStrategy::from_config(b.get_default_config()).unwrap()
}

#[cfg(test)]
fn with_tile(ctx: &HandContext, t: Tile) -> (Vec<Tile136>, Tile136) {
    let t136 = (0..TILE)
        .map(|c| Tile136::from_copy(t, c).unwrap())
        .find(|x| !ctx.tiles.contains(x) && !ctx.dora_indicators.contains(x))
        .unwrap();
    let mut tiles = ctx.tiles.clone();
    tiles.push(t136);
    (tiles, t136)
}

#[cfg(test)]
fn activate(exp: &str) -> bool {
    let ctx = HandContext::from_expression(exp).unwrap();
    yakuhai().should_activate(&ctx, &ctx.tiles)
}

#[test]
fn test_yakuhai_double_east() {
    // ダブ東の対子のみ,ドラなし,1巡目
    let ctx = HandContext::from_expression("m2345p2367s234z11/EE/1").unwrap();
    let mut s = yakuhai();
    assert!(s.should_activate(&ctx, &ctx.tiles));
    assert_eq!(s.base.dora_count_total, 0);
    assert_eq!(s.valued_pairs(), &[Tile(TZ, WE)]);

    // 東が場風のみ
    assert!(!activate("m2345p2367s234z11/ES/1"));
}

#[test]
fn test_yakuhai_double_wind() {
    // ダブ南はドラか他の役牌の対子が必要
    assert!(!activate("m2345p2367s234z22/SS/1"));
    assert!(activate("m2345p2367s234z22/SS,m3/1"));
    assert!(activate("m2345p2367s2z2255/SS/1"));
}

#[test]
fn test_yakuhai_dora() {
    // 役牌の対子1つ
    assert!(!activate("m2345p2367s234z55/EE/1"));
    assert!(!activate("m2345p2367s234z55/EE,m3/5"));
    assert!(activate("m2345p2367s234z55/EE,m3/6"));
    // 役牌の対子2つ + ドラ
    assert!(activate("m2345p236s234z5566/EE,m3/1"));
    assert!(!activate("m2345p236s234z5566/EE/1"));
    // 役牌の対子がない
    assert!(!activate("m2345p2367s234z44/EE,m3m3/10"));
    // 役牌の刻子
    assert!(activate("m2345p236s234z555/EE,m3/6"));
}

#[test]
fn test_yakuhai_atodzuke() {
    // ドラ2枚 + 役牌以外の対子
    let ctx = HandContext::from_expression("m2345p2377s234z55/EE,m3m3/1").unwrap();
    let mut s = yakuhai();
    assert!(s.should_activate(&ctx, &ctx.tiles));
    assert!(s.base.go_for_atodzuke);

    let ctx = HandContext::from_expression("m2345p2378s234z55/EE,m3m3/1").unwrap();
    assert!(s.should_activate(&ctx, &ctx.tiles));
    assert!(!s.base.go_for_atodzuke);
}

#[test]
fn test_yakuhai_dead_pair() {
    // 2枚見えている役牌の対子は刻子にならない
    assert!(!activate("m2345p2367s234z55/EE,m3/6,z55"));
    assert!(activate("m2345p2367s234z55/EE,m3/6,z5"));
}

#[test]
fn test_yakuhai_last_chance() {
    let ctx = HandContext::from_expression("m2345p2367s234z55/EE/1,z5").unwrap();
    assert!(ctx.shanten >= 1);
    let mut s = yakuhai();
    assert!(!s.should_activate(&ctx, &ctx.tiles));

    // 最後の白が出た
    let (hand, _) = with_tile(&ctx, Tile(TZ, DW));
    assert!(s.should_activate(&ctx, &hand));
    assert_eq!(s.last_chance_calls(), &[Tile(TZ, DW)]);
    assert!(s.must_call_meld(&ctx, Tile(TZ, DW)));
    assert!(!s.must_call_meld(&ctx, Tile(TZ, DG)));

    // 発動しない巡目でも記録は残る
    assert!(!s.should_activate(&ctx, &ctx.tiles));
    assert_eq!(s.last_chance_calls(), &[Tile(TZ, DW)]);

    // 対子が崩れたら破棄
    let ctx = HandContext::from_expression("m23456p2367s234z5/EE/1,z5").unwrap();
    assert!(!s.should_activate(&ctx, &ctx.tiles));
    assert!(s.last_chance_calls().is_empty());
}

#[test]
fn test_yakuhai_must_call() {
    let s = yakuhai();
    // 副露済みで役牌の対子
    let ctx = HandContext::from_expression("m234p23s358z55,m6+78").unwrap();
    assert!(s.must_call_meld(&ctx, Tile(TZ, DW)));
    assert!(!s.must_call_meld(&ctx, Tile(TZ, DG)));

    // 門前
    let ctx = HandContext::from_expression("m2345p2367s234z55").unwrap();
    assert!(!s.must_call_meld(&ctx, Tile(TZ, DW)));

    // 役牌を鳴いていて1向聴以下
    let ctx = HandContext::from_expression("m234p234s35z66,z555+").unwrap();
    assert!(ctx.shanten < 2);
    assert!(!s.must_call_meld(&ctx, Tile(TZ, DG)));
}

#[test]
fn test_yakuhai_last_chance_after_valued_pon() {
    // 白の最後の1枚を記録
    let ctx = HandContext::from_expression("m2345p2367s234z55/EE/1,z5").unwrap();
    let mut s = yakuhai();
    let (hand, _) = with_tile(&ctx, Tile(TZ, DW));
    assert!(s.should_activate(&ctx, &hand));
    assert_eq!(s.last_chance_calls(), &[Tile(TZ, DW)]);

    // 發を鳴いて1向聴以下なら記録があっても必ず鳴くわけではない
    let ctx = HandContext::from_expression("m234p234s358z55,z666+").unwrap();
    assert!(ctx.shanten < 2);
    assert!(!s.must_call_meld(&ctx, Tile(TZ, DW)));

    // 2向聴以上なら記録に従う
    let ctx = HandContext::from_expression("m2468p2468s1z55,z666+").unwrap();
    assert_eq!(ctx.shanten, 2);
    assert!(s.must_call_meld(&ctx, Tile(TZ, DW)));
}

#[test]
fn test_yakuhai_filter_all_tenpai() {
    // 白以外のどれを切っても白を待たない聴牌 => 白を除いた候補をそのまま返却
    let ctx = HandContext::from_expression("m234z55,p1+23,s4+56,m7+89").unwrap();
    let cands = candidates(&ctx);
    assert_eq!(cands.len(), 4);
    let res = yakuhai().rank_and_filter_discards(cands, &ctx);
    let tiles: Vec<Tile> = res.iter().map(|c| c.tile).collect();
    assert_eq!(tiles, vec![Tile(TM, 2), Tile(TM, 3), Tile(TM, 4)]);
    assert!(res.iter().all(|c| c.shanten == 0 && !c.waiting.contains(&Tile(TZ, DW))));
}

#[test]
fn test_yakuhai_filter() {
    let s = yakuhai();

    // 門前は絞り込まない
    let ctx = HandContext::from_expression("m2345p2367s234z155").unwrap();
    let cands = candidates(&ctx);
    assert_eq!(s.rank_and_filter_discards(cands.clone(), &ctx), cands);

    // 唯一の役牌の対子は残し,役牌を待たない聴牌(4s待ち)を避ける
    let ctx = HandContext::from_expression("m234p234s358z55,m6+78").unwrap();
    let res = s.rank_and_filter_discards(candidates(&ctx), &ctx);
    assert!(res.iter().all(|c| c.tile != Tile(TZ, DW)));
    assert!(res.iter().all(|c| c.tile != Tile(TS, 8)));
    assert!(res.iter().any(|c| c.tile == Tile(TS, 3)));

    // 唯一の役牌の刻子
    let ctx = HandContext::from_expression("m234p23s358z555,m6+78").unwrap();
    let res = s.rank_and_filter_discards(candidates(&ctx), &ctx);
    assert!(!res.is_empty());
    assert!(res.iter().all(|c| c.tile != Tile(TZ, DW)));

    // 選択肢がない
    let ctx = HandContext::from_expression("z55,m1+23,p4+56,s7+89,m7+89").unwrap();
    let res = s.rank_and_filter_discards(candidates(&ctx), &ctx);
    assert_eq!(res.len(), 1);
    assert!(res[0].must_keep);
}

#[test]
fn test_yakuhai_meld() {
    // 門前で役牌の対子
    let ctx = HandContext::from_expression("m2356p22s3489z155/EE/1").unwrap();
    let mut s = yakuhai();
    let (hand, z5) = with_tile(&ctx, Tile(TZ, DW));
    assert!(!s.should_activate(&ctx, &hand));

    // ドラ1枚,6巡目
    let ctx = HandContext::from_expression("m2356p22s3489z155/EE,m2/6").unwrap();
    assert!(s.should_activate(&ctx, &hand));
    let m = s.decide_meld_call(&ctx, z5, false).unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);
    assert_eq!(m.called, z5);

    // 門前で役牌以外は鳴かない
    let (hand, p2) = with_tile(&ctx, Tile(TP, 2));
    assert!(s.should_activate(&ctx, &hand));
    assert!(!s.base.go_for_atodzuke);
    assert_eq!(s.decide_meld_call(&ctx, p2, false), None);

    // 後付け
    let ctx = HandContext::from_expression("m2356p22s3489z155/EE,m2m2/1").unwrap();
    assert!(s.should_activate(&ctx, &hand));
    assert!(s.base.go_for_atodzuke);
    assert!(s.decide_meld_call(&ctx, p2, false).is_some());

    // 役牌の刻子があれば通常の判断
    let ctx = HandContext::from_expression("m2356p22s3489z555/EE,m2/6").unwrap();
    let (hand, m4) = with_tile(&ctx, Tile(TM, 4));
    assert!(s.should_activate(&ctx, &hand));
    assert!(s.has_valued_pon());
    let m = s.decide_meld_call(&ctx, m4, true).unwrap();
    assert_eq!(m.meld_type, MeldType::Chi);
    assert_eq!(s.decide_meld_call(&ctx, m4, false), None);
}
