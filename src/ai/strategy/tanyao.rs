use super::*;
use crate::ai::meld::evaluate_meld_call;
use crate::{debug, warn};

pub struct TanyaoBuilder;

impl StrategyBuilder for TanyaoBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Tanyao".to_string(),
            args: vec![
                Arg::int("min_shanten", 3),
                Arg::int("max_remaining_tiles", 10),
            ],
        }
    }

    fn create(&self, config: Config) -> Res<Strategy> {
        Ok(Strategy::Tanyao(TanyaoStrategy::from_config(config)?))
    }
}

// 断么九 (喰いタン)
#[derive(Debug, Clone)]
pub struct TanyaoStrategy {
    pub config: Config,
    pub base: StrategyBase,
    max_remaining_tiles: usize, // 牌山の残りがこれ以下になったら鳴かない
}

impl TanyaoStrategy {
    pub fn from_config(config: Config) -> Res<Self> {
        let min_shanten = config.get("min_shanten")?.as_int()?;
        let max_remaining_tiles = config.get("max_remaining_tiles")?.as_int()?;
        if min_shanten < 0 || max_remaining_tiles < 0 {
            return Err(format!("negative argument: {}", config).into());
        }

        Ok(Self {
            base: StrategyBase::new(min_shanten),
            max_remaining_tiles: max_remaining_tiles as usize,
            config,
        })
    }

    pub fn should_activate(&mut self, ctx: &HandContext, candidate_hand: &[Tile136]) -> bool {
        if !self.base.should_activate(ctx, candidate_hand) {
            return false;
        }

        let hand = ctx.hand_table();
        let closed = ctx.closed_table();

        // 孤立牌 (字牌は常に孤立扱い)
        let mut isolated = TileTable::default();
        for t in &ctx.tiles {
            let t = t.class();
            if t.is_hornor() || is_tile_strictly_isolated(&closed, t) {
                isolated[t.0][t.1] = 1;
            }
        }

        let mut n_pon = 0;
        let mut n_pair = 0;
        let mut n_valued_pair = 0;
        let mut n_not_suitable = 0;
        let mut n_not_suitable_not_isolated = 0;
        for t in Tile::all() {
            let n = count_tile(&hand, t);
            if n == 0 || self.is_tile_suitable(t) {
                continue;
            }

            if n >= 3 {
                n_pon += 1;
            }
            if n == 2 {
                n_pair += 1;
                if ctx.is_valued(t) {
                    n_valued_pair += 1;
                }
            }
            n_not_suitable += n;
            if count_tile(&isolated, t) == 0 {
                n_not_suitable_not_isolated += n;
            }
        }

        // 么九牌が多すぎる
        if n_not_suitable >= 5 {
            return false;
        }
        // 么九牌の刻子や役牌の対子があるなら断么九を狙わない
        if n_pon > 0 || n_valued_pair > 0 {
            return false;
        }
        // 対子1つは雀頭にできる
        if n_pair > 1 {
            return false;
        }
        if n_not_suitable_not_isolated >= 3 {
            return false;
        }
        if n_not_suitable_not_isolated >= 2 && ctx.shanten == 1 {
            return false;
        }

        // 123, 789の並び
        for ti in 0..TZ {
            for ni in [1, 7] {
                if (ni..ni + 3).all(|n| hand[ti][n] > 0) {
                    return false;
                }
            }
        }

        if self.base.dora_count_not_central >= 2 {
            return false;
        }
        if self.base.dora_count_central < 2 {
            return false;
        }
        // ドラ2枚の場合は5巡目までは門前で進める
        if self.base.dora_count_central == 2 && ctx.round_step < 5 {
            return false;
        }

        debug!("tanyao activated: dora_central={}", self.base.dora_count_central);
        true
    }

    pub fn rank_and_filter_discards(
        &self,
        mut candidates: Vec<DiscardCandidate>,
        ctx: &HandContext,
    ) -> Vec<DiscardCandidate> {
        // 門前なら么九牌を急いで切る必要はない
        if !ctx.is_open_hand() {
            return candidates;
        }

        let best = candidates.iter().map(|c| c.shanten).min().unwrap_or(0);
        if best > 1 {
            return generic_filter(candidates, ctx, |t| self.is_tile_suitable(t));
        }

        let mut forced = vec![];
        let mut preferred = vec![];
        for c in &mut candidates {
            if !self.is_tile_suitable(c.tile) {
                c.must_discard = true;
                forced.push(c.clone());
                continue;
            }

            // 聴牌時は么九牌待ち(役なし)を避ける. 残り0枚の待ちは問題ない
            if c.shanten == 0
                && c.waiting.iter().all(|w| {
                    self.is_tile_suitable(*w) || c.wait_to_ukeire.get(w).copied().unwrap_or(0) == 0
                })
            {
                preferred.push(c.clone());
            }
        }

        if !forced.is_empty() {
            return forced;
        }

        // 選択肢がない場合は全て返却
        if preferred.is_empty() {
            warn!("tanyao: no preferred discard, fall back to all candidates");
            return candidates;
        }
        preferred
    }

    #[inline]
    pub fn is_tile_suitable(&self, t: Tile) -> bool {
        t.is_simple()
    }

    // 牌山の残りが多い間だけ鳴く
    pub fn decide_meld_call(
        &self,
        ctx: &HandContext,
        called: Tile136,
        from_left: bool,
    ) -> Option<MeldCall> {
        if ctx.remaining_tiles <= self.max_remaining_tiles {
            return None;
        }
        evaluate_meld_call(ctx, called, from_left, |t| self.is_tile_suitable(t), false)
    }
}

#[cfg(test)]
fn tanyao() -> TanyaoStrategy {
    let b = TanyaoBuilder {};
    TanyaoStrategy::from_config(b.get_default_config()).unwrap()
}

#[cfg(test)]
fn activate(exp: &str) -> bool {
    let ctx = HandContext::from_expression(exp).unwrap();
    tanyao().should_activate(&ctx, &ctx.tiles)
}

#[test]
fn test_tanyao_activate() {
    // 中張牌のドラ3枚 (表示牌3m,1p,7s)
    assert!(activate("m2345p2367s23488/EE,m3p1s7/1"));
    // ドラ2枚は5巡目から
    assert!(!activate("m2345p2367s23488/EE,m3p1/4"));
    assert!(activate("m2345p2367s23488/EE,m3p1/5"));
    // ドラ1枚
    assert!(!activate("m2345p2367s23488/EE,m3/10"));
    // 向聴数が大きい
    assert!(!activate("m2468p2468s2468z1/EE,m1m3p1/10"));
}

#[test]
fn test_tanyao_terminal_pon() {
    // 999の刻子があれば他の条件に関わらず発動しない
    assert!(!activate("m999p234s234567m44/EE,m3p3s3/10"));
    assert!(!activate("m2345p234s2348,s9+99/EE,m3p3s3/10"));
}

#[test]
fn test_tanyao_rejects() {
    let doras = "/EE,m3p3s3/10";
    // 役牌の対子
    assert!(!activate(&format!("m2345p2367s234z55{}", doras)));
    // 么九牌の対子が2つ
    assert!(!activate(&format!("m2345p2367s2s1199{}", doras)));
    // 么九牌が5枚以上
    assert!(!activate(&format!("m234567p234z12m9p9s9{}", doras)));
    // 123の並び
    assert!(!activate(&format!("m1234p2367s23488{}", doras)));
    // 789の並び
    assert!(!activate(&format!("m2345p2367s24789{}", doras)));
    // 么九牌のドラが2枚
    assert!(!activate("m2345p2367s23459/EE,m3p3s8s8/10"));
    // 孤立していない么九牌が3枚 (1m, 9p, 9s)
    assert!(!activate(&format!("m12456p2389s4579{}", doras)));
    // 条件を満たす
    assert!(activate(&format!("m2345p2367s23488{}", doras)));
}

#[test]
fn test_tanyao_one_shanten_terminals() {
    let doras = "/EE,m3p1s1/10";
    // 1向聴で孤立していない么九牌が2枚 (1m, 9p)
    let ctx = HandContext::from_expression(&format!("m13p234456s234p79s6{}", doras)).unwrap();
    assert_eq!(ctx.shanten, 1);
    assert!(!tanyao().should_activate(&ctx, &ctx.tiles));

    // 2向聴なら2枚は許容
    let ctx = HandContext::from_expression(&format!("m1357p234s2345p79{}", doras)).unwrap();
    assert_eq!(ctx.shanten, 2);
    assert!(tanyao().should_activate(&ctx, &ctx.tiles));
}

#[test]
fn test_tanyao_filter_closed() {
    let ctx = HandContext::from_expression("m2345p2367s234z155").unwrap();
    let cands = candidates(&ctx);
    assert_eq!(tanyao().rank_and_filter_discards(cands.clone(), &ctx), cands);
}

#[test]
fn test_tanyao_filter_open() {
    // 1向聴で么九牌を持っている => 么九牌のみ
    let ctx = HandContext::from_expression("m23456p23678s9,s2+34").unwrap();
    let res = tanyao().rank_and_filter_discards(candidates(&ctx), &ctx);
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].tile, Tile(TS, 9));
    assert!(res[0].must_discard);

    // 聴牌: 么九牌待ちの打牌を避ける
    let ctx = HandContext::from_expression("m234567p234s88,s2+34").unwrap();
    let res = tanyao().rank_and_filter_discards(candidates(&ctx), &ctx);
    assert!(!res.is_empty());
    for c in &res {
        assert_eq!(c.shanten, 0);
        assert!(c.waiting.iter().all(|w| w.is_simple()));
    }
    // 4p切りは1-4p待ち
    assert!(res.iter().all(|c| c.tile != Tile(TP, 4)));
    assert!(res.iter().any(|c| c.tile == Tile(TP, 2)));

    // 2向聴以上は不向きな牌に印を付けて全て返却
    let ctx = HandContext::from_expression("m2468p2468s9z12,s2+34").unwrap();
    let cands = candidates(&ctx);
    let res = tanyao().rank_and_filter_discards(cands.clone(), &ctx);
    assert_eq!(res.len(), cands.len());
    assert!(res.iter().filter(|c| c.must_discard).all(|c| !c.tile.is_simple()));
}

#[test]
fn test_tanyao_filter_no_choice() {
    // 聴牌になる打牌が1-4p待ちしかない場合は全候補を返却
    let ctx = HandContext::from_expression("m234567p23s688,s2+34").unwrap();
    let cands = candidates(&ctx);
    let res = tanyao().rank_and_filter_discards(cands.clone(), &ctx);
    assert_eq!(res, cands);
}

#[test]
fn test_tanyao_meld() {
    let s = tanyao();
    let ctx = HandContext::from_expression("m2356p22s3489z115/EE/5,,40").unwrap();
    let p2 = Tile136::from_copy(Tile(TP, 2), 2).unwrap();
    let m = s.decide_meld_call(&ctx, p2, false).unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);

    // 残り枚数が少ない
    let ctx = HandContext::from_expression("m2356p22s3489z115/EE/5,,10").unwrap();
    assert_eq!(s.decide_meld_call(&ctx, p2, false), None);

    // 么九牌は鳴かない
    let ctx = HandContext::from_expression("m2356p22s3489z115/EE/5,,40").unwrap();
    let z1 = Tile136::from_copy(Tile(TZ, WE), 2).unwrap();
    assert_eq!(s.decide_meld_call(&ctx, z1, false), None);
    assert!(!Strategy::Tanyao(s).must_call_meld(&ctx, Tile(TZ, WE)));
}
