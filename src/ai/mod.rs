// 打牌評価と戦略選択による打牌・鳴きの判断

pub mod meld;
pub mod strategy;
pub mod valuation;

use std::cmp::Reverse;
use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Serialize};

use crate::hand::calc_discard_options;
use crate::model::*;
use crate::util::misc::Res;
use strategy::{Strategy, StrategyCoordinator, StrategyType};
use valuation::{evaluate_option, ValuationParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub valuation: ValuationParams,
    pub strategies: Vec<String>, // 優先順
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            valuation: ValuationParams::default(),
            strategies: vec!["Yakuhai".to_string(), "Tanyao".to_string()],
        }
    }
}

impl AiConfig {
    pub fn from_file(path: &str) -> Res<Self> {
        let f = File::open(path).map_err(|e| format!("{}: {}", path, e))?;
        Ok(serde_json::from_reader(BufReader::new(f))?)
    }

    pub fn from_json(s: &str) -> Res<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone)]
pub struct Ai {
    config: AiConfig,
    coordinator: StrategyCoordinator,
}

impl Ai {
    pub fn new(config: AiConfig) -> Res<Self> {
        let coordinator = StrategyCoordinator::from_expressions(&config.strategies)?;
        Ok(Self {
            config,
            coordinator,
        })
    }

    pub fn current_strategy(&self) -> Option<&Strategy> {
        self.coordinator.current()
    }

    pub fn strategies(&self) -> &[Strategy] {
        self.coordinator.strategies()
    }

    // 戦略を決定し,評価と絞り込みを行った打牌候補を返却
    pub fn discard_candidates(&mut self, ctx: &HandContext) -> Res<Vec<DiscardCandidate>> {
        ctx.validate()?;
        self.coordinator.determine_strategy(ctx, &ctx.tiles);
        let is_all_simples = self.coordinator.current_type() == Some(StrategyType::Tanyao);

        let mut cands = vec![];
        for opt in calc_discard_options(ctx) {
            cands.push(evaluate_option(
                &opt,
                ctx,
                &self.config.valuation,
                is_all_simples,
            )?);
        }
        if cands.is_empty() {
            return Err("no discard candidate".into());
        }

        Ok(self.coordinator.filter_discards(cands, ctx))
    }

    pub fn choose_discard(&mut self, ctx: &HandContext) -> Res<DiscardCandidate> {
        let cands = self.discard_candidates(ctx)?;
        select_discard(&cands)
            .cloned()
            .ok_or_else(|| "no discard candidate".into())
    }

    // 他家の打牌を鳴くかどうか. 鳴く牌を加えた手牌で戦略を決め直す
    pub fn decide_meld(
        &mut self,
        ctx: &HandContext,
        called: Tile136,
        from_left: bool,
    ) -> Res<Option<MeldCall>> {
        ctx.validate()?;
        if ctx.tiles.contains(&called) || ctx.dora_indicators.contains(&called) {
            return Err(format!("called tile is already used: {}", called).into());
        }

        let mut candidate_hand = ctx.tiles.clone();
        candidate_hand.push(called);
        Ok(match self.coordinator.determine_strategy(ctx, &candidate_hand) {
            Some(s) => s.decide_meld_call(ctx, called, from_left),
            None => None,
        })
    }

    // 現在の戦略で必ず鳴く牌か
    pub fn must_call(&self, ctx: &HandContext, t: Tile) -> bool {
        self.current_strategy()
            .map_or(false, |s| s.must_call_meld(ctx, t))
    }
}

// must_discardの候補があれば向聴数,受け入れ,評価値の順で選択
// それ以外は(must_keepを除いて)向聴数,受け入れ,2段目の受け入れ,評価値,牌の順
pub fn select_discard(cands: &[DiscardCandidate]) -> Option<&DiscardCandidate> {
    let forced = cands
        .iter()
        .filter(|c| c.must_discard)
        .min_by_key(|c| (c.shanten, Reverse(c.ukeire), c.valuation, c.tile));
    if forced.is_some() {
        return forced;
    }

    let mut pool: Vec<&DiscardCandidate> = cands.iter().filter(|c| !c.must_keep).collect();
    if pool.is_empty() {
        pool = cands.iter().collect();
    }
    pool.into_iter().min_by_key(|c| {
        (
            c.shanten,
            Reverse(c.ukeire),
            Reverse(c.ukeire_second),
            c.valuation,
            c.tile,
        )
    })
}

#[cfg(test)]
fn offered(ctx: &HandContext, t: Tile) -> Tile136 {
    (0..TILE)
        .map(|c| Tile136::from_copy(t, c).unwrap())
        .find(|x| !ctx.tiles.contains(x) && !ctx.dora_indicators.contains(x))
        .unwrap()
}

#[test]
fn test_ai_config() {
    let conf = AiConfig::default();
    assert_eq!(conf.strategies, vec!["Yakuhai", "Tanyao"]);
    assert_eq!(conf.valuation.base_value, 100);

    let conf = AiConfig::from_json(r#"{"valuation": {"base_value": 50}}"#).unwrap();
    assert_eq!(conf.valuation.base_value, 50);
    assert_eq!(conf.valuation.dora_value, 10000);
    assert_eq!(conf.strategies.len(), 2);

    let conf = AiConfig::from_json(r#"{"strategies": ["Tanyao(2,20)"]}"#).unwrap();
    let ai = Ai::new(conf).unwrap();
    assert_eq!(ai.strategies().len(), 1);
    assert_eq!(ai.strategies()[0].base().min_shanten, 2);

    assert!(AiConfig::from_json(r#"{"valuation": {"suit_value_table": [1, 2]}}"#).is_err());
    let conf = AiConfig::from_json(r#"{"strategies": ["Chanta"]}"#).unwrap();
    assert!(Ai::new(conf).is_err());
    assert!(AiConfig::from_file("no/such/file.json").is_err());
}

#[test]
fn test_choose_discard() {
    let mut ai = Ai::new(AiConfig::default()).unwrap();

    // 単騎待ちの比較: 1p(110) < 東(ダブ東,140)
    let ctx = HandContext::from_expression("m123456789p1s567z1/EE").unwrap();
    let c = ai.choose_discard(&ctx).unwrap();
    assert_eq!(c.tile, Tile(TP, 1));
    assert_eq!(c.shanten, 0);
    assert!(ai.current_strategy().is_none());

    // 3枚見えている字牌は必ず切る
    let ctx = HandContext::from_expression("m123456789p12s55z7/EE/3,z777").unwrap();
    let c = ai.choose_discard(&ctx).unwrap();
    assert_eq!(c.tile, Tile(TZ, DR));
    assert!(c.must_discard);
    assert_eq!(c.valuation, 0);

    // 不正な手牌
    let mut ctx = HandContext::from_expression("m123456789p1s567z1").unwrap();
    ctx.closed_hand.pop();
    assert!(ai.choose_discard(&ctx).is_err());
}

#[test]
fn test_select_discard() {
    let ctx = HandContext::from_expression("m123456789p1s567z1/EE").unwrap();
    let params = ValuationParams::default();
    let mut cands: Vec<DiscardCandidate> = calc_discard_options(&ctx)
        .iter()
        .map(|o| evaluate_option(o, &ctx, &params, false).unwrap())
        .collect();
    assert_eq!(select_discard(&cands).map(|c| c.tile), Some(Tile(TP, 1)));

    // must_keepは最後の選択肢
    for c in &mut cands {
        c.must_keep = c.tile == Tile(TP, 1);
    }
    assert_eq!(select_discard(&cands).map(|c| c.tile), Some(Tile(TZ, WE)));
    for c in &mut cands {
        c.must_keep = true;
    }
    assert_eq!(select_discard(&cands).map(|c| c.tile), Some(Tile(TP, 1)));

    // must_discardが最優先
    for c in &mut cands {
        c.must_keep = false;
        c.must_discard = c.tile == Tile(TM, 5) || c.tile == Tile(TS, 6);
    }
    for c in &mut cands {
        if c.must_discard {
            c.shanten = 1;
            c.ukeire = 10;
        }
    }
    assert_eq!(select_discard(&cands).map(|c| c.tile), Some(Tile(TM, 5)));

    // must_discard同士でも受け入れが多い方を優先
    for c in &mut cands {
        if c.tile == Tile(TS, 6) {
            c.ukeire = 12;
        }
    }
    assert_eq!(select_discard(&cands).map(|c| c.tile), Some(Tile(TS, 6)));
    assert_eq!(select_discard(&[]), None);
}

#[test]
fn test_decide_meld() {
    let mut ai = Ai::new(AiConfig::default()).unwrap();

    // ダブ東の対子
    let ctx = HandContext::from_expression("m2356p22s3489z115/EE/1").unwrap();
    let m = ai.decide_meld(&ctx, offered(&ctx, Tile(TZ, WE)), false).unwrap().unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);
    assert_eq!(m.shanten, 2);
    assert_eq!(
        ai.current_strategy().map(|s| s.strategy_type()),
        Some(StrategyType::Yakuhai)
    );

    // 門前で役牌以外は鳴かない
    assert_eq!(ai.decide_meld(&ctx, offered(&ctx, Tile(TP, 2)), false).unwrap(), None);
    assert!(!ai.must_call(&ctx, Tile(TZ, WE)));

    // 有効な戦略がない
    let ctx = HandContext::from_expression("m1239p1239s1239z1/ES").unwrap();
    assert_eq!(ai.decide_meld(&ctx, offered(&ctx, Tile(TM, 9)), false).unwrap(), None);
    assert!(ai.current_strategy().is_none());

    // 手牌にある牌
    let t = ctx.closed_hand[0];
    assert!(ai.decide_meld(&ctx, t, false).is_err());
}
