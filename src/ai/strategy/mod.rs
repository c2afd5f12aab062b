mod tanyao;
mod yakuhai;

use std::fmt;

use crate::control::common::*;
use crate::model::*;
use crate::util::misc::Res;
use crate::util::variant::*;
use crate::{debug, warn};

pub use tanyao::TanyaoStrategy;
pub use yakuhai::YakuhaiStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrategyType {
    Tanyao,
    Yakuhai,
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// 全戦略共通の状態
#[derive(Debug, Clone)]
pub struct StrategyBase {
    pub min_shanten: Shanten, // これより向聴数が大きい場合は発動しない
    pub dora_count_total: usize,
    pub dora_count_central: usize,     // 2~8の数牌
    pub dora_count_not_central: usize, // 么九牌
    pub go_for_atodzuke: bool,         // 役牌以外の鳴きを許可 (後付け)
}

impl StrategyBase {
    pub fn new(min_shanten: Shanten) -> Self {
        Self {
            min_shanten,
            dora_count_total: 0,
            dora_count_central: 0,
            dora_count_not_central: 0,
            go_for_atodzuke: false,
        }
    }

    // candidate_hand: 手牌全体 (鳴きの判断時は鳴く牌を含む)
    pub fn should_activate(&mut self, ctx: &HandContext, candidate_hand: &[Tile136]) -> bool {
        self.go_for_atodzuke = false;
        self.dora_count_total = 0;
        self.dora_count_central = 0;
        self.dora_count_not_central = 0;
        for &t in candidate_hand {
            let n = count_dora_tile(t, &ctx.dora_indicators, ctx.has_aka_dora);
            self.dora_count_total += n;
            if t.class().is_simple() {
                self.dora_count_central += n;
            } else {
                self.dora_count_not_central += n;
            }
        }

        ctx.shanten <= self.min_shanten
    }
}

#[derive(Debug, Clone)]
pub enum Strategy {
    Tanyao(TanyaoStrategy),
    Yakuhai(YakuhaiStrategy),
}

impl Strategy {
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            Self::Tanyao(_) => StrategyType::Tanyao,
            Self::Yakuhai(_) => StrategyType::Yakuhai,
        }
    }

    pub fn base(&self) -> &StrategyBase {
        match self {
            Self::Tanyao(s) => &s.base,
            Self::Yakuhai(s) => &s.base,
        }
    }

    pub fn get_config(&self) -> &Config {
        match self {
            Self::Tanyao(s) => &s.config,
            Self::Yakuhai(s) => &s.config,
        }
    }

    pub fn should_activate(&mut self, ctx: &HandContext, candidate_hand: &[Tile136]) -> bool {
        match self {
            Self::Tanyao(s) => s.should_activate(ctx, candidate_hand),
            Self::Yakuhai(s) => s.should_activate(ctx, candidate_hand),
        }
    }

    // 空でない入力に対して空のリストを返却しない
    pub fn rank_and_filter_discards(
        &self,
        candidates: Vec<DiscardCandidate>,
        ctx: &HandContext,
    ) -> Vec<DiscardCandidate> {
        match self {
            Self::Tanyao(s) => s.rank_and_filter_discards(candidates, ctx),
            Self::Yakuhai(s) => s.rank_and_filter_discards(candidates, ctx),
        }
    }

    pub fn must_call_meld(&self, ctx: &HandContext, t: Tile) -> bool {
        match self {
            Self::Tanyao(_) => false,
            Self::Yakuhai(s) => s.must_call_meld(ctx, t),
        }
    }

    pub fn decide_meld_call(
        &self,
        ctx: &HandContext,
        called: Tile136,
        from_left: bool,
    ) -> Option<MeldCall> {
        match self {
            Self::Tanyao(s) => s.decide_meld_call(ctx, called, from_left),
            Self::Yakuhai(s) => s.decide_meld_call(ctx, called, from_left),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_config())
    }
}

// 向聴数が0で門前なら何もしない. それ以外は不向きな牌に must_discard を付けて全て返却
pub fn generic_filter<F>(
    mut candidates: Vec<DiscardCandidate>,
    ctx: &HandContext,
    is_suitable: F,
) -> Vec<DiscardCandidate>
where
    F: Fn(Tile) -> bool,
{
    let best = candidates.iter().map(|c| c.shanten).min();
    if best == Some(0) && !ctx.is_open_hand() {
        return candidates;
    }

    for c in &mut candidates {
        if !is_suitable(c.tile) {
            c.must_discard = true;
        }
    }
    candidates
}

trait StrategyBuilder {
    fn get_default_config(&self) -> Config;
    fn create(&self, config: Config) -> Res<Strategy>;
}

// "Tanyao(3,10)" のような式から戦略を生成
pub fn create_strategy(exp: &str) -> Res<Strategy> {
    let builders: Vec<Box<dyn StrategyBuilder>> = vec![
        Box::new(tanyao::TanyaoBuilder {}),
        Box::new(yakuhai::YakuhaiBuilder {}),
    ];

    let (name, args) = Config::split_expression(exp)?;
    for b in &builders {
        let mut conf = b.get_default_config();
        if name == conf.name {
            conf.apply_args(&args)?;
            return b.create(conf);
        }
    }

    Err(format!("unknown strategy name: {}", name).into())
}

// 優先順に戦略を保持し,毎巡どの戦略を使うか決定する
#[derive(Debug, Clone)]
pub struct StrategyCoordinator {
    strategies: Vec<Strategy>,
    current: Option<usize>,
}

impl StrategyCoordinator {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            current: None,
        }
    }

    pub fn from_expressions(exps: &[String]) -> Res<Self> {
        let mut strategies = vec![];
        for e in exps {
            strategies.push(create_strategy(e)?);
        }
        Ok(Self::new(strategies))
    }

    // 前の巡の戦略は引き継がず,優先順に発動条件を再確認
    pub fn determine_strategy(
        &mut self,
        ctx: &HandContext,
        candidate_hand: &[Tile136],
    ) -> Option<&Strategy> {
        let prev = self.current_type();
        self.current = None;
        for (i, s) in self.strategies.iter_mut().enumerate() {
            if s.should_activate(ctx, candidate_hand) {
                self.current = Some(i);
                break;
            }
        }

        let next = self.current_type();
        if prev != next {
            debug!(
                "strategy changed: {} => {}",
                prev.map_or("None".to_string(), |t| t.to_string()),
                next.map_or("None".to_string(), |t| t.to_string()),
            );
        }
        self.current()
    }

    pub fn current(&self) -> Option<&Strategy> {
        self.current.and_then(|i| self.strategies.get(i))
    }

    pub fn current_type(&self) -> Option<StrategyType> {
        self.current().map(|s| s.strategy_type())
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    // 有効な戦略がない場合はそのまま
    pub fn filter_discards(
        &self,
        candidates: Vec<DiscardCandidate>,
        ctx: &HandContext,
    ) -> Vec<DiscardCandidate> {
        match self.current() {
            Some(s) => {
                let backup = candidates.clone();
                let res = s.rank_and_filter_discards(candidates, ctx);
                if res.is_empty() {
                    warn!("{}: filter returned no candidates", s);
                    return backup;
                }
                res
            }
            None => candidates,
        }
    }
}

#[cfg(test)]
fn candidates(ctx: &HandContext) -> Vec<DiscardCandidate> {
    use crate::ai::valuation::*;
    crate::hand::calc_discard_options(ctx)
        .iter()
        .map(|o| evaluate_option(o, ctx, &ValuationParams::default(), false).unwrap())
        .collect()
}

#[test]
fn test_create_strategy() {
    let s = create_strategy("Tanyao").unwrap();
    assert_eq!(s.strategy_type(), StrategyType::Tanyao);
    assert_eq!(s.base().min_shanten, 3);
    assert_eq!(s.to_string(), "Tanyao(min_shanten=3,max_remaining_tiles=10)");

    let s = create_strategy("Tanyao(2, 20)").unwrap();
    assert_eq!(s.base().min_shanten, 2);
    assert_eq!(s.to_string(), "Tanyao(min_shanten=2,max_remaining_tiles=20)");

    let s = create_strategy("Yakuhai()").unwrap();
    assert_eq!(s.strategy_type(), StrategyType::Yakuhai);
    assert_eq!(s.base().min_shanten, 8);

    assert!(create_strategy("Chiitoitsu").is_err());
    assert!(create_strategy("Yakuhai(1,2)").is_err());
    assert!(create_strategy("Tanyao(x)").is_err());
    assert!(create_strategy("Tanyao(-1)").is_err());
}

#[test]
fn test_base_dora_count() {
    // 4mドラ(表示3m) + 赤5p + 北ドラ(表示西)
    let ctx = HandContext::from_expression("m44p406s789z44567/EE,m3z3").unwrap();
    assert_eq!(ctx.shanten, 2);
    let mut base = StrategyBase::new(8);
    assert!(base.should_activate(&ctx, &ctx.tiles));
    assert_eq!(base.dora_count_central, 3);
    assert_eq!(base.dora_count_not_central, 2);
    assert_eq!(base.dora_count_total, 5);

    let mut base = StrategyBase::new(1);
    base.go_for_atodzuke = true;
    assert!(!base.should_activate(&ctx, &ctx.tiles));
    assert!(!base.go_for_atodzuke);
}

#[test]
fn test_generic_filter() {
    // 門前聴牌
    let ctx = HandContext::from_expression("m123456789p1s567z1").unwrap();
    let cands = candidates(&ctx);
    let res = generic_filter(cands.clone(), &ctx, |t| t.is_simple());
    assert_eq!(res, cands);

    // 1向聴以上は不向きな牌に must_discard
    let ctx = HandContext::from_expression("m2345p2367s234z155").unwrap();
    let cands = candidates(&ctx);
    let res = generic_filter(cands.clone(), &ctx, |t| t.is_simple());
    assert_eq!(res.len(), cands.len());
    for c in &res {
        assert_eq!(c.must_discard, !c.tile.is_simple());
    }
}

#[test]
fn test_filter_never_empty() {
    let exps = [
        "m123456789p1s567z1",
        "m2345p2367s234z155",
        "m234p234s2345z5,z777+",
        "m2378p1s456,m5+67,p4+56/ES/6,z11",
        "m2345p33s78,z111+,s6+78",
        "z11234567m19p19s19",
        "m11123455678999",
    ];
    for exp in exps {
        let ctx = HandContext::from_expression(exp).unwrap();
        let cands = candidates(&ctx);
        assert!(!cands.is_empty());
        for name in ["Tanyao", "Yakuhai"] {
            let s = create_strategy(name).unwrap();
            let res = s.rank_and_filter_discards(cands.clone(), &ctx);
            assert!(!res.is_empty(), "{} {}", name, exp);
            assert!(res.iter().all(|c| cands.iter().any(|x| x.tile == c.tile)));
        }
    }
}

#[test]
fn test_coordinator_priority() {
    let mut sc = StrategyCoordinator::from_expressions(&[
        "Yakuhai".to_string(),
        "Tanyao".to_string(),
    ])
    .unwrap();
    assert_eq!(sc.strategies().len(), 2);

    // 連風牌の対子
    let ctx = HandContext::from_expression("m2345p2367s234z11/EE/1").unwrap();
    let t = sc.determine_strategy(&ctx, &ctx.tiles).map(|s| s.strategy_type());
    assert_eq!(t, Some(StrategyType::Yakuhai));

    // 役牌がなく,中張牌のドラが2枚以上
    let ctx = HandContext::from_expression("m2345p2367s23488/EE,m3p2/5").unwrap();
    let t = sc.determine_strategy(&ctx, &ctx.tiles).map(|s| s.strategy_type());
    assert_eq!(t, Some(StrategyType::Tanyao));

    // 前の巡の戦略は引き継がない
    let ctx = HandContext::from_expression("m1239p1239s1239z1/ES").unwrap();
    assert!(sc.determine_strategy(&ctx, &ctx.tiles).is_none());
    assert_eq!(sc.current_type(), None);
    let cands = candidates(&ctx);
    assert_eq!(sc.filter_discards(cands.clone(), &ctx), cands);
}
