use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::control::common::*;
use crate::hand::DiscardOption;
use crate::model::*;
use crate::util::misc::Res;

// 打牌評価のパラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationParams {
    pub base_value: i32,                  // 基本値
    pub honor_value: i32,                 // 役牌1つあたりの加点
    pub suit_value_table: [i32; 9],       // 数牌の数字ごとの価値 (通常)
    pub all_simples_value_table: [i32; 9], // 数牌の数字ごとの価値 (断么九狙い)
    pub honor_decay_curve: [i32; 5],      // 字牌の見えている枚数ごとの価値の割合(%)
    pub dora_first_neighbour: i32,        // ドラの隣
    pub dora_second_neighbour: i32,       // ドラの2つ隣
    pub dora_value: i32,                  // ドラ1枚あたり
    pub default_danger: i32,
}

impl Default for ValuationParams {
    fn default() -> Self {
        Self {
            base_value: 100,
            honor_value: 20,
            suit_value_table: [10, 20, 40, 50, 30, 50, 40, 20, 10],
            all_simples_value_table: [10, 20, 30, 50, 40, 50, 30, 20, 10],
            honor_decay_curve: [100, 75, 20, 0, 0],
            dora_first_neighbour: 1000,
            dora_second_neighbour: 100,
            dora_value: 10000,
            default_danger: 100,
        }
    }
}

// 打牌候補を評価. tile_34が34種の範囲外の場合はエラー.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_discard(
    tile_34: usize,
    shanten: Shanten,
    waiting: &[Tile],
    wait_to_ukeire: &BTreeMap<Tile, usize>,
    ctx: &HandContext,
    params: &ValuationParams,
    is_all_simples: bool,
) -> Res<DiscardCandidate> {
    let t = Tile::from_34(tile_34)?;
    let mut ukeire = 0;
    for w in waiting {
        ukeire += *wait_to_ukeire
            .get(w)
            .ok_or_else(|| format!("no ukeire for waiting tile: {}", w))?;
    }

    let mut value = params.base_value;
    if t.is_hornor() {
        // 連風牌は2倍
        value += params.honor_value * ctx.count_valued(t) as i32;
    } else {
        let table = if is_all_simples {
            &params.all_simples_value_table
        } else {
            &params.suit_value_table
        };
        value += table[t.1 - 1];
        value += calc_dora_neighbour_value(t, &ctx.dora_indicators, params);
    }

    let tile136 = find_tile_in_hand(t, &ctx.closed_hand, ctx.has_aka_dora);
    let mut count_of_dora = count_dora_class(t, &ctx.dora_indicators);
    if let Some(t136) = tile136 {
        if t136.is_red(ctx.has_aka_dora) {
            count_of_dora += 1;
        }
    }
    value += count_of_dora as i32 * params.dora_value;

    let mut must_discard = false;
    if t.is_hornor() {
        // 見えている枚数に応じて価値を下げる
        let curve = &params.honor_decay_curve;
        let n = count_tile(&ctx.revealed, t).min(curve.len() - 1);
        value = value * curve[n] / 100;

        // 3枚見えている字牌は刻子にも雀頭にもならない
        if value == 0 {
            must_discard = true;
        }
    }

    Ok(DiscardCandidate {
        tile: t,
        tile136,
        shanten,
        waiting: waiting.to_vec(),
        ukeire,
        ukeire_second: 0,
        wait_to_ukeire: wait_to_ukeire.clone(),
        valuation: value,
        count_of_dora,
        danger: params.default_danger,
        must_discard,
        must_keep: false,
    })
}

pub fn evaluate_option(
    opt: &DiscardOption,
    ctx: &HandContext,
    params: &ValuationParams,
    is_all_simples: bool,
) -> Res<DiscardCandidate> {
    let mut c = evaluate_discard(
        opt.tile.to_34(),
        opt.shanten,
        &opt.waiting,
        &opt.wait_to_ukeire,
        ctx,
        params,
        is_all_simples,
    )?;
    c.ukeire_second = opt.ukeire_second;
    Ok(c)
}

// 同じ種別のドラ表示牌に対して,ドラの1つ隣,2つ隣の数牌に加点 (9から1へは回り込まない)
// 字牌のドラ表示牌は対象外
fn calc_dora_neighbour_value(t: Tile, doras: &[Tile136], params: &ValuationParams) -> i32 {
    let mut value = 0;
    for d in doras {
        let ind = d.class();
        if ind.is_hornor() || ind.0 != t.0 {
            continue;
        }

        let dora = dora_from_indicator(ind);
        match (t.1 as isize - dora.1 as isize).abs() {
            1 => value += params.dora_first_neighbour,
            2 => value += params.dora_second_neighbour,
            _ => {}
        }
    }
    value
}

#[cfg(test)]
fn eval(ctx: &HandContext, symbol: &str, is_all_simples: bool) -> DiscardCandidate {
    let t = Tile::from_symbol(symbol).unwrap();
    evaluate_discard(
        t.to_34(),
        1,
        &[],
        &BTreeMap::new(),
        ctx,
        &ValuationParams::default(),
        is_all_simples,
    )
    .unwrap()
}

#[test]
fn test_out_of_range() {
    let ctx = HandContext::from_expression("m123456p123s12z11").unwrap();
    let params = ValuationParams::default();
    for i in [TILE34, TILE34 + 1, 1000] {
        assert!(evaluate_discard(i, 1, &[], &BTreeMap::new(), &ctx, &params, false).is_err());
    }
    // 待ち牌の受け入れが無い
    let w = vec![Tile(TM, 7)];
    assert!(evaluate_discard(0, 1, &w, &BTreeMap::new(), &ctx, &params, false).is_err());
}

#[test]
fn test_suit_value() {
    let ctx = HandContext::from_expression("m123456789p1s12z11/EE").unwrap();
    // 中央寄りの数牌 (0始まりの位置5 = 6m)
    let c = eval(&ctx, "m6", false);
    assert_eq!(c.valuation, 150);
    assert!(!c.must_discard);
    assert_eq!(eval(&ctx, "m4", false).valuation, 150);
    assert_eq!(eval(&ctx, "m5", false).valuation, 130);
    assert_eq!(eval(&ctx, "m1", false).valuation, 110);
    assert_eq!(eval(&ctx, "m3", false).valuation, 140);

    // 断么九狙い
    assert_eq!(eval(&ctx, "m5", true).valuation, 140);
    assert_eq!(eval(&ctx, "m3", true).valuation, 130);
}

#[test]
fn test_honor_value() {
    let ctx = HandContext::from_expression("m123456789p1s12z1/ES,p1/1,z22333").unwrap();
    // 場風東
    let c = eval(&ctx, "z1", false);
    assert_eq!(c.valuation, 120);

    // 2枚見えている役牌: 120 * 20% = 24
    let ctx = HandContext::from_expression("m123456789p1s12z2/SS/1,z22").unwrap();
    let c = eval(&ctx, "z2", false);
    assert_eq!(c.valuation, (100 + 40) * 20 / 100);
    let ctx = HandContext::from_expression("m123456789p1s12z5/ES/1,z55").unwrap();
    let c = eval(&ctx, "z5", false);
    assert_eq!(c.valuation, 24);
    assert!(!c.must_discard);

    // 1枚見えている
    let ctx = HandContext::from_expression("m123456789p1s12z5/ES/1,z5").unwrap();
    assert_eq!(eval(&ctx, "z5", false).valuation, 90);

    // 役牌でない字牌
    let ctx = HandContext::from_expression("m123456789p1s12z4/ES").unwrap();
    assert_eq!(eval(&ctx, "z4", false).valuation, 100);
}

#[test]
fn test_honor_dead() {
    for revealed in ["z777", "z6666"] {
        let hand = if revealed == "z777" { "z7" } else { "z1" };
        let ctx =
            HandContext::from_expression(&format!("m123456789p1s12{}/EE/1,{}", hand, revealed))
                .unwrap();
        let c = eval(&ctx, &revealed[..2], false);
        assert_eq!(c.valuation, 0);
        assert!(c.must_discard);
    }

    // ドラの字牌でも3枚見えていれば不要
    let ctx = HandContext::from_expression("m123456789p1s12z7/EE,z6/1,z777").unwrap();
    let c = eval(&ctx, "z7", false);
    assert_eq!(c.count_of_dora, 1);
    assert_eq!(c.valuation, 0);
    assert!(c.must_discard);
}

#[test]
fn test_dora_neighbour() {
    // 3m表示 => 4mがドラ
    let ctx = HandContext::from_expression("m234567p123s12z11/EE,m3").unwrap();
    let c = eval(&ctx, "m4", false);
    assert_eq!(c.count_of_dora, 1);
    assert_eq!(c.valuation, 100 + 50 + 10000);
    assert_eq!(eval(&ctx, "m5", false).valuation, 100 + 30 + 1000);
    assert_eq!(eval(&ctx, "m3", false).valuation, 100 + 40 + 1000);
    assert_eq!(eval(&ctx, "m6", false).valuation, 100 + 50 + 100);
    assert_eq!(eval(&ctx, "m2", false).valuation, 100 + 20 + 100);
    assert_eq!(eval(&ctx, "m7", false).valuation, 100 + 40);
    // 別の種類
    assert_eq!(eval(&ctx, "p5", false).valuation, 130);

    // 9m表示 => 1mがドラ. 8m, 9mは回り込まない
    let ctx = HandContext::from_expression("m123456789p1s12z11/EE,m9").unwrap();
    assert_eq!(eval(&ctx, "m1", false).valuation, 100 + 10 + 10000);
    assert_eq!(eval(&ctx, "m2", false).valuation, 100 + 20 + 1000);
    assert_eq!(eval(&ctx, "m3", false).valuation, 100 + 40 + 100);
    assert_eq!(eval(&ctx, "m9", false).valuation, 100 + 10);
    assert_eq!(eval(&ctx, "m8", false).valuation, 100 + 20);
}

#[test]
fn test_honor_indicator_no_neighbour() {
    // 東表示 => 南がドラ. 隣の字牌に加点しない
    let ctx = HandContext::from_expression("m123456789p1s1z23/EE,z1").unwrap();
    assert_eq!(eval(&ctx, "z3", false).valuation, 100);
    assert_eq!(eval(&ctx, "z2", false).valuation, 100 + 10000);
    assert_eq!(eval(&ctx, "s1", false).valuation, 110);
}

#[test]
fn test_red_five() {
    // 通常の5があれば赤5は残す
    let ctx = HandContext::from_expression("m1234056789p1s1z1").unwrap();
    let c = eval(&ctx, "m5", false);
    assert!(!c.tile136.unwrap().is_red(true));
    assert_eq!(c.count_of_dora, 0);
    assert_eq!(c.valuation, 130);

    assert_eq!(eval(&ctx, "p5", false).tile136, None);

    // 赤5しかない
    let ctx = HandContext::from_expression("m1234067899p1s1z1").unwrap();
    let c = eval(&ctx, "m5", false);
    assert!(c.tile136.unwrap().is_red(true));
    assert_eq!(c.count_of_dora, 1);
    assert_eq!(c.valuation, 130 + 10000);

    // 赤ドラ無し
    let ctx = HandContext::from_expression("m1234067899p1s1z1/EE//noaka").unwrap();
    let c = eval(&ctx, "m5", false);
    assert_eq!(c.count_of_dora, 0);
    assert_eq!(c.valuation, 130);
}

#[test]
fn test_dora_monotonic() {
    // ドラ表示牌を追加しても評価値は下がらない
    let base = HandContext::from_expression("m123456789p159s1").unwrap();
    for i in 0..TILE34 {
        let t = Tile::from_34(i).unwrap();
        let mut ctx = base.clone();
        let mut alloc = TileAllocator::new(true);
        for _ in 0..4 {
            if let Ok(ind) = alloc.alloc(t, false) {
                if !ctx.tiles.contains(&ind) {
                    ctx.dora_indicators.push(ind);
                    break;
                }
            }
        }
        for s in ["m5", "p5", "p1", "s1", "m9"] {
            assert!(eval(&ctx, s, false).valuation >= eval(&base, s, false).valuation);
        }
    }
}

#[test]
fn test_evaluate_deterministic() {
    let ctx = HandContext::from_expression("m123406789p1s12z11/ES,m3s9/3,z1").unwrap();
    let params = ValuationParams::default();
    for i in 0..TILE34 {
        let w = vec![Tile(TP, 2)];
        let mut m = BTreeMap::new();
        m.insert(Tile(TP, 2), 3);
        let a = evaluate_discard(i, 1, &w, &m, &ctx, &params, false).unwrap();
        let b = evaluate_discard(i, 1, &w, &m, &ctx, &params, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ukeire, 3);
    }
}
