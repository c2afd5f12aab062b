use crate::control::common::*;
use crate::hand::calc_shanten;
use crate::model::*;

// 他家の打牌に対する鳴きの判断 (戦略共通)
// is_suitable: 戦略にとって有用な牌か
// must_call: 向聴数が進まなくても鳴く
pub fn evaluate_meld_call<F>(
    ctx: &HandContext,
    called: Tile136,
    from_left: bool,
    is_suitable: F,
    must_call: bool,
) -> Option<MeldCall>
where
    F: Fn(Tile) -> bool,
{
    if ctx.in_riichi || ctx.closed_hand.len() <= 1 {
        return None;
    }

    let t = called.class();
    if !is_suitable(t) {
        return None;
    }

    // 候補: (種別, 手牌から使う牌の種類)
    let mut patterns: Vec<(MeldType, [Tile; 2])> = vec![];
    let closed = ctx.closed_table();
    if count_tile(&closed, t) >= 2 {
        patterns.push((MeldType::Pon, [t, t]));
    }
    if from_left && t.is_suit() {
        for (a, b) in [(-2, -1), (-1, 1), (1, 2)] {
            if let (Some(t0), Some(t1)) = (t.offset(a), t.offset(b)) {
                if count_tile(&closed, t0) > 0
                    && count_tile(&closed, t1) > 0
                    && is_suitable(t0)
                    && is_suitable(t1)
                {
                    patterns.push((MeldType::Chi, [t0, t1]));
                }
            }
        }
    }

    // 鳴いた後の向聴数が最も小さいもの. 同じ場合は先に見つかったもの(ポン)を優先
    // 鳴いた後は1枚切るため和了形(-1)は聴牌(0)として扱う
    let n_melds = ctx.melds.len() + 1;
    let mut best: Option<(Shanten, MeldType, [Tile; 2])> = None;
    for (tp, pair) in patterns {
        let mut tt = closed;
        dec_tile(&mut tt, pair[0]);
        dec_tile(&mut tt, pair[1]);
        let s = calc_shanten(&tt, n_melds).max(0);
        if best.map_or(true, |(bs, _, _)| s < bs) {
            best = Some((s, tp, pair));
        }
    }

    let (shanten, meld_type, pair) = best?;
    if shanten >= ctx.shanten && !must_call {
        return None;
    }

    let mut hand = ctx.closed_hand.clone();
    let mut tiles = vec![];
    for c in pair {
        let t136 = find_tile_in_hand(c, &hand, ctx.has_aka_dora)?;
        hand.retain(|&x| x != t136);
        tiles.push(t136);
    }
    tiles.push(called);
    tiles.sort_by_key(|t| t.class());

    Some(MeldCall {
        meld_type,
        tiles,
        called,
        shanten,
    })
}

#[cfg(test)]
fn offered(ctx: &HandContext, symbol: &str) -> Tile136 {
    let t = Tile::from_symbol(symbol).unwrap();
    (0..TILE)
        .map(|c| Tile136::from_copy(t, c).unwrap())
        .find(|x| !ctx.tiles.contains(x) && !ctx.dora_indicators.contains(x))
        .unwrap()
}

#[test]
fn test_meld_pon_and_chi() {
    let ctx = HandContext::from_expression("m2356p22s3489z115").unwrap();
    assert_eq!(ctx.shanten, 3);

    // 上家以外からのチーはしない
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "m4"), false, |_| true, false), None);

    let m = evaluate_meld_call(&ctx, offered(&ctx, "m4"), true, |_| true, false).unwrap();
    assert_eq!(m.meld_type, MeldType::Chi);
    assert_eq!(m.shanten, 2);
    assert_eq!(m.tiles.len(), 3);
    assert!(m.tiles.contains(&m.called));

    let m = evaluate_meld_call(&ctx, offered(&ctx, "p2"), false, |_| true, false).unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);
    assert_eq!(m.shanten, 2);

    // 鳴けない
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "z5"), false, |_| true, true), None);
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "m9"), true, |_| true, true), None);
}

#[test]
fn test_meld_must_call() {
    // 聴牌からのポンは向聴数が進まない
    let ctx = HandContext::from_expression("m123456p789s22z55").unwrap();
    assert_eq!(ctx.shanten, 0);
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "z5"), false, |_| true, false), None);
    let m = evaluate_meld_call(&ctx, offered(&ctx, "z5"), false, |_| true, true).unwrap();
    assert_eq!(m.meld_type, MeldType::Pon);
    assert_eq!(m.shanten, 0);
    assert_eq!(m.called.class(), Tile(TZ, DW));
}

#[test]
fn test_meld_refused() {
    let ctx = HandContext::from_expression("m2356p22s3489z115/EE/1/riichi").unwrap();
    assert!(ctx.in_riichi);
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "p2"), false, |_| true, true), None);

    // 不向きな牌は鳴かない
    let ctx = HandContext::from_expression("m2356p22s3489z115").unwrap();
    let simple = |t: Tile| t.is_simple();
    let m = evaluate_meld_call(&ctx, offered(&ctx, "p2"), false, simple, false);
    assert_eq!(m.map(|m| m.meld_type), Some(MeldType::Pon));
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "z1"), false, simple, true), None);
    // 7s + 89s のチーは9sを使うため不可
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "s7"), true, simple, true), None);
    assert!(evaluate_meld_call(&ctx, offered(&ctx, "s7"), true, |_| true, true).is_some());

    // 門前が1枚
    let ctx = HandContext::from_expression("z1,m1+23,p4+56,s7+89,m777+").unwrap();
    assert_eq!(evaluate_meld_call(&ctx, offered(&ctx, "z1"), false, |_| true, true), None);
}

#[test]
fn test_meld_keep_red() {
    // 赤5は残して通常の5で鳴く
    let ctx = HandContext::from_expression("m2056p22s3489z115").unwrap();
    let m = evaluate_meld_call(&ctx, offered(&ctx, "m7"), true, |_| true, true).unwrap();
    assert_eq!(m.meld_type, MeldType::Chi);
    assert_eq!(m.shanten, 2);
    assert!(m.tiles.iter().all(|t| !t.is_red(true)));
}
