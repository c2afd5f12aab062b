use std::collections::{BTreeMap, HashMap};

use super::shanten::calc_shanten;
use crate::control::common::*;
use crate::model::*;

// 打牌ごとの向聴数と受け入れ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardOption {
    pub tile: Tile,
    pub shanten: Shanten,
    pub waiting: Vec<Tile>,
    pub ukeire: usize,
    pub ukeire_second: usize,
    pub wait_to_ukeire: BTreeMap<Tile, usize>,
}

// 門前の各牌について切った場合の向聴数と受け入れを返却 (牌の種類順)
pub fn calc_discard_options(ctx: &HandContext) -> Vec<DiscardOption> {
    let closed = ctx.closed_table();
    let n_melds = ctx.melds.len();
    let mut visible = ctx.hand_table();
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            visible[ti][ni] += ctx.revealed[ti][ni];
        }
    }

    let mut cache = TenpaiCache::default();
    let mut res = vec![];
    for t in Tile::all() {
        if count_tile(&closed, t) == 0 {
            continue;
        }

        let mut tt = closed;
        dec_tile(&mut tt, t);
        let shanten = calc_shanten(&tt, n_melds);
        let (waiting, wait_to_ukeire, ukeire) = calc_waiting(&tt, n_melds, shanten, &visible);
        let ukeire_second = if shanten == 1 {
            calc_ukeire_second(&tt, n_melds, &waiting, &visible, &mut cache)
        } else {
            0
        };

        res.push(DiscardOption {
            tile: t,
            shanten,
            waiting,
            ukeire,
            ukeire_second,
            wait_to_ukeire,
        });
    }
    res
}

// 残り枚数 (4 - 自分から見えている枚数)
#[inline]
fn count_left(visible: &TileTable, t: Tile) -> usize {
    TILE.saturating_sub(count_tile(visible, t))
}

// 向聴数を進める牌とその枚数
pub fn calc_waiting(
    hand: &TileTable,
    n_melds: usize,
    shanten: Shanten,
    visible: &TileTable,
) -> (Vec<Tile>, BTreeMap<Tile, usize>, usize) {
    let mut tt = *hand;
    let mut waiting = vec![];
    let mut wait_to_ukeire = BTreeMap::new();
    let mut ukeire = 0;
    for t in Tile::all() {
        if count_tile(&tt, t) >= TILE {
            continue;
        }
        inc_tile(&mut tt, t);
        let s = calc_shanten(&tt, n_melds);
        dec_tile(&mut tt, t);
        if s < shanten {
            let n = count_left(visible, t);
            waiting.push(t);
            wait_to_ukeire.insert(t, n);
            ukeire += n;
        }
    }
    (waiting, wait_to_ukeire, ukeire)
}

// 2段目の受け入れ計算用. 打牌候補が異なっても同じ聴牌形に何度も到達するため結果を使い回す
#[derive(Debug, Default)]
struct TenpaiCache {
    shanten: HashMap<TileTable, Shanten>,
    ukeire: HashMap<(TileTable, Tile), usize>, // (聴牌形, 引いた牌) => 受け入れ枚数
}

impl TenpaiCache {
    fn shanten(&mut self, hand: &TileTable, n_melds: usize) -> Shanten {
        *self
            .shanten
            .entry(*hand)
            .or_insert_with(|| calc_shanten(hand, n_melds))
    }

    // 引いた牌によって見えている枚数が変わるのでキーに含める
    fn ukeire(
        &mut self,
        hand: &TileTable,
        n_melds: usize,
        drawn: Tile,
        visible: &TileTable,
    ) -> usize {
        if let Some(&n) = self.ukeire.get(&(*hand, drawn)) {
            return n;
        }
        let (_, _, n) = calc_waiting(hand, n_melds, 0, visible);
        self.ukeire.insert((*hand, drawn), n);
        n
    }
}

// 1向聴の手牌について,各有効牌を引いた後の最善の聴牌受け入れを有効牌の枚数で重み付けして合計
fn calc_ukeire_second(
    hand: &TileTable,
    n_melds: usize,
    waiting: &[Tile],
    visible: &TileTable,
    cache: &mut TenpaiCache,
) -> usize {
    let mut sum = 0;
    for &w in waiting {
        let left = count_left(visible, w);
        if left == 0 {
            continue;
        }

        let mut tt = *hand;
        inc_tile(&mut tt, w);
        let mut vis = *visible;
        inc_tile(&mut vis, w);

        let mut best = 0;
        for d in Tile::all() {
            // 引いた牌をそのまま切ると1向聴に戻る
            if d == w || count_tile(&tt, d) == 0 {
                continue;
            }
            dec_tile(&mut tt, d);
            if cache.shanten(&tt, n_melds) == 0 {
                best = best.max(cache.ukeire(&tt, n_melds, w, &vis));
            }
            inc_tile(&mut tt, d);
        }
        sum += left * best;
    }
    sum
}

#[test]
fn test_discard_options() {
    // 1pを切れば 3m6m待ち(両面)
    let ctx = HandContext::from_expression("m45p1s123456789z11").unwrap();
    let opts = calc_discard_options(&ctx);
    assert_eq!(opts.len(), 13);

    let p1 = opts.iter().find(|o| o.tile == Tile(TP, 1)).unwrap();
    assert_eq!(p1.shanten, 0);
    assert_eq!(p1.waiting, vec![Tile(TM, 3), Tile(TM, 6)]);
    assert_eq!(p1.ukeire, 8);
    assert_eq!(p1.wait_to_ukeire[&Tile(TM, 3)], 4);
    assert_eq!(p1.ukeire_second, 0);

    let z1 = opts.iter().find(|o| o.tile == Tile(TZ, WE)).unwrap();
    assert_eq!(z1.shanten, 1);
    assert!(z1.ukeire_second > 0);
}

#[test]
fn test_ukeire_visible_tiles() {
    // 場に3mが3枚見えている
    let ctx = HandContext::from_expression("m45p1s123456789z11/EE/1,m333").unwrap();
    let opts = calc_discard_options(&ctx);
    let p1 = opts.iter().find(|o| o.tile == Tile(TP, 1)).unwrap();
    assert_eq!(p1.wait_to_ukeire[&Tile(TM, 3)], 1);
    assert_eq!(p1.ukeire, 5);
}

#[cfg(test)]
fn ukeire_second_uncached(hand: &TileTable, n_melds: usize, visible: &TileTable) -> usize {
    let (waiting, _, _) = calc_waiting(hand, n_melds, 1, visible);
    let mut sum = 0;
    for w in waiting {
        let mut tt = *hand;
        inc_tile(&mut tt, w);
        let mut vis = *visible;
        inc_tile(&mut vis, w);
        let mut best = 0;
        for d in Tile::all() {
            if count_tile(&tt, d) == 0 {
                continue;
            }
            dec_tile(&mut tt, d);
            if calc_shanten(&tt, n_melds) == 0 {
                best = best.max(calc_waiting(&tt, n_melds, 0, &vis).2);
            }
            inc_tile(&mut tt, d);
        }
        sum += count_left(visible, w) * best;
    }
    sum
}

#[test]
fn test_ukeire_second_cache() {
    // キャッシュを使っても全探索と同じ値になる
    for exp in ["m45p1s123456789z11", "m2345678p2345678", "m13p234456s234p79s6"] {
        let ctx = HandContext::from_expression(exp).unwrap();
        let mut visible = ctx.hand_table();
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                visible[ti][ni] += ctx.revealed[ti][ni];
            }
        }

        let start = std::time::Instant::now();
        let opts = calc_discard_options(&ctx);
        let elapsed = start.elapsed();

        let closed = ctx.closed_table();
        let mut n_checked = 0;
        for o in opts.iter().filter(|o| o.shanten == 1).take(3) {
            let mut tt = closed;
            dec_tile(&mut tt, o.tile);
            let expected = ukeire_second_uncached(&tt, 0, &visible);
            assert_eq!(o.ukeire_second, expected, "{} {}", exp, o.tile);
            n_checked += 1;
        }
        assert!(n_checked > 0, "{}", exp);
        assert!(elapsed.as_secs() < 10, "{}: {:?}", exp, elapsed);
    }
}
