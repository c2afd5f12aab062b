use crate::model::*;

// [向聴数]
// -1: 和了形, 0: 聴牌, n: n向聴

// 面子手 (4面子1雀頭) の向聴数
// n_melds: 副露(暗槓を含む)の数
pub fn calc_shanten_normal(hand: &TileTable, n_melds: usize) -> Shanten {
    let mut s = NormalSearch {
        tt: *hand,
        sets: n_melds,
        partials: 0,
        pair: 0,
        best: 8,
    };
    s.search(0);
    s.best
}

// 七対子の向聴数 (副露がある場合は不成立)
pub fn calc_shanten_chiitoitsu(hand: &TileTable) -> Shanten {
    let mut pairs = 0;
    let mut kinds = 0;
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if hand[ti][ni] > 0 {
                kinds += 1;
            }
            if hand[ti][ni] >= 2 {
                pairs += 1;
            }
        }
    }
    let redundant = if kinds < 7 { 7 - kinds } else { 0 };
    6 - pairs + redundant
}

// 国士無双の向聴数
pub fn calc_shanten_kokushimusou(hand: &TileTable) -> Shanten {
    let mut kinds = 0;
    let mut has_pair = false;
    let mut check = |n: usize| {
        if n > 0 {
            kinds += 1;
        }
        if n >= 2 {
            has_pair = true;
        }
    };
    for ti in 0..TZ {
        check(hand[ti][1]);
        check(hand[ti][9]);
    }
    for ni in WE..=DR {
        check(hand[TZ][ni]);
    }
    13 - kinds - has_pair as Shanten
}

pub fn calc_shanten(hand: &TileTable, n_melds: usize) -> Shanten {
    let mut shanten = calc_shanten_normal(hand, n_melds);
    if n_melds == 0 {
        shanten = shanten
            .min(calc_shanten_chiitoitsu(hand))
            .min(calc_shanten_kokushimusou(hand));
    }
    shanten
}

struct NormalSearch {
    tt: TileTable,
    sets: usize,     // 面子 (副露を含む)
    partials: usize, // 塔子 (対子を含む)
    pair: usize,     // 雀頭
    best: Shanten,
}

impl NormalSearch {
    fn evaluate(&mut self) {
        let sets = self.sets.min(4);
        let partials = self.partials.min(4 - sets);
        let shanten = 8 - 2 * sets as Shanten - partials as Shanten - self.pair as Shanten;
        if shanten < self.best {
            self.best = shanten;
        }
    }

    fn search(&mut self, mut pos: usize) {
        while pos < TILE34 && self.tt[pos / 9][pos % 9 + 1] == 0 {
            pos += 1;
        }
        if pos >= TILE34 {
            self.evaluate();
            return;
        }

        let (ti, ni) = (pos / 9, pos % 9 + 1);
        let is_suit = ti != TZ;

        // 刻子
        if self.tt[ti][ni] >= 3 {
            self.tt[ti][ni] -= 3;
            self.sets += 1;
            self.search(pos);
            self.sets -= 1;
            self.tt[ti][ni] += 3;
        }

        // 順子
        if is_suit && ni <= 7 && self.tt[ti][ni + 1] > 0 && self.tt[ti][ni + 2] > 0 {
            self.take(ti, &[ni, ni + 1, ni + 2]);
            self.sets += 1;
            self.search(pos);
            self.sets -= 1;
            self.put(ti, &[ni, ni + 1, ni + 2]);
        }

        // 雀頭
        if self.pair == 0 && self.tt[ti][ni] >= 2 {
            self.tt[ti][ni] -= 2;
            self.pair = 1;
            self.search(pos);
            self.pair = 0;
            self.tt[ti][ni] += 2;
        }

        // 塔子 (4つを超える塔子は向聴数に影響しない)
        if self.sets + self.partials < 4 {
            if self.tt[ti][ni] >= 2 {
                self.tt[ti][ni] -= 2;
                self.partials += 1;
                self.search(pos);
                self.partials -= 1;
                self.tt[ti][ni] += 2;
            }
            if is_suit && ni <= 8 && self.tt[ti][ni + 1] > 0 {
                self.take(ti, &[ni, ni + 1]);
                self.partials += 1;
                self.search(pos);
                self.partials -= 1;
                self.put(ti, &[ni, ni + 1]);
            }
            if is_suit && ni <= 7 && self.tt[ti][ni + 2] > 0 {
                self.take(ti, &[ni, ni + 2]);
                self.partials += 1;
                self.search(pos);
                self.partials -= 1;
                self.put(ti, &[ni, ni + 2]);
            }
        }

        // 孤立牌
        self.tt[ti][ni] -= 1;
        self.search(pos);
        self.tt[ti][ni] += 1;
    }

    #[inline]
    fn take(&mut self, ti: Type, nis: &[Tnum]) {
        for &n in nis {
            self.tt[ti][n] -= 1;
        }
    }

    #[inline]
    fn put(&mut self, ti: Type, nis: &[Tnum]) {
        for &n in nis {
            self.tt[ti][n] += 1;
        }
    }
}

#[cfg(test)]
fn table(exp: &str) -> TileTable {
    use crate::control::common::*;
    classes_to_tile_table(&tile_classes_from_string(exp).unwrap())
}

#[test]
fn test_shanten_normal() {
    assert_eq!(calc_shanten(&table("m123456789p11s567"), 0), -1);
    assert_eq!(calc_shanten(&table("m123456789p1s567"), 0), 0);
    assert_eq!(calc_shanten(&table("m12345678p11s567"), 0), 0);
    assert_eq!(calc_shanten(&table("m1234567p11s5679"), 0), 1);
    assert_eq!(calc_shanten_normal(&table("m147p258s369z1234"), 0), 8);
    assert_eq!(calc_shanten(&table("m147p258s369z1234"), 0), 6); // 七対子
    // 副露1つ (門前10枚)
    assert_eq!(calc_shanten(&table("m123p456s78z11"), 1), 0);
    assert_eq!(calc_shanten(&table("m123p456s789z1"), 1), 0);
}

#[test]
fn test_shanten_chiitoitsu() {
    assert_eq!(calc_shanten_chiitoitsu(&table("m1199p2288s33z115")), 0);
    assert_eq!(calc_shanten(&table("m1199p2288s33z1155"), 0), -1);
    // 4枚使いは2対子とみなさない
    assert_eq!(calc_shanten_chiitoitsu(&table("m1111p2288s33z115")), 1 + 1);
}

#[test]
fn test_shanten_kokushimusou() {
    assert_eq!(calc_shanten(&table("m19p19s19z1234567"), 0), 0);
    assert_eq!(calc_shanten(&table("m119p19s19z1234567"), 0), -1);
    assert_eq!(calc_shanten_kokushimusou(&table("m19p19s19z123456m5")), 1);
}
