// 型エイリアス
pub type Type = usize; // 牌の種別部分 (萬子,筒子,索子,字牌)
pub type Tnum = usize; // 牌の数字部分 (数牌: 1~9, 字牌: 1~7)
pub type Shanten = i32; // 向聴数 (-1: 和了形, 0: 聴牌)

// Number
pub const TYPE: usize = 4; // 牌の種別部分の数 (萬子,筒子,索子,字牌)
pub const TNUM: usize = 10; // TileTableの数字部分の幅 (0は未使用)
pub const TILE: usize = 4; // 同種の牌の数
pub const TILE34: usize = 34; // 牌の種類の数
pub const TILE136: usize = 136; // 物理牌の数

// Type Index
pub const TM: usize = 0; // Type: Manzu (萬子)
pub const TP: usize = 1; // Type: Pinzu (筒子)
pub const TS: usize = 2; // Type: Souzu (索子)
pub const TZ: usize = 3; // Type: Zihai (字牌)

// Tnum Index
pub const WE: usize = 1; // Wind:    East  (東)
pub const WS: usize = 2; // Wind:    South (南)
pub const WW: usize = 3; // Wind:    West  (西)
pub const WN: usize = 4; // Wind:    North (北)
pub const DW: usize = 5; // Doragon: White (白)
pub const DG: usize = 6; // Doragon: Green (發)
pub const DR: usize = 7; // Doragon: Red   (中)

// 赤5として扱われる物理牌 (5m, 5p, 5sの1枚目)
pub const RED5_IDS: [usize; 3] = [16, 52, 88];
