// 牌の集計,ドラ,式のパースなど手牌を扱う共通処理
pub mod common;
pub mod wall;
