// 向聴数と受け入れの計算を行うモジュール
mod shanten;
mod ukeire;

pub use self::{
    shanten::calc_shanten,
    ukeire::{calc_discard_options, DiscardOption},
};
