// 手牌と打牌候補のデータモデル
mod context;
mod define;
mod discard;
mod meld;
mod tile;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use context::*;
pub use define::*;
pub use discard::*;
pub use meld::*;
pub use tile::*;
