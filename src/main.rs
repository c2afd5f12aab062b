#![warn(rust_2018_idioms)]

use mahjong_ai::util::log;
use mahjong_ai::util::misc::error_exit;
use mahjong_ai::{app, error};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        return;
    }

    // ログレベルはどのモードでも共通 (-l error|warn|info|debug)
    let mut args2 = vec![];
    let mut it = args[2..].iter();
    while let Some(s) = it.next() {
        if s == "-l" {
            let level = it
                .next()
                .unwrap_or_else(|| error_exit("-l: value missing"));
            log::set_level(log::level_from_str(level).unwrap_or_else(error_exit));
        } else {
            args2.push(s.clone());
        }
    }

    match args[1].as_str() {
        "C" => {
            // Calculator (打牌判断モード)
            app::CalculatorApp::new(args2).run();
        }
        "S" => {
            // Simulator (ランダム配牌での戦略集計モード)
            app::SimulatorApp::new(args2).run();
        }
        m => {
            error!("unknown mode: {}", m)
        }
    }
}
