use std::fs::File;
use std::io::{self, BufRead};

use serde_json::json;

use crate::ai::{Ai, AiConfig};
use crate::control::common::tiles_to_string;
use crate::model::*;
use crate::util::misc::*;

use crate::error;

#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    detail: bool,
    json: bool,
    config_path: String,
    offered: String, // 鳴きを判断する牌 (末尾'<'は上家から)
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
            json: false,
            config_path: "".to_string(),
            offered: "".to_string(),
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut exp = "".to_string();
        let args = self.args.clone();
        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-j" => self.json = true,
                "-c" => self.config_path = next_value(&mut it, s),
                "-m" => self.offered = next_value(&mut it, s),
                "-f" => file_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    if !exp.is_empty() {
                        error!("multiple expression is not allowed");
                        return;
                    }
                    exp = s.clone();
                }
            }
        }

        if file_path.is_empty() == exp.is_empty() {
            print_usage();
            return;
        }

        let config = if self.config_path.is_empty() {
            AiConfig::default()
        } else {
            AiConfig::from_file(&self.config_path).unwrap_or_else(error_exit)
        };
        if self.detail {
            println!("config: {:?}", config);
        }

        if !exp.is_empty() {
            if let Err(e) = self.process_expression(&config, &exp) {
                error!("{}", e);
            }
            return;
        }

        if let Err(e) = self.run_from_file(&config, &file_path) {
            error!("{}", e);
        }
    }

    fn run_from_file(&self, config: &AiConfig, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        for exp in lines.map_while(Result::ok) {
            let e = exp.replace(' ', "");
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
            } else if let Err(e) = self.process_expression(config, &exp) {
                error!("{}", e);
            }
            println!();
        }
        Ok(())
    }

    // 式ごとに戦略の状態を持ち越さないようにAiを作り直す
    fn process_expression(&self, config: &AiConfig, exp: &str) -> Res {
        if !self.json {
            println!("> {}", exp);
        }
        let exp = match exp.find('#') {
            Some(i) => &exp[..i],
            None => exp,
        };

        let ctx = HandContext::from_expression(exp)?;
        let mut ai = Ai::new(config.clone())?;
        let cands = ai.discard_candidates(&ctx)?;
        let chosen = crate::ai::select_discard(&cands).cloned();
        let strategy = ai.current_strategy().map(|s| s.to_string());

        let meld = if self.offered.is_empty() {
            None
        } else {
            let (called, from_left) = parse_offered(&ctx, &self.offered)?;
            Some(ai.decide_meld(&ctx, called, from_left)?)
        };

        if self.json {
            let mut v = json!({
                "strategy": strategy,
                "shanten": ctx.shanten,
                "candidates": cands,
                "discard": chosen,
            });
            if let Some(m) = &meld {
                v["meld"] = json!(m);
            }
            if self.detail {
                v["context"] = json!(ctx);
            }
            println!("{}", serde_json::to_string(&v)?);
            return Ok(());
        }

        if self.detail {
            println!("context: {:?}", ctx);
        }
        println!("shanten: {}", ctx.shanten);
        match &strategy {
            Some(s) => println!("strategy: {}", s),
            None => println!("strategy: none"),
        }
        println!("candidates:");
        for c in &cands {
            println!("  {}", c);
            if self.detail {
                println!(
                    "    tile136={}, dora={}, danger={}, wait_to_ukeire={:?}",
                    c.tile136.map_or("-".to_string(), |t| t.to_symbol(ctx.has_aka_dora)),
                    c.count_of_dora,
                    c.danger,
                    c.wait_to_ukeire
                );
            }
        }
        match &chosen {
            Some(c) => println!("discard: {}", c.tile),
            None => println!("discard: none"),
        }
        match &meld {
            Some(Some(m)) => println!(
                "meld: {:?}{} shanten={}",
                m.meld_type,
                tiles_to_string(&m.tiles, ctx.has_aka_dora),
                m.shanten
            ),
            Some(None) => println!("meld: pass"),
            None => {}
        }
        Ok(())
    }
}

// "m4<" => (4mの未使用の物理牌, 上家から)
// 赤5は"m0"で明示しない限り通常の5を優先
fn parse_offered(ctx: &HandContext, exp: &str) -> Result<(Tile136, bool), String> {
    let (symbol, from_left) = match exp.strip_suffix('<') {
        Some(s) => (s, true),
        None => (exp, false),
    };
    let t = Tile::from_symbol(symbol)?;
    let is_red = symbol.ends_with('0');
    let copies: Vec<usize> = if is_red {
        vec![0]
    } else if t.is_suit() && t.1 == 5 && ctx.has_aka_dora {
        vec![1, 2, 3, 0]
    } else {
        (0..TILE).collect()
    };

    for c in copies {
        let t136 = Tile136::from_copy(t, c)?;
        if !ctx.tiles.contains(&t136) && !ctx.dora_indicators.contains(&t136) {
            return Ok((t136, from_left));
        }
    }
    Err(format!("no copy of {} left to offer", t))
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [-d] [-j] [-c CONFIG] [-m TILE[<]]
    $ cargo run C -f FILE [-d] [-j] [-c CONFIG] [-m TILE[<]]
Options
    -d: print debug info
    -j: print result as json
    -c: load ai config from json file
    -m: decide whether to call the offered tile ('<' = discarded by the left player)
    -f: read expresisons from file instead of a commandline expression
Expression
    HAND[,MELD]*[/WINDS[,INDICATORS]][/STEP[,REVEALED[,REMAINING]]][/FLAG,...]
    ex) m123p406s789z1122,z555+/ES,m4/5,z11s9,40/riichi
"
    );
}

#[test]
fn test_parse_offered() {
    let ctx = HandContext::from_expression("m2356p22s3489z115").unwrap();

    let (t, from_left) = parse_offered(&ctx, "m4<").unwrap();
    assert_eq!(t.class(), Tile(TM, 4));
    assert!(from_left);

    // 通常の5を優先
    let (t, from_left) = parse_offered(&ctx, "p5").unwrap();
    assert_eq!(t.class(), Tile(TP, 5));
    assert!(!t.is_red(true));
    assert!(!from_left);

    let (t, _) = parse_offered(&ctx, "p0").unwrap();
    assert!(t.is_red(true));

    // 4枚とも使用済み
    let ctx = HandContext::from_expression("m1111p22s3489z1155").unwrap();
    assert!(parse_offered(&ctx, "m1").is_err());
    assert!(parse_offered(&ctx, "x1").is_err());
}

#[test]
fn test_process_expression() {
    let mut app = CalculatorApp::new(vec![]);
    let config = AiConfig::default();
    assert!(app.process_expression(&config, "m123456789p1s567z1/EE").is_ok());
    assert!(app.process_expression(&config, "m123456789p1s567z1/EE # comment").is_ok());
    assert!(app.process_expression(&config, "m123456789p1s567z1/EEE").is_err());

    app.json = true;
    app.offered = "z1".to_string();
    assert!(app.process_expression(&config, "m2356p22s3489z115/EE/1").is_ok());
}
