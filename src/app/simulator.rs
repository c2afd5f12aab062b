use std::collections::BTreeMap;

use rand::prelude::*;

use crate::ai::{Ai, AiConfig};
use crate::control::common::tiles_to_string;
use crate::control::wall::{create_wall, move_tiles};
use crate::model::*;
use crate::util::misc::*;

use crate::{error, info};

const DEAD_WALL: usize = 14; // 王牌

// ランダムな配牌に対して打牌判断を繰り返し,戦略の発動回数を集計
#[derive(Debug)]
pub struct SimulatorApp {
    seed: u64,
    n_game: usize,
    config_path: String,
    quiet: bool,
}

impl SimulatorApp {
    pub fn new(args: Vec<String>) -> Self {
        let mut app = Self {
            seed: 0,
            n_game: 10,
            config_path: "".to_string(),
            quiet: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-s" => app.seed = next_value(&mut it, s),
                "-g" => app.n_game = next_value(&mut it, s),
                "-c" => app.config_path = next_value(&mut it, s),
                "-q" => app.quiet = true,
                opt => {
                    error!("unknown option: {}", opt);
                    std::process::exit(0);
                }
            }
        }

        if app.seed == 0 {
            app.seed = unixtime_now() as u64;
            info!(
                "Random seed is not specified. Unix timestamp '{}' is used as seed.",
                app.seed
            );
        }

        app
    }

    pub fn run(self) {
        println!("seed: {}", self.seed);

        let config = if self.config_path.is_empty() {
            AiConfig::default()
        } else {
            AiConfig::from_file(&self.config_path).unwrap_or_else(error_exit)
        };
        let mut ai = Ai::new(config).unwrap_or_else(error_exit);

        let start = std::time::Instant::now();
        let mut rng: StdRng = SeedableRng::seed_from_u64(self.seed);
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for i in 0..self.n_game {
            match self.run_single_game(&mut ai, &mut rng) {
                Ok((ctx, discard)) => {
                    let name = ai
                        .current_strategy()
                        .map_or("None".to_string(), |s| s.strategy_type().to_string());
                    if !self.quiet {
                        println!(
                            "game {}: {}",
                            i,
                            tiles_to_string(&ctx.closed_hand, ctx.has_aka_dora)
                        );
                        println!("  strategy: {}, shanten: {}", name, ctx.shanten);
                        println!("  discard: {}", discard);
                    }
                    *counts.entry(name).or_insert(0) += 1;
                }
                Err(e) => {
                    error!("game {}: {}", i, e);
                    *counts.entry("Error".to_string()).or_insert(0) += 1;
                }
            }
        }

        println!();
        println!("strategy activation:");
        for (name, n) in &counts {
            println!(
                "  {:8}: {:6} ({:5.1}%)",
                name,
                n,
                *n as f32 / self.n_game.max(1) as f32 * 100.0
            );
        }
        println!(
            "total elapsed time: {:8.3}sec",
            start.elapsed().as_nanos() as f32 / 1000000000.0
        );
    }

    fn run_single_game(
        &self,
        ai: &mut Ai,
        rng: &mut StdRng,
    ) -> Res<(HandContext, DiscardCandidate)> {
        let mut wall = create_wall(rng);
        let mut hand = vec![];
        move_tiles(&mut wall, &mut hand, 14);
        hand.sort();
        let mut indicators = vec![];
        move_tiles(&mut wall, &mut indicators, 1);

        let prevalent_wind = rng.gen_range(WE..=WS);
        let seat_wind = rng.gen_range(WE..=WN);
        let mut ctx = HandContext::new(hand, vec![], prevalent_wind, seat_wind);
        ctx.dora_indicators = indicators;
        ctx.round_step = 1;
        ctx.remaining_tiles = wall.len().saturating_sub(DEAD_WALL - 1);
        ctx.validate()?;

        let discard = ai.choose_discard(&ctx)?;
        Ok((ctx, discard))
    }
}

#[test]
fn test_simulator_game() {
    let app = SimulatorApp::new(vec!["-s".to_string(), "1".to_string(), "-q".to_string()]);
    assert_eq!(app.seed, 1);
    assert!(app.quiet);

    let mut ai = Ai::new(AiConfig::default()).unwrap();
    let mut rng: StdRng = SeedableRng::seed_from_u64(app.seed);
    for _ in 0..20 {
        let (ctx, discard) = app.run_single_game(&mut ai, &mut rng).unwrap();
        assert_eq!(ctx.closed_hand.len(), 14);
        assert_eq!(ctx.remaining_tiles, TILE136 - 14 - DEAD_WALL);
        assert!(ctx.closed_hand.iter().any(|t| t.class() == discard.tile));
        assert!(discard.shanten >= ctx.shanten);
    }

    // 同じseedなら同じ結果
    let mut rng1: StdRng = SeedableRng::seed_from_u64(7);
    let mut rng2: StdRng = SeedableRng::seed_from_u64(7);
    let mut ai1 = Ai::new(AiConfig::default()).unwrap();
    let mut ai2 = Ai::new(AiConfig::default()).unwrap();
    let r1 = app.run_single_game(&mut ai1, &mut rng1).unwrap();
    let r2 = app.run_single_game(&mut ai2, &mut rng2).unwrap();
    assert_eq!(r1.0.closed_hand, r2.0.closed_hand);
    assert_eq!(r1.1, r2.1);
}
