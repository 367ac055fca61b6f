use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use ringflow::flow::{BlockDefinition, GraphFlow, Position};
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate random call flows for exercising the compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Number of blocks in the flow
    #[arg(short, long, default_value_t = 12)]
    blocks: usize,

    /// Probability that a connection points back to an earlier block
    #[arg(long, default_value_t = 0.2)]
    cycle_rate: f64,

    /// Probability that a connection points to a block that does not exist
    #[arg(long, default_value_t = 0.05)]
    dangling_rate: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const BLOCK_TYPES: &[&str] = &[
    "say", "say", "pause", "play", "record", "sms", "forward", "gather", "hangup",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.cycle_rate) || !(0.0..=1.0).contains(&cli.dangling_rate) {
        eprintln!("Error: --cycle-rate and --dangling-rate must be between 0 and 1");
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating a flow with {} blocks...", cli.blocks);

    let blocks = (0..cli.blocks)
        .map(|index| generate_block(&mut rng, index, &cli))
        .collect();
    let flow = GraphFlow { blocks };

    let json_output = serde_json::to_string_pretty(&flow)?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved flow to '{}'", cli.output);
    Ok(())
}

fn generate_block(rng: &mut StdRng, index: usize, cli: &Cli) -> BlockDefinition {
    let block_type = BLOCK_TYPES.choose(rng).copied().unwrap_or("say");

    let connections = if index + 1 == cli.blocks && !rng.random_bool(cli.cycle_rate) {
        Vec::new()
    } else if rng.random_bool(cli.dangling_rate) {
        vec![format!("missing-{}", index)]
    } else if index > 0 && rng.random_bool(cli.cycle_rate) {
        vec![block_id(rng.random_range(0..index))]
    } else if index + 1 < cli.blocks {
        vec![block_id(index + 1)]
    } else {
        vec![block_id(0)]
    };

    BlockDefinition {
        id: block_id(index),
        block_type: block_type.to_string(),
        config: generate_config(rng, block_type),
        connections,
        position: Some(Position {
            x: (index % 4) as f64 * 240.0,
            y: (index / 4) as f64 * 160.0,
        }),
    }
}

fn generate_config(rng: &mut StdRng, block_type: &str) -> Map<String, Value> {
    let config = match block_type {
        "say" => json!({
            "text": format!("Message number {}", rng.random_range(1..100)),
            "speed": rng.random_range(0.25..2.5),
        }),
        "pause" => json!({ "duration": rng.random_range(1..5) }),
        "play" => json!({ "url": "https://cdn.example.com/audio/jingle.mp3" }),
        "record" => json!({ "prompt": "Please leave a message after the tone." }),
        "sms" => json!({ "message": "Thanks for calling!" }),
        "forward" => json!({
            "number": format!("+1555{:07}", rng.random_range(0..10_000_000)),
            "timeout": rng.random_range(10..60),
        }),
        "gather" => json!({ "prompt": "Press 1 to continue." }),
        _ => json!({}),
    };
    match config {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn block_id(index: usize) -> String {
    format!("block-{}", index)
}
