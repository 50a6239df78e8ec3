//! # Model Forge
//!
//! Command-line tool that turns a model config or a statistics capture into
//! a byte descriptor peers can load with `Model::from_descriptor`.

use std::process::ExitCode;

use tickpack_codec::huffman::{kraft_sum, KRAFT_ONE};
use tickpack_codec::{CodecResult, Model, ModelConfig, SymbolStatistics, ALPHABET_SIZE, MAX_CODE_LENGTH};

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         TICKPACK MODEL FORGE                                     ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: tickpack_model <config.toml | stats.toml> [options]");
        println!();
        println!("Options:");
        println!("  --stats        Input is a symbol statistics capture");
        println!("  --out <file>   Write the byte descriptor to <file>");
        return ExitCode::SUCCESS;
    }

    let input = &args[1];
    let from_stats = args.contains(&"--stats".to_string());
    let out = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1));

    match run(input, from_stats, out.map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &str, from_stats: bool, out: Option<&str>) -> CodecResult<()> {
    println!("Loading {}: {}", if from_stats { "statistics" } else { "config" }, input);

    let (descriptor, contexts) = if from_stats {
        let stats = SymbolStatistics::load(input)?;
        for context in 0..stats.contexts() {
            println!("  context {:>3}: {:>10} samples", context, stats.total(context));
        }
        (stats.to_descriptor(MAX_CODE_LENGTH), stats.contexts())
    } else {
        let config = ModelConfig::load(input)?;
        (config.to_descriptor()?, config.contexts)
    };

    let model = Model::new(&descriptor, contexts)?;

    println!();
    println!("┌─ CODE LENGTHS ─────────────────────────────────────────────────┐");
    for context in 0..model.contexts() {
        let lengths: Vec<u8> = (0..ALPHABET_SIZE)
            .map(|symbol| model.code_length(context, symbol))
            .collect();
        let kraft = kraft_sum(&lengths) as f64 / KRAFT_ONE as f64;
        let tuned = descriptor
            .overrides
            .iter()
            .any(|o| usize::from(o.context) == context);
        println!(
            "│ ctx {:>3} {:?} kraft={:.3}{}",
            context,
            lengths,
            kraft,
            if tuned { " *" } else { "" }
        );
    }
    println!("└────────────────────────────────────────────────────────────────┘");

    let bytes = descriptor.to_bytes();
    match out {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            println!("Wrote {} byte descriptor to {}", bytes.len(), path);
        }
        None => println!("Descriptor: {} bytes (use --out to save)", bytes.len()),
    }

    Ok(())
}
