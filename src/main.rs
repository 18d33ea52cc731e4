use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

mod decoder;
mod listing;
mod opcodes;
mod sprite;

use decoder::{Decoder, Policy};
use sprite::Glyphs;

#[derive(Parser, Debug)]
#[command(name = "c8dasm", about = "Disassembles a CHIP-8 program image.")]
struct Args {
    /// Program image to disassemble.
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// Address the image is loaded at (hex, `0x` optional).
    #[arg(long, value_name = "ADDR", default_value = "0x200", value_parser = parse_addr)]
    base: u16,

    /// Which instructions get a listing line.
    #[arg(long, value_enum, default_value_t = Policy::Strict)]
    policy: Policy,

    /// Don't preview sprite data under draw instructions.
    #[arg(long, default_value_t = false)]
    no_sprites: bool,

    /// Set and clear pixel glyphs, e.g. "#.".
    #[arg(long, value_name = "ONOFF", default_value = "1 ", value_parser = parse_glyphs)]
    glyphs: Glyphs,

    /// More log output (repeat for more).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("bad address {s:?}: {e}"))
}

fn parse_glyphs(s: &str) -> Result<Glyphs, String> {
    Glyphs::parse(s).ok_or_else(|| format!("expected exactly two characters, got {s:?}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let rom = args.rom.display();
    let image = fs::read(&args.rom).context(format!("reading {rom}"))?;
    log::info!("Loaded {rom} ({} bytes) at {:#05x}", image.len(), args.base);

    let decoder = Decoder::new(args.policy, args.glyphs);
    log::info!("Decoding with {:?} policy", decoder.policy());

    let options = listing::Options {
        base: args.base,
        sprites: !args.no_sprites,
    };
    let records = listing::disassemble(&image, &decoder, options)
        .with_context(|| format!("disassembling {rom}"))?;

    print!("{}", listing::render(&records));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_addresses() {
        assert_eq!(parse_addr("0x200"), Ok(0x200));
        assert_eq!(parse_addr("600"), Ok(0x600));
        assert!(parse_addr("0xZZ").is_err());
    }

    #[test]
    fn parses_cli() {
        let args = Args::try_parse_from([
            "c8dasm", "game.ch8", "--policy", "minimal", "--glyphs", "#.", "-vv",
        ])
        .unwrap();
        assert_eq!(args.base, 0x200);
        assert_eq!(args.policy, Policy::Minimal);
        assert_eq!(args.glyphs, Glyphs { on: '#', off: '.' });
        assert_eq!(args.verbose, 2);
        assert!(!args.no_sprites);

        let args = Args::try_parse_from(["c8dasm", "game.ch8"]).unwrap();
        assert_eq!(args.glyphs, Glyphs::default());
        assert_eq!(args.policy, Policy::Strict);
        assert!(Args::try_parse_from(["c8dasm", "game.ch8", "--glyphs", "#"]).is_err());
    }
}
