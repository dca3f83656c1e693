use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use chip8_core::constants::TIMER_HZ;
use chip8_core::{Chip8, Config};
use display::Display;

mod debug;
mod keymap;
mod run;

use keymap::KeyEvent;
use run::{Halt, Settings};

/// Runs a Chip-8 ROM in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    ips: u32,

    /// Delay and sound timer ticks per second
    #[arg(long, default_value_t = TIMER_HZ)]
    timer_hz: u32,

    /// Stop after this many instructions
    #[arg(short, long)]
    cycles: Option<u64>,

    /// Seed for the random number generator behind `Cxkk`
    #[arg(long)]
    seed: Option<u64>,

    /// Run as fast as possible instead of at `--ips`
    #[arg(short, long)]
    fast: bool,

    /// Redraw the screen whenever it changes
    #[arg(short, long)]
    live: bool,

    /// Press a key once CYCLE instructions have run, e.g. `120:w` or `120:0x5`
    #[arg(short, long = "key", value_name = "CYCLE:KEY")]
    keys: Vec<KeyEvent>,

    /// Pause after every instruction until Enter is pressed; `q` dumps and quits
    #[arg(short, long)]
    step: bool,

    /// Print registers, stack and memory once the run ends
    #[arg(short, long)]
    dump: bool,

    /// Log every executed instruction
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let rom = fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;

    let mut config = Config::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut chip8 = Chip8::new(config)?;
    let size = chip8
        .load_program(&rom)
        .with_context(|| format!("unable to load ROM {}", args.rom.display()))?;
    info!("loaded {} bytes from {}", size, args.rom.display());

    let settings = Settings {
        ips: args.ips,
        timer_hz: args.timer_hz,
        cycles: args.cycles,
        fast: args.fast,
        live: args.live,
        step: args.step,
        keys: args.keys,
    };
    let mut display = Display::default();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = run::run(&mut chip8, &settings, &mut display, &mut input, &mut out);
    if !settings.live || result.is_err() {
        display.render(chip8.frame(), &mut out)?;
    }
    let quit = matches!(result, Ok(Halt::Quit));
    if args.dump || quit {
        out.write_all(debug::dump(&chip8.snapshot()).as_bytes())?;
    }

    match result {
        Ok(halt) => {
            info!("{}", halt);
            Ok(())
        }
        Err(err) => {
            error!("{:#}", err);
            Err(err)
        }
    }
}
