use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dmg_emu_core::{Cpu, Mmu};
use log::{debug, info};

mod config;

#[derive(Parser)]
#[command(version, about = "Run a DMG program image on an emulated LR35902")]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Path to config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only the last N executed instructions for the fault trace
    #[arg(long)]
    trace_depth: Option<usize>,

    /// Stop after this many CPU cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Enable debug logging of CPU state
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    let cfg = config::load_from_file(&config_path);
    debug!("Loaded config from {}: {cfg:?}", config_path.display());

    let rom = match std::fs::read(&args.rom) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load ROM {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} ({} bytes)", args.rom.display(), rom.len());

    let mut mmu = Mmu::new(rom);
    let mut cpu = Cpu::new();
    if let Some(depth) = args.trace_depth.or(cfg.trace_depth) {
        cpu = cpu.with_trace_depth(depth);
    }

    let mut executed: u64 = 0;
    loop {
        if let Some(max) = args.cycles
            && cpu.cycles >= max
        {
            info!("Cycle limit reached after {executed} instructions");
            info!("{}", cpu.debug_state());
            return ExitCode::SUCCESS;
        }

        if let Err(e) = cpu.step(&mut mmu) {
            print!("{}", cpu.trace());
            println!();
            println!("FATAL ERROR: {e} at PC: 0x{:04X}", e.pc());
            println!("{}", cpu.debug_state());
            return ExitCode::FAILURE;
        }

        executed += 1;
        if args.debug && cfg.debug_interval > 0 && executed % cfg.debug_interval == 0 {
            debug!("{}", cpu.debug_state());
        }
    }
}
