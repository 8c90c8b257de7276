use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use emuchip::{timer::TIMER_TICKS_PER_SECOND, Config, Emulator};
use log::info;

mod sound;
mod window;

use sound::Sound;
use window::Window;

// Separately:
// CPU: cycles_per_frame * 60 times per second
// Display: 60 times per second
// Timer: 60 times per second

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    #[arg(short, long, default_value_t = 10, help = "Instructions executed per 60Hz frame")]
    cycles_per_frame: u32,

    #[arg(long, help = "Seed for the random number instruction")]
    seed: Option<u64>,

    #[arg(long, help = "Abandon a wait for a key after this many instructions")]
    key_wait_timeout: Option<u32>,

    #[arg(long, default_value_t = 16, help = "Window scale (1, 2, 4, 8, 16 or 32)")]
    scale: u8,

    #[arg(long, help = "Run without sound")]
    mute: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("reading {}", args.rom.display()))?;

    let config = Config {
        seed: args.seed,
        key_wait_timeout: args.key_wait_timeout,
    };
    let mut emu = Emulator::new(config);
    emu.load_program(&program)?;
    info!("loaded {} ({} bytes)", args.rom.display(), program.len());

    let mut window = Window::new(args.scale)?;
    let mut sound = if args.mute { None } else { Some(Sound::new()?) };

    let frame = Duration::from_micros(1_000_000 / TIMER_TICKS_PER_SECOND);
    let mut last_frame = Instant::now();

    while window.is_open() {
        let (down, up) = window.key_events();
        for symbol in down {
            emu.press_symbol(symbol);
        }
        for symbol in up {
            emu.release_symbol(symbol);
        }

        if last_frame.elapsed() >= frame {
            last_frame = Instant::now();
            for _ in 0..args.cycles_per_frame {
                emu.step()?;
            }
            let beeping = emu.tick_timers();
            if let Some(sound) = sound.as_mut() {
                sound.set_playing(beeping);
            }
        }

        window.sync(&mut emu.screen)?;
    }

    Ok(())
}
