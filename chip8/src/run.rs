use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};

use chip8_core::{Chip8, Instruction, Keys, Status};
use display::Display;

use crate::debug;
use crate::keymap::KeyEvent;

/// Instructions a scripted key stays held for before it is released again
pub const KEY_HOLD_CYCLES: u64 = 30;

const NANOS: u128 = 1_000_000_000;

/// How the runner drives the machine
#[derive(Debug, Clone)]
pub struct Settings {
    /// Instructions per second
    pub ips: u32,
    /// Timer ticks per second
    pub timer_hz: u32,
    /// Stop after this many instructions
    pub cycles: Option<u64>,
    /// Don't sleep between instructions; time is derived from the instruction count instead
    pub fast: bool,
    /// Render the frame whenever it changes rather than once at the end
    pub live: bool,
    /// Wait for a line of input after every instruction; `q` quits
    pub step: bool,
    pub keys: Vec<KeyEvent>,
}

/// Why a run stopped without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The instruction limit was reached
    Limit(u64),
    /// The program jumped to itself
    Loop(u16),
    /// `Fx0A` is waiting and no scripted press is left to satisfy it
    Blocked(u8),
    /// Stepping was ended from the input
    Quit,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Halt::Limit(cycles) => write!(f, "stopped after {} instructions", cycles),
            Halt::Loop(addr) => write!(f, "program settled into a loop at {:#06X}", addr),
            Halt::Blocked(x) => write!(f, "V{:X} is waiting for a key that never comes", x),
            Halt::Quit => write!(f, "quit while stepping"),
        }
    }
}

/// Runs `chip8` until it halts or faults.
///
/// The instruction and timer clocks are independent: each instruction advances time by
/// `1 / ips`, and however many `1 / timer_hz` periods have elapsed since the start get ticked.
pub fn run(
    chip8: &mut Chip8,
    settings: &Settings,
    display: &mut Display,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Halt> {
    let ips = u128::from(settings.ips.max(1));
    let timer_hz = u128::from(settings.timer_hz);
    let start = Instant::now();

    let mut keys = Keys::new();
    let mut script: Vec<KeyEvent> = settings.keys.clone();
    script.sort_by_key(|event| event.cycle);
    let mut script: VecDeque<KeyEvent> = script.into();
    let mut held: Vec<(u64, u8)> = Vec::new();

    let mut ticks: u128 = 0;
    let mut sounding = false;
    let mut cycle: u64 = 0;

    loop {
        if settings.cycles.map_or(false, |limit| cycle >= limit) {
            return Ok(Halt::Limit(cycle));
        }

        // Handle input
        held.retain(|&(until, key)| {
            if until <= cycle {
                keys.release(key);
                false
            } else {
                true
            }
        });
        while script.front().map_or(false, |event| event.cycle <= cycle) {
            if let Some(event) = script.pop_front() {
                debug!("pressing key {:X} at cycle {}", event.key, cycle);
                keys.press(event.key);
                held.push((cycle + KEY_HOLD_CYCLES, event.key));
            }
        }

        // Update state
        let pc = chip8.state().pc();
        let status = chip8
            .step(&mut keys)
            .with_context(|| format!("halted at {:#06X} after {} instructions", pc, cycle))?;
        cycle += 1;
        match status {
            Status::Executed(Instruction::Jump { addr }) if addr == pc => {
                return Ok(Halt::Loop(pc));
            }
            Status::AwaitingKey { register } if script.is_empty() => {
                return Ok(Halt::Blocked(register));
            }
            _ => {}
        }

        let due = if settings.fast {
            u128::from(cycle) * timer_hz / ips
        } else {
            start.elapsed().as_nanos() * timer_hz / NANOS
        };
        while ticks < due {
            chip8.tick_timers();
            ticks += 1;
            if settings.live {
                if let Some(frame) = chip8.get_frame() {
                    display.render(frame, out)?;
                }
            }
        }
        if chip8.sound_active() != sounding {
            sounding = !sounding;
            info!("sound {}", if sounding { "on" } else { "off" });
        }

        if settings.step && !prompt(chip8, input, out)? {
            return Ok(Halt::Quit);
        }

        // Handle timing
        if !settings.fast {
            let target = Duration::from_nanos((u128::from(cycle) * NANOS / ips) as u64);
            let elapsed = start.elapsed();
            if target > elapsed {
                std::thread::sleep(target - elapsed);
            }
        }
    }
}

/// Shows where the machine stands and reads a line; `false` once the user quits.
fn prompt(chip8: &Chip8, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    out.write_all(debug::status(&chip8.snapshot()).as_bytes())?;
    out.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    Ok(read > 0 && line.trim() != "q")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8_core::Config;

    fn settings() -> Settings {
        Settings {
            ips: 600,
            timer_hz: 60,
            cycles: Some(1_000),
            fast: true,
            live: false,
            step: false,
            keys: Vec::new(),
        }
    }

    fn machine(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::new(Config::default().with_seed(0)).unwrap();
        chip8.load_program(program).unwrap();
        chip8
    }

    fn run_with(chip8: &mut Chip8, settings: &Settings) -> Result<Halt> {
        let mut out = Vec::new();
        run(chip8, settings, &mut Display::default(), &mut "".as_bytes(), &mut out)
    }

    #[test]
    fn test_stops_on_jump_to_self() {
        // ADD V0, 1; JP 0x202
        let mut chip8 = machine(&[0x70, 0x01, 0x12, 0x02]);
        assert_eq!(run_with(&mut chip8, &settings()).unwrap(), Halt::Loop(0x202));
        assert_eq!(chip8.state().v(0), 1);
    }

    #[test]
    fn test_stops_at_the_cycle_limit() {
        // ADD V0, 1; JP 0x200
        let mut chip8 = machine(&[0x70, 0x01, 0x12, 0x00]);
        let settings = Settings { cycles: Some(10), ..settings() };
        assert_eq!(run_with(&mut chip8, &settings).unwrap(), Halt::Limit(10));
        assert_eq!(chip8.state().v(0), 5);
    }

    #[test]
    fn test_timers_tick_at_their_own_rate() {
        // LD V0, 30; LD DT, V0; JP 0x204
        let mut chip8 = machine(&[0x60, 0x1E, 0xF0, 0x15, 0x12, 0x04, 0x12, 0x04]);
        let settings = Settings { cycles: Some(102), ..settings() };
        assert_eq!(run_with(&mut chip8, &settings).unwrap(), Halt::Limit(102));
        // 600 instructions per second against 60 ticks: one tick every 10 instructions
        assert_eq!(chip8.state().delay_timer(), 20);
    }

    #[test]
    fn test_scripted_key_resolves_wait() {
        // LD V5, K; JP 0x202
        let mut chip8 = machine(&[0xF5, 0x0A, 0x12, 0x02]);
        let settings = Settings {
            keys: vec![KeyEvent { cycle: 3, key: 0xB }],
            ..settings()
        };
        assert_eq!(run_with(&mut chip8, &settings).unwrap(), Halt::Loop(0x202));
        assert_eq!(chip8.state().v(5), 0xB);
    }

    #[test]
    fn test_wait_without_script_is_blocked() {
        let mut chip8 = machine(&[0xF5, 0x0A]);
        assert_eq!(run_with(&mut chip8, &settings()).unwrap(), Halt::Blocked(5));
    }

    #[test]
    fn test_fault_is_reported_with_context() {
        // SYS 0x123
        let mut chip8 = machine(&[0x01, 0x23]);
        let err = run_with(&mut chip8, &settings()).unwrap_err();
        assert!(err.to_string().starts_with("halted at 0x0200"));
    }

    #[test]
    fn test_live_mode_renders_changed_frames() {
        // LD F, V0; DRW V0, V0, 5; JP 0x204
        let mut chip8 = machine(&[0xF0, 0x29, 0xD0, 0x05, 0x12, 0x04]);
        let settings = Settings { live: true, cycles: Some(40), ..settings() };
        let mut out = Vec::new();
        let mut input = "".as_bytes();
        run(&mut chip8, &settings, &mut Display::default(), &mut input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("████"));
    }

    #[test]
    fn test_stepping_until_quit() {
        // ADD V0, 1; JP 0x200
        let mut chip8 = machine(&[0x70, 0x01, 0x12, 0x00]);
        let settings = Settings { step: true, ..settings() };
        let mut input = "\n\nq\n".as_bytes();
        let mut out = Vec::new();
        let halt = run(&mut chip8, &settings, &mut Display::default(), &mut input, &mut out);
        assert_eq!(halt.unwrap(), Halt::Quit);
        assert_eq!(chip8.state().v(0), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("PC 0x0202 [1200 JP 0x200]"));
    }

    #[test]
    fn test_stepping_stops_at_end_of_input() {
        let mut chip8 = machine(&[0x70, 0x01, 0x12, 0x00]);
        let settings = Settings { step: true, ..settings() };
        assert_eq!(run_with(&mut chip8, &settings).unwrap(), Halt::Quit);
        assert_eq!(chip8.state().v(0), 1);
    }
}
