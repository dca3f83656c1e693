//! A Chip-8 virtual CPU: memory and registers, a wrapping monochrome frame buffer and an
//! instruction engine that steps through programs one instruction at a time.
//!
//! Hosts drive the machine. They call [`Chip8::step`] at their chosen instruction rate,
//! [`Chip8::tick_timers`] at 60Hz, feed key state through a [`Keypad`] and read the
//! [`FrameBuffer`] back for display.
//!
//! ```
//! use chip8_core::{Chip8, Config, Keys};
//!
//! let mut chip8 = Chip8::new(Config::default()).unwrap();
//! // LD V0, 10; ADD V0, 5
//! chip8.load_program(&[0x60, 0x0A, 0x70, 0x05]).unwrap();
//! let mut keys = Keys::new();
//! chip8.step(&mut keys).unwrap();
//! chip8.step(&mut keys).unwrap();
//! assert_eq!(chip8.state().v(0x0), 15);
//! ```

pub use crate::chip8::{Chip8, Status};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::frame::FrameBuffer;
pub use crate::instruction::Instruction;
pub use crate::keypad::{Keypad, Keys};
pub use crate::state::{Snapshot, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod frame;
mod instruction;
mod keypad;
pub mod opcode;
mod operations;
mod state;
