use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::SPRITE_SHEET;
use crate::error::Result;
use crate::frame::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::operations::{self, Flow};
use crate::state::{Snapshot, State};

/// Outcome of a single `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The instruction ran to completion
    Executed(Instruction),
    /// `Fx0A` is waiting for a key press; the program counter hasn't moved
    AwaitingKey { register: u8 },
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the memory & register `state`
///  - the `frame` buffer that drawing instructions mutate
///  - a random number generator for `Cxkk`
///
/// Supplies interfaces for:
/// - loading programs
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// The two clocks are entirely the caller's business: `step` as often as the CPU should run and
/// `tick_timers` at 60Hz, in whatever ratio the host ends up with.
pub struct Chip8 {
    config: Config,
    state: State,
    frame: FrameBuffer,
    rng: StdRng,
}

impl Chip8 {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut chip8 = Chip8 {
            state: State::new(config.memory_size, config.stack_depth),
            frame: FrameBuffer::new(config.display_width, config.display_height),
            config,
            rng,
        };
        chip8.boot()?;
        Ok(chip8)
    }

    /// Clears memory, registers and the display, keeping the configuration.
    /// A program has to be loaded again afterwards.
    pub fn reset(&mut self) -> Result<()> {
        debug!("resetting");
        self.state = State::new(self.config.memory_size, self.config.stack_depth);
        self.frame = FrameBuffer::new(self.config.display_width, self.config.display_height);
        self.boot()
    }

    fn boot(&mut self) -> Result<()> {
        if self.config.load_font {
            self.state.load(&SPRITE_SHEET, self.config.font_start)?;
            debug!("loaded font at {:#06X}", self.config.font_start);
        }
        self.state.jump(usize::from(self.config.program_start))
    }

    /// Copies a program into memory at the program start and points the CPU at it.
    /// Returns the address just past the program.
    pub fn load_program(&mut self, program: &[u8]) -> Result<usize> {
        let start = self.config.program_start;
        let end = self.state.load(program, start)?;
        self.state.jump(usize::from(start))?;
        debug!(
            "loaded {} byte program at {:#06X}..{:#06X}",
            program.len(),
            start,
            end
        );
        Ok(end)
    }

    /// Fetches, decodes and executes the instruction at the program counter.
    pub fn step(&mut self, keypad: &mut dyn Keypad) -> Result<Status> {
        let op = self.state.fetch()?;
        let instruction = Instruction::decode(op)?;
        trace!(
            "{:04X} {:04X} {:<16} i{:04X} v{:02X?}",
            self.state.pc(),
            op,
            instruction.to_string(),
            self.state.i(),
            self.state.registers(0xF)
        );

        match self.execute(instruction, keypad)? {
            Flow::Next => self.state.advance()?,
            Flow::Skip => self.state.skip()?,
            Flow::Jumped => {}
            Flow::Wait(register) => {
                trace!("waiting for a key press for V{:X}", register);
                return Ok(Status::AwaitingKey { register });
            }
        }
        Ok(Status::Executed(instruction))
    }

    fn execute(&mut self, instruction: Instruction, keypad: &mut dyn Keypad) -> Result<Flow> {
        let state = &mut self.state;
        match instruction {
            Instruction::ClearScreen => operations::clr(&mut self.frame),
            Instruction::Return => operations::rts(state),
            Instruction::Sys { addr } => operations::sys(addr),
            Instruction::Jump { addr } => operations::jump(state, addr),
            Instruction::Call { addr } => operations::call(state, addr),
            Instruction::SkipEqImm { x, kk } => operations::ske(state, x, kk),
            Instruction::SkipNeImm { x, kk } => operations::skne(state, x, kk),
            Instruction::SkipEqReg { x, y } => operations::skre(state, x, y),
            Instruction::LoadImm { x, kk } => operations::load(state, x, kk),
            Instruction::AddImm { x, kk } => operations::add(state, x, kk),
            Instruction::Move { x, y } => operations::mv(state, x, y),
            Instruction::Or { x, y } => operations::or(state, x, y),
            Instruction::And { x, y } => operations::and(state, x, y),
            Instruction::Xor { x, y } => operations::xor(state, x, y),
            Instruction::AddReg { x, y } => operations::addr(state, x, y),
            Instruction::Sub { x, y } => operations::sub(state, x, y),
            Instruction::ShiftRight { x } => operations::shr(state, x),
            Instruction::SubN { x, y } => operations::subn(state, x, y),
            Instruction::ShiftLeft { x } => operations::shl(state, x),
            Instruction::SkipNeReg { x, y } => operations::skrne(state, x, y),
            Instruction::LoadI { addr } => operations::loadi(state, addr),
            Instruction::JumpOffset { addr } => operations::jumpi(state, addr),
            Instruction::Random { x, kk } => operations::rand(state, &mut self.rng, x, kk),
            Instruction::Draw { x, y, n } => operations::draw(state, &mut self.frame, x, y, n),
            Instruction::SkipKeyPressed { x } => operations::skpr(state, keypad, x),
            Instruction::SkipKeyNotPressed { x } => operations::skup(state, keypad, x),
            Instruction::LoadDelay { x } => operations::moved(state, x),
            Instruction::WaitKey { x } => operations::keyd(state, keypad, x),
            Instruction::SetDelay { x } => operations::loads(state, x),
            Instruction::SetSound { x } => operations::ld(state, x),
            Instruction::AddI { x } => operations::addi(state, x),
            Instruction::LoadFont { x } => operations::ldspr(state, self.config.font_start, x),
            Instruction::StoreBcd { x } => operations::bcd(state, x),
            Instruction::StoreRegisters { x } => operations::stor(state, x),
            Instruction::LoadRegisters { x } => operations::read(state, x),
        }
    }

    /// Counts the delay and sound timers down; call at 60Hz.
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Whether the sound timer is running, i.e. a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_active()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.frame.take_dirty() {
            Some(&self.frame)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
