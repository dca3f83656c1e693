use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
    STACK_DEPTH,
};
use crate::error::{Error, Result};

/// Largest memory the 16-bit program counter can address
const MAX_MEMORY_SIZE: usize = 0x1_0000;

/// # Config
/// Machine dimensions and boot options. The defaults describe a standard 4K Chip-8.
///
/// ```
/// use chip8_core::Config;
///
/// let config = Config::default().with_seed(7).with_memory_size(2048);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub memory_size: usize,
    pub stack_depth: usize,
    pub display_width: usize,
    pub display_height: usize,
    pub program_start: u16,
    pub font_start: u16,
    pub load_font: bool,
    /// Fixed seed for `Cxkk`; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: MEMORY_SIZE,
            stack_depth: STACK_DEPTH,
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            program_start: PROGRAM_START,
            font_start: FONT_START,
            load_font: true,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }

    pub fn with_stack_depth(mut self, stack_depth: usize) -> Self {
        self.stack_depth = stack_depth;
        self
    }

    pub fn with_display(mut self, width: usize, height: usize) -> Self {
        self.display_width = width;
        self.display_height = height;
        self
    }

    pub fn with_program_start(mut self, program_start: u16) -> Self {
        self.program_start = program_start;
        self
    }

    pub fn with_font_start(mut self, font_start: u16) -> Self {
        self.font_start = font_start;
        self
    }

    pub fn with_font(mut self, load_font: bool) -> Self {
        self.load_font = load_font;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects machines that could never run a program.
    pub fn validate(&self) -> Result<()> {
        if self.memory_size == 0 || self.memory_size > MAX_MEMORY_SIZE {
            return Err(Error::InvalidConfig(format!(
                "memory size {} must be between 1 and {}",
                self.memory_size, MAX_MEMORY_SIZE
            )));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "display {}x{} has no pixels",
                self.display_width, self.display_height
            )));
        }
        if usize::from(self.program_start) >= self.memory_size {
            return Err(Error::InvalidConfig(format!(
                "program start {:#06X} lies outside {} bytes of memory",
                self.program_start, self.memory_size
            )));
        }
        if self.load_font && usize::from(self.font_start) + SPRITE_SHEET.len() > self.memory_size {
            return Err(Error::InvalidConfig(format!(
                "font at {:#06X} does not fit in {} bytes of memory",
                self.font_start, self.memory_size
            )));
        }
        Ok(())
    }
}
