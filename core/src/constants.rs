/// Bytes of addressable memory on a standard Chip-8
pub const MEMORY_SIZE: usize = 4096;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// The display is 64 pixels wide and 32 tall
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// ROMs are conventionally loaded at 0x200, everything below that belonged to the interpreter
pub const PROGRAM_START: u16 = 0x200;

/// The built-in sprite sheet lives at the very start of memory
pub const FONT_START: u16 = 0x000;

/// Each hex digit sprite is 5 rows tall
pub const SPRITE_SIZE: u16 = 5;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG_REGISTER: u8 = 0xF;

/// Number of keys on the hex keypad
pub const KEY_COUNT: usize = 16;

/// Timers count down at 60Hz independently of the CPU
pub const TIMER_HZ: u32 = 60;

/// # Sprite Sheet
/// One 8x5 sprite for each hexadecimal digit 0..F.
///
/// Only the high nibble of each row is lit, e.g. `0`:
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
