use rand::Rng;

use crate::constants::SPRITE_SIZE;
use crate::error::{Error, Result};
use crate::frame::FrameBuffer;
use crate::keypad::Keypad;
use crate::state::State;

/// What happens to the program counter once an operation has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Move on to the next instruction
    Next,
    /// Move past the next instruction
    Skip,
    /// The operation already set the program counter
    Jumped,
    /// Stay on this instruction until a key press can be stored in the register
    Wait(u8),
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

/// clear
pub fn clr(frame: &mut FrameBuffer) -> Result<Flow> {
    frame.clear();
    Ok(Flow::Next)
}

/// PC = STACK.pop(), then continue after the call
pub fn rts(state: &mut State) -> Result<Flow> {
    state.ret()?;
    Ok(Flow::Next)
}

/// machine code routine; there's no machine to run it on
pub fn sys(addr: u16) -> Result<Flow> {
    Err(Error::UnsupportedInstruction { opcode: addr })
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) -> Result<Flow> {
    state.jump(usize::from(addr))?;
    Ok(Flow::Jumped)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<Flow> {
    state.call(usize::from(addr))?;
    Ok(Flow::Jumped)
}

/// if Vx == kk then skip
pub fn ske(state: &State, x: u8, kk: u8) -> Result<Flow> {
    Ok(skip_if(state.v(x) == kk))
}

/// if Vx != kk then skip
pub fn skne(state: &State, x: u8, kk: u8) -> Result<Flow> {
    Ok(skip_if(state.v(x) != kk))
}

/// if Vx == Vy then skip
pub fn skre(state: &State, x: u8, y: u8) -> Result<Flow> {
    Ok(skip_if(state.v(x) == state.v(y)))
}

/// if Vx != Vy then skip
pub fn skrne(state: &State, x: u8, y: u8) -> Result<Flow> {
    Ok(skip_if(state.v(x) != state.v(y)))
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, kk: u8) -> Result<Flow> {
    state.set_v(x, kk);
    Ok(Flow::Next)
}

/// Vx += kk
/// Wraps around without touching VF
pub fn add(state: &mut State, x: u8, kk: u8) -> Result<Flow> {
    state.set_v(x, state.v(x).wrapping_add(kk));
    Ok(Flow::Next)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    state.set_v(x, state.v(y));
    Ok(Flow::Next)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    state.set_v(x, state.v(x) | state.v(y));
    Ok(Flow::Next)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    state.set_v(x, state.v(x) & state.v(y));
    Ok(Flow::Next)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    state.set_v(x, state.v(x) ^ state.v(y));
    Ok(Flow::Next)
}

// The flag is written before the result in the 8xy_ operations, so with x = F the result wins.

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    let (res, over) = state.v(x).overflowing_add(state.v(y));
    state.set_flag(over);
    state.set_v(x, res);
    Ok(Flow::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    let (res, under) = state.v(x).overflowing_sub(state.v(y));
    state.set_flag(!under);
    state.set_v(x, res);
    Ok(Flow::Next)
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: u8) -> Result<Flow> {
    let value = state.v(x);
    state.set_flag(value & 0x1 == 0x1);
    state.set_v(x, value >> 1);
    Ok(Flow::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: u8, y: u8) -> Result<Flow> {
    let (res, under) = state.v(y).overflowing_sub(state.v(x));
    state.set_flag(!under);
    state.set_v(x, res);
    Ok(Flow::Next)
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: u8) -> Result<Flow> {
    let value = state.v(x);
    state.set_flag(value & 0x80 == 0x80);
    state.set_v(x, value << 1);
    Ok(Flow::Next)
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Result<Flow> {
    state.set_i(addr);
    Ok(Flow::Next)
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) -> Result<Flow> {
    state.jump(usize::from(addr) + usize::from(state.v(0x0)))?;
    Ok(Flow::Jumped)
}

/// Vx = rand_byte & kk
pub fn rand<R: Rng + ?Sized>(state: &mut State, rng: &mut R, x: u8, kk: u8) -> Result<Flow> {
    let rand_byte: u8 = rng.gen();
    state.set_v(x, rand_byte & kk);
    Ok(Flow::Next)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite in memory I..I+n onto the FrameBuffer at Vx, Vy, wrapping on both axes.
/// Sets VF if any lit pixel was erased.
pub fn draw(state: &mut State, frame: &mut FrameBuffer, x: u8, y: u8, n: u8) -> Result<Flow> {
    let sprite = state
        .read_range(usize::from(state.i()), usize::from(n))?
        .to_vec();
    // VF is cleared before the coordinates are read, so `DFyn` draws at column 0
    state.set_flag(false);
    let x0 = usize::from(state.v(x));
    let y0 = usize::from(state.v(y));

    for (row, byte) in sprite.iter().enumerate() {
        for bit in 0..8 {
            let incoming = (byte >> (7 - bit)) & 0x1 == 0x1;
            let (px, py) = (x0 + bit, y0 + row);
            let existing = frame.get(px, py);
            let pixel = existing ^ incoming;
            if existing && !pixel {
                state.set_flag(true);
            }
            frame.set(px, py, pixel);
        }
    }
    Ok(Flow::Next)
}

/// if Vx.pressed then skip
pub fn skpr(state: &State, keypad: &dyn Keypad, x: u8) -> Result<Flow> {
    Ok(skip_if(keypad.is_pressed(state.v(x))))
}

/// if !Vx.pressed then skip
pub fn skup(state: &State, keypad: &dyn Keypad, x: u8) -> Result<Flow> {
    Ok(skip_if(!keypad.is_pressed(state.v(x))))
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) -> Result<Flow> {
    state.set_v(x, state.delay_timer());
    Ok(Flow::Next)
}

/// await keypress for Vx
pub fn keyd(state: &mut State, keypad: &mut dyn Keypad, x: u8) -> Result<Flow> {
    match keypad.next_press() {
        Some(key) => {
            state.set_v(x, key);
            Ok(Flow::Next)
        }
        None => Ok(Flow::Wait(x)),
    }
}

/// DT = Vx
pub fn loads(state: &mut State, x: u8) -> Result<Flow> {
    state.set_delay_timer(state.v(x));
    Ok(Flow::Next)
}

/// ST = Vx
pub fn ld(state: &mut State, x: u8) -> Result<Flow> {
    state.set_sound_timer(state.v(x));
    Ok(Flow::Next)
}

/// I += Vx
pub fn addi(state: &mut State, x: u8) -> Result<Flow> {
    state.set_i(state.i().wrapping_add(u16::from(state.v(x))));
    Ok(Flow::Next)
}

/// I = font + Vx * 5
/// Set I to the memory address of the sprite for digit Vx, see constants::SPRITE_SHEET
pub fn ldspr(state: &mut State, font_start: u16, x: u8) -> Result<Flow> {
    let offset = u16::from(state.v(x)) * SPRITE_SIZE;
    state.set_i(font_start.wrapping_add(offset));
    Ok(Flow::Next)
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(state: &mut State, x: u8) -> Result<Flow> {
    let value = state.v(x);
    let digits = [value / 100, value / 10 % 10, value % 10];
    state.write_range(usize::from(state.i()), &digits)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: u8) -> Result<Flow> {
    let values = state.registers(x).to_vec();
    state.write_range(usize::from(state.i()), &values)?;
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: u8) -> Result<Flow> {
    let values = state
        .read_range(usize::from(state.i()), usize::from(x) + 1)?
        .to_vec();
    state.set_registers(&values);
    Ok(Flow::Next)
}
