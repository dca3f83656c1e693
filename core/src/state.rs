use crate::constants::FLAG_REGISTER;
use crate::error::{Error, Result};
use crate::opcode;

/// # Memory & Register State
///
/// ## CPU
/// Registers
/// - (v) 16 8-bit registers V0..VF; VF doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, two bytes per instruction
///
/// Stack
/// - a fixed depth of saved return addresses and the (sp) pointing past the newest one
///
/// Timers
/// - 2 8-bit countdown timers (delay & sound), ticked by the host at 60Hz
///
/// ## Memory
/// - `memory_size` bytes, 4096 on a standard machine
///
/// Every access is bounds checked: stepping off the end of memory or the stack is an error,
/// nothing wraps around.
#[derive(Debug, Clone)]
pub struct State {
    memory: Vec<u8>,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: Vec<u16>,
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
}

/// An owned copy of everything in `State`, for debuggers and dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub memory: Vec<u8>,
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    /// Saved return addresses, oldest first
    pub stack: Vec<u16>,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl State {
    pub fn new(memory_size: usize, stack_depth: usize) -> Self {
        State {
            memory: vec![0; memory_size],
            v: [0; 16],
            i: 0,
            pc: 0,
            stack: vec![0; stack_depth],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// Copies `data` into memory starting at `at`, returning the address just past the last byte.
    /// Nothing is written if any byte would fall outside memory.
    pub fn load(&mut self, data: &[u8], at: u16) -> Result<usize> {
        let start = usize::from(at);
        let end = start + data.len();
        if end > self.memory.len() {
            return Err(Error::OutOfMemory {
                address: start.max(self.memory.len()),
            });
        }
        self.memory[start..end].copy_from_slice(data);
        Ok(end)
    }

    /// Reads the big-endian instruction at the program counter.
    ///
    /// The slot after the instruction has to exist too, so a program can always advance past
    /// whatever it just fetched.
    pub fn fetch(&self) -> Result<u16> {
        let pc = usize::from(self.pc);
        self.check_pc(pc + 2)?;
        Ok(opcode::from_bytes(self.memory[pc], self.memory[pc + 1]))
    }

    /// Moves to the next instruction.
    pub fn advance(&mut self) -> Result<()> {
        let next = usize::from(self.pc) + 2;
        self.check_pc(next)?;
        self.pc = next as u16;
        Ok(())
    }

    /// Moves past the next instruction.
    pub fn skip(&mut self) -> Result<()> {
        let next = usize::from(self.pc) + 4;
        self.check_pc(next)?;
        self.pc = next as u16;
        Ok(())
    }

    pub fn jump(&mut self, address: usize) -> Result<()> {
        self.check_pc(address)?;
        self.pc = address as u16;
        Ok(())
    }

    /// Saves the current program counter and jumps to `address`.
    pub fn call(&mut self, address: usize) -> Result<()> {
        if self.sp >= self.stack.len() {
            return Err(Error::StackOverflow { depth: self.sp });
        }
        self.check_pc(address)?;
        self.stack[self.sp] = self.pc;
        self.sp += 1;
        self.pc = address as u16;
        Ok(())
    }

    /// Restores the program counter saved by the matching `call`.
    pub fn ret(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp];
        Ok(())
    }

    /// Counts both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Error::OutOfMemory { address })
    }

    pub fn read_range(&self, address: usize, len: usize) -> Result<&[u8]> {
        self.check_range(address, len)?;
        Ok(&self.memory[address..address + len])
    }

    /// Writes all of `data` at `address` or, if it doesn't fit, nothing.
    pub fn write_range(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.check_range(address, data.len())?;
        self.memory[address..address + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// # Panics
    /// If `x` isn't a register index `0x0..=0xF`.
    pub fn v(&self, x: u8) -> u8 {
        self.v[usize::from(x)]
    }

    /// # Panics
    /// If `x` isn't a register index `0x0..=0xF`.
    pub fn set_v(&mut self, x: u8, value: u8) {
        self.v[usize::from(x)] = value;
    }

    /// V0..=Vx
    pub fn registers(&self, x: u8) -> &[u8] {
        &self.v[..=usize::from(x)]
    }

    pub fn set_registers(&mut self, values: &[u8]) {
        self.v[..values.len()].copy_from_slice(values);
    }

    pub fn flag(&self) -> u8 {
        self.v[usize::from(FLAG_REGISTER)]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[usize::from(FLAG_REGISTER)] = u8::from(set);
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory_size(&self) -> usize {
        self.memory.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.memory.clone(),
            v: self.v,
            i: self.i,
            pc: self.pc,
            stack: self.stack[..self.sp].to_vec(),
            sp: self.sp,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
        }
    }

    fn check_pc(&self, address: usize) -> Result<()> {
        if address < self.memory.len() {
            Ok(())
        } else {
            Err(Error::OutOfMemory { address })
        }
    }

    fn check_range(&self, address: usize, len: usize) -> Result<()> {
        if address + len <= self.memory.len() {
            Ok(())
        } else {
            Err(Error::OutOfMemory {
                address: address.max(self.memory.len()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::new(4096, 16)
    }

    #[test]
    fn test_load_returns_end_address() {
        let mut state = state();
        assert_eq!(state.load(&[0xAA, 0xBB, 0xCC], 0x200), Ok(0x203));
        assert_eq!(state.read_range(0x200, 3), Ok(&[0xAA, 0xBB, 0xCC][..]));
    }

    #[test]
    fn test_load_fills_memory_exactly() {
        let mut state = state();
        assert_eq!(state.load(&[0x1; 2], 4094), Ok(4096));
    }

    #[test]
    fn test_load_past_end_writes_nothing() {
        let mut state = state();
        assert_eq!(
            state.load(&[0x1; 4], 4094),
            Err(Error::OutOfMemory { address: 4096 })
        );
        assert_eq!(state.read(4094), Ok(0));
    }

    #[test]
    fn test_fetch_is_big_endian() {
        let mut state = state();
        state.load(&[0xAA, 0xBB], 0x200).unwrap();
        state.jump(0x200).unwrap();
        assert_eq!(state.fetch(), Ok(0xAABB));
    }

    #[test]
    fn test_advance_moves_two_bytes() {
        let mut state = state();
        state.advance().unwrap();
        assert_eq!(state.pc(), 0x2);
    }

    #[test]
    fn test_end_of_memory_does_not_wrap() {
        let mut state = state();
        state.jump(4094).unwrap();
        assert_eq!(state.advance(), Err(Error::OutOfMemory { address: 4096 }));
        assert_eq!(state.fetch(), Err(Error::OutOfMemory { address: 4096 }));
        assert_eq!(state.pc(), 4094);
    }

    #[test]
    fn test_skip_checks_bounds() {
        let mut state = state();
        state.jump(4092).unwrap();
        assert!(state.skip().is_err());
        assert_eq!(state.pc(), 4092);
        state.jump(0x200).unwrap();
        state.skip().unwrap();
        assert_eq!(state.pc(), 0x204);
    }

    #[test]
    fn test_jump_out_of_bounds() {
        let mut state = state();
        assert_eq!(state.jump(4096), Err(Error::OutOfMemory { address: 4096 }));
        assert_eq!(state.pc(), 0);
    }

    #[test]
    fn test_call_and_return() {
        let mut state = state();
        state.jump(0x200).unwrap();
        state.call(0x300).unwrap();
        assert_eq!(state.pc(), 0x300);
        assert_eq!(state.sp(), 1);
        state.ret().unwrap();
        assert_eq!(state.pc(), 0x200);
        assert_eq!(state.sp(), 0);
    }

    #[test]
    fn test_stack_depth() {
        let mut state = state();
        for _ in 0..16 {
            state.call(0x200).unwrap();
        }
        assert_eq!(state.call(0x200), Err(Error::StackOverflow { depth: 16 }));
        assert_eq!(state.sp(), 16);
        for _ in 0..16 {
            state.ret().unwrap();
        }
        assert_eq!(state.ret(), Err(Error::StackUnderflow));
        assert_eq!(state.sp(), 0);
    }

    #[test]
    fn test_call_out_of_bounds_pushes_nothing() {
        let mut state = state();
        assert!(state.call(0x2000).is_err());
        assert_eq!(state.sp(), 0);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut state = state();
        state.set_delay_timer(2);
        state.set_sound_timer(1);
        assert!(state.sound_active());
        state.tick_timers();
        assert_eq!(state.delay_timer(), 1);
        assert_eq!(state.sound_timer(), 0);
        assert!(!state.sound_active());
        state.tick_timers();
        state.tick_timers();
        assert_eq!(state.delay_timer(), 0);
        assert_eq!(state.sound_timer(), 0);
    }

    #[test]
    fn test_write_range_is_all_or_nothing() {
        let mut state = state();
        assert!(state.write_range(4095, &[1, 2]).is_err());
        assert_eq!(state.read(4095), Ok(0));
        assert_eq!(state.read(4096), Err(Error::OutOfMemory { address: 4096 }));
    }

    #[test]
    fn test_flag_register() {
        let mut state = state();
        state.set_flag(true);
        assert_eq!(state.v(0xF), 1);
        state.set_flag(false);
        assert_eq!(state.flag(), 0);
    }

    #[test]
    fn test_snapshot_only_holds_live_stack() {
        let mut state = state();
        state.jump(0x202).unwrap();
        state.call(0x300).unwrap();
        state.set_v(3, 0x42);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.stack, vec![0x202]);
        assert_eq!(snapshot.pc, 0x300);
        assert_eq!(snapshot.v[3], 0x42);
        assert_eq!(snapshot.memory.len(), 4096);
    }
}
