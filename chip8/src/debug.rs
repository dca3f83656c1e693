use chip8_core::opcode::from_bytes;
use chip8_core::{Instruction, Snapshot};

const ROW: usize = 16;

/// One line with the program counter, the instruction it points at, I, SP and the timers.
pub fn status(snapshot: &Snapshot) -> String {
    let pc = usize::from(snapshot.pc);
    let next = match (snapshot.memory.get(pc), snapshot.memory.get(pc + 1)) {
        (Some(&high), Some(&low)) => {
            let op = from_bytes(high, low);
            match Instruction::decode(op) {
                Ok(instruction) => format!("{:04X} {}", op, instruction),
                Err(_) => format!("{:04X} ???", op),
            }
        }
        _ => "----".to_string(),
    };
    format!(
        "PC {:#06X} [{}]  I {:#06X}  SP {}  DT {}  ST {}\n",
        snapshot.pc, next, snapshot.i, snapshot.sp, snapshot.delay_timer, snapshot.sound_timer
    )
}

/// Formats registers, stack, timers and every memory row that isn't all zeros.
pub fn dump(snapshot: &Snapshot) -> String {
    let mut out = status(snapshot);

    let registers: Vec<String> = snapshot
        .v
        .iter()
        .enumerate()
        .map(|(index, value)| format!("V{:X} {:02X}", index, value))
        .collect();
    out.push_str(&format!("{}\n", registers.join(" ")));

    let stack: Vec<String> = snapshot.stack.iter().map(|addr| format!("{:#06X}", addr)).collect();
    out.push_str(&format!("stack [{}]\n", stack.join(", ")));

    for (row, bytes) in snapshot.memory.chunks(ROW).enumerate() {
        if bytes.iter().all(|&byte| byte == 0) {
            continue;
        }
        let hex: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
        out.push_str(&format!("{:#06X}: {}\n", row * ROW, hex.join(" ")));
    }
    out
}
