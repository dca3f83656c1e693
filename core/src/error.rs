use thiserror::Error;

/// Faults raised while loading or executing a Chip-8 program.
///
/// Every variant is fatal to the `step` that produced it; deciding whether to halt, reset or
/// report is left to whoever drives the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfMemory { address: usize },

    #[error("stack overflow: call with {depth} return addresses already saved")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unsupported instruction {opcode:#06X}")]
    UnsupportedInstruction { opcode: u16 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
