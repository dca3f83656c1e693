use std::str::FromStr;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: char) -> Option<u8> {
    match key.to_ascii_uppercase() {
        'X' => Some(0x0),
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        'Q' => Some(0x4),
        'W' => Some(0x5),
        'E' => Some(0x6),
        'A' => Some(0x7),
        'S' => Some(0x8),
        'D' => Some(0x9),
        'Z' => Some(0xA),
        'C' => Some(0xB),
        '4' => Some(0xC),
        'R' => Some(0xD),
        'F' => Some(0xE),
        'V' => Some(0xF),
        _ => None,
    }
}

/// A scripted key press: `key` goes down once `cycle` instructions have run.
///
/// Written `CYCLE:KEY` where `KEY` is either a keyboard key from the layout above or a keypad
/// digit prefixed with `0x`, so `120:w` and `120:0x5` are the same press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub cycle: u64,
    pub key: u8,
}

impl FromStr for KeyEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cycle, key) = s
            .split_once(':')
            .ok_or_else(|| format!("expected CYCLE:KEY, got {:?}", s))?;
        let cycle = cycle
            .parse()
            .map_err(|e| format!("bad cycle {:?}: {}", cycle, e))?;
        let key = parse_key(key).ok_or_else(|| format!("unknown key {:?}", key))?;
        Ok(KeyEvent { cycle, key })
    }
}

fn parse_key(key: &str) -> Option<u8> {
    if let Some(digit) = key.strip_prefix("0x") {
        return u8::from_str_radix(digit, 16).ok().filter(|&key| key <= 0xF);
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => keymap(c),
        _ => None,
    }
}
