use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedOpcode {
    pub opcode: u16,
    pub instr_type: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub kk: u8,
    pub nnn: u16,
}

impl DecodedOpcode {
    pub fn from(opcode: u16) -> Self {
        Self {
            opcode,
            instr_type: ((opcode & 0xF000) >> 12) as u8,
            x: ((opcode & 0x0F00) >> 8) as u8, // 2nd nibble
            y: ((opcode & 0x00F0) >> 4) as u8, // 3rd nibble
            n: (opcode & 0x000F) as u8,        // last nibble
            kk: (opcode & 0x00FF) as u8,       // last byte
            nnn: opcode & 0x0FFF,              // everything but the 1st nibble
        }
    }
}

/// One instruction family of the CHIP-8 set, named after its encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Cls, // 00E0
    Ret, // 00EE
    Sys, // 0NNN
    Jp, // 1NNN
    Call, // 2NNN
    SeByte, // 3XKK
    SneByte, // 4XKK
    SeReg, // 5XY0
    LdByte, // 6XKK
    AddByte, // 7XKK
    LdReg, // 8XY0
    Or, // 8XY1
    And, // 8XY2
    Xor, // 8XY3
    AddReg, // 8XY4
    Sub, // 8XY5
    Shr, // 8XY6
    Subn, // 8XY7
    Shl, // 8XYE
    SneReg, // 9XY0
    LdIndex, // ANNN
    JpV0,        // BNNN
    Rnd, // CXKK
    Draw, // DXYN
    Skp, // EX9E
    Sknp, // EXA1
    LdDelay, // FX07
    WaitKey, // FX0A
    SetDelay, // FX15
    SetSound, // FX18
    AddIndex, // FX1E
    SpriteAddr, // FX29
    Bcd, // FX33
    RegDump, // FX55
    RegLoad, // FX65
}

impl Op {
    /// Families printed by the minimal listing.
    pub fn is_core(self) -> bool {
        matches!(
            self,
            Op::Cls
                | Op::Ret
                | Op::Jp
                | Op::Call
                | Op::LdByte
                | Op::AddByte
                | Op::LdIndex
                | Op::Draw
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub mask: u16,
    pub pattern: u16,
    pub op: Op,
}

impl Rule {
    const fn new(mask: u16, pattern: u16, op: Op) -> Self {
        Self { mask, pattern, op }
    }

    pub fn matches(&self, opcode: u16) -> bool {
        opcode & self.mask == self.pattern
    }
}

// These collide with 0NNN, so they are looked up on the whole word before any mask is tried.
pub static FULL_WORD: phf::Map<u16, Op> = phf_map! {
    0x00E0u16 => Op::Cls,
    0x00EEu16 => Op::Ret,
};

// Narrowest masks first. Nibbles 5, 8, 9, E and F never appear under the bare 0xF000 mask.
pub static RULES: [Rule; 33] = [
    Rule::new(0xF00F, 0x5000, Op::SeReg),
    Rule::new(0xF00F, 0x8000, Op::LdReg),
    Rule::new(0xF00F, 0x8001, Op::Or),
    Rule::new(0xF00F, 0x8002, Op::And),
    Rule::new(0xF00F, 0x8003, Op::Xor),
    Rule::new(0xF00F, 0x8004, Op::AddReg),
    Rule::new(0xF00F, 0x8005, Op::Sub),
    Rule::new(0xF00F, 0x8006, Op::Shr),
    Rule::new(0xF00F, 0x8007, Op::Subn),
    Rule::new(0xF00F, 0x800E, Op::Shl),
    Rule::new(0xF00F, 0x9000, Op::SneReg),
    Rule::new(0xF0FF, 0xE09E, Op::Skp),
    Rule::new(0xF0FF, 0xE0A1, Op::Sknp),
    Rule::new(0xF0FF, 0xF007, Op::LdDelay),
    Rule::new(0xF0FF, 0xF00A, Op::WaitKey),
    Rule::new(0xF0FF, 0xF015, Op::SetDelay),
    Rule::new(0xF0FF, 0xF018, Op::SetSound),
    Rule::new(0xF0FF, 0xF01E, Op::AddIndex),
    Rule::new(0xF0FF, 0xF029, Op::SpriteAddr),
    Rule::new(0xF0FF, 0xF033, Op::Bcd),
    Rule::new(0xF0FF, 0xF055, Op::RegDump),
    Rule::new(0xF0FF, 0xF065, Op::RegLoad),
    Rule::new(0xF000, 0x0000, Op::Sys),
    Rule::new(0xF000, 0x1000, Op::Jp),
    Rule::new(0xF000, 0x2000, Op::Call),
    Rule::new(0xF000, 0x3000, Op::SeByte),
    Rule::new(0xF000, 0x4000, Op::SneByte),
    Rule::new(0xF000, 0x6000, Op::LdByte),
    Rule::new(0xF000, 0x7000, Op::AddByte),
    Rule::new(0xF000, 0xA000, Op::LdIndex),
    Rule::new(0xF000, 0xB000, Op::JpV0),
    Rule::new(0xF000, 0xC000, Op::Rnd),
    Rule::new(0xF000, 0xD000, Op::Draw),
];

/// Classifies a word. Full-word specials win over the rule table, and the
/// first matching rule wins within it.
pub fn classify(opcode: u16) -> Option<Op> {
    if let Some(op) = FULL_WORD.get(&opcode) {
        return Some(*op);
    }

    RULES.iter().find(|rule| rule.matches(opcode)).map(|rule| {
        log::trace!(
            "{:04X} matched {:04X}/{:04X} -> {:?}",
            opcode,
            rule.mask,
            rule.pattern,
            rule.op
        );
        rule.op
    })
}
