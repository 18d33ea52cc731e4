use std::fmt;

use crate::opcodes::{classify, DecodedOpcode, Op};
use crate::sprite::Glyphs;

/// What happens to words outside the rendered instruction set.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Render the full instruction set and mark anything else as unrecognized.
    #[default]
    Strict,
    /// Render only the core families; everything else produces no output.
    Minimal,
}

/// Read-only view of the loaded image, used to preview draw sprites.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub image: &'a [u8],
    pub base: u16,
    pub index: u16,
}

impl<'a> DecodeContext<'a> {
    /// The `n` bytes at the index register, clipped to the image.
    pub fn sprite_bytes(&self, n: u8) -> &'a [u8] {
        let Some(offset) = self.index.checked_sub(self.base) else {
            return &[];
        };
        let start = (offset as usize).min(self.image.len());
        let end = (start + n as usize).min(self.image.len());
        &self.image[start..end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Mnemonic(String),
    Unrecognized,
    Suppressed,
}

impl Decoded {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Decoded::Suppressed)
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Mnemonic(text) => f.write_str(text),
            Decoded::Unrecognized => f.write_str("??? unrecognized opcode"),
            Decoded::Suppressed => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    policy: Policy,
    glyphs: Glyphs,
}

impl Decoder {
    pub fn new(policy: Policy, glyphs: Glyphs) -> Self {
        Self { policy, glyphs }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn decode(&self, opcode: u16, ctx: Option<&DecodeContext<'_>>) -> Decoded {
        let decoded = DecodedOpcode::from(opcode);

        match (classify(opcode), self.policy) {
            (Some(op), Policy::Strict) => Decoded::Mnemonic(self.render(op, &decoded, ctx)),
            (Some(op), Policy::Minimal) if op.is_core() => {
                Decoded::Mnemonic(self.render(op, &decoded, ctx))
            }
            (Some(_), Policy::Minimal) | (None, Policy::Minimal) => Decoded::Suppressed,
            (None, Policy::Strict) => {
                log::debug!(
                    "No rule for {:#06x} (family {:X}), {:?}",
                    decoded.opcode,
                    decoded.instr_type,
                    decoded
                );
                Decoded::Unrecognized
            }
        }
    }

    fn render(&self, op: Op, d: &DecodedOpcode, ctx: Option<&DecodeContext<'_>>) -> String {
        let (x, y, n, kk, nnn) = (d.x, d.y, d.n, d.kk, d.nnn);

        match op {
            Op::Cls => "disp_clear()".to_string(),
            Op::Ret => "return".to_string(),
            Op::Sys => format!("machine_call(0x{:03X})", nnn),
            Op::Jp => format!("goto 0x{:03X}", nnn),
            Op::Call => format!("call 0x{:03X}", nnn),
            Op::SeByte => format!("if (V[{:X}] == 0x{:02X}) skip", x, kk),
            Op::SneByte => format!("if (V[{:X}] != 0x{:02X}) skip", x, kk),
            Op::SeReg => format!("if (V[{:X}] == V[{:X}]) skip", x, y),
            Op::LdByte => format!("V[{:X}] = 0x{:02X}", x, kk),
            Op::AddByte => format!("V[{:X}] += 0x{:02X}", x, kk),
            Op::LdReg => format!("V[{:X}] = V[{:X}]", x, y),
            Op::Or => format!("V[{:X}] |= V[{:X}]", x, y),
            Op::And => format!("V[{:X}] &= V[{:X}]", x, y),
            Op::Xor => format!("V[{:X}] ^= V[{:X}]", x, y),
            // VF is the flag register for the next five.
            Op::AddReg => format!("V[{:X}] += V[{:X}]; V[F] = carry", x, y),
            Op::Sub => format!("V[{:X}] -= V[{:X}]; V[F] = !borrow", x, y),
            Op::Shr => format!("V[{:X}] >>= 1; V[F] = lsb", x),
            Op::Subn => format!("V[{:X}] = V[{:X}] - V[{:X}]; V[F] = !borrow", x, y, x),
            Op::Shl => format!("V[{:X}] <<= 1; V[F] = msb", x),
            Op::SneReg => format!("if (V[{:X}] != V[{:X}]) skip", x, y),
            Op::LdIndex => format!("I = 0x{:03X}", nnn),
            Op::JpV0 => format!("goto V[0] + 0x{:03X}", nnn),
            Op::Rnd => format!("V[{:X}] = rand() & 0x{:02X}", x, kk),
            Op::Draw => {
                let info = format!("draw(V[{:X}], V[{:X}], 0x{:X})", x, y, n);
                match ctx {
                    Some(ctx) => self.with_sprite(info, ctx.sprite_bytes(n)),
                    None => info,
                }
            }
            Op::Skp => format!("if (key() == V[{:X}]) skip", x),
            Op::Sknp => format!("if (key() != V[{:X}]) skip", x),
            Op::LdDelay => format!("V[{:X}] = get_delay()", x),
            Op::WaitKey => format!("V[{:X}] = get_key()", x),
            Op::SetDelay => format!("delay_timer(V[{:X}])", x),
            Op::SetSound => format!("sound_timer(V[{:X}])", x),
            Op::AddIndex => format!("I += V[{:X}]", x),
            Op::SpriteAddr => format!("I = sprite_addr[V[{:X}]]", x),
            Op::Bcd => format!("set_bcd(V[{:X}])", x),
            Op::RegDump => format!("reg_dump(V[0]..=V[{:X}], &I)", x),
            Op::RegLoad => format!("reg_load(V[0]..=V[{:X}], &I)", x),
        }
    }

    fn with_sprite(&self, info: String, bytes: &[u8]) -> String {
        let mut out = info;
        out.push_str("\n  Sprite visual:\n");
        for row in self.glyphs.rows(bytes) {
            out.push_str("\n  ");
            out.push_str(&row);
        }
        out.push('\n');
        out
    }
}
