//! Format classification of an already-encoded machine word.
//!
//! Used by the resolver to pick the field a back-patched symbol address
//! lands in; first-pass dispatch goes by mnemonic instead.

use crate::field::MachineCode;
use crate::op::Op;

pub fn opcode(code: MachineCode) -> u32 {
    code >> 26
}

/// R format: OP = 0, plus the COP0 space (ERET, MFC0/MTC0).
pub fn is_r_format(code: MachineCode) -> bool {
    opcode(code) == Op::SPECIAL || opcode(code) == Op::COP0
}

/// I format: arithmetic-immediate (0b001xxx), branches (0b0001xx and
/// REGIMM), and loads/stores (0b10xxxx).
pub fn is_i_format(code: MachineCode) -> bool {
    let op = opcode(code);
    (op >> 3) == 1 || op == Op::REGIMM || (op >> 2) == 1 || (op >> 4) == 0b10
}

pub fn is_j_format(code: MachineCode) -> bool {
    matches!(opcode(code), Op::J | Op::JAL)
}

/// Branch opcodes take a PC-relative, word-scaled immediate.
pub fn is_branch_opcode(op: u32) -> bool {
    matches!(op, Op::REGIMM | Op::BEQ | Op::BNE | Op::BLEZ | Op::BGTZ)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert!(is_r_format(0x0000_0020)); // add $0,$0,$0
        assert!(is_r_format(0x4200_0018)); // eret
        assert!(is_i_format(0x2008_0005)); // addi $t0,$zero,5
        assert!(is_i_format(0x1100_0001)); // beq $t0,$zero,+1
        assert!(is_i_format(0x8c08_0000)); // lw $t0,0($zero)
        assert!(is_i_format(0x0411_0000)); // bgezal $zero,0
        assert!(is_j_format(0x0800_0000)); // j 0
        assert!(is_j_format(0x0c00_0000)); // jal 0
        assert!(!is_i_format(0x0800_0000));
        assert!(!is_r_format(0x2008_0005));
        assert!(!is_j_format(0x0000_0020));
    }

    #[test]
    fn branches() {
        for op in [Op::REGIMM, Op::BEQ, Op::BNE, Op::BLEZ, Op::BGTZ] {
            assert!(is_branch_opcode(op));
        }
        for op in [Op::ADDI, Op::ORI, Op::LUI, Op::LW, Op::SW, Op::J] {
            assert!(!is_branch_opcode(op));
        }
    }
}
