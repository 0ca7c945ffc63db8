//! Register-format instruction encoding.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use arch::field::{self, MachineCode};
use arch::op::{Funct, Op, ERET_RS};
use arch::reg::Reg;

use crate::error::Error;
use crate::label::{SymbolRef, Unsolved};
use crate::lex;

static FUNCT_3OP: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("ADD", Funct::ADD);
    map.insert("ADDU", Funct::ADDU);
    map.insert("SUB", Funct::SUB);
    map.insert("SUBU", Funct::SUBU);
    map.insert("AND", Funct::AND);
    map.insert("OR", Funct::OR);
    map.insert("XOR", Funct::XOR);
    map.insert("NOR", Funct::NOR);
    map.insert("SLT", Funct::SLT);
    map.insert("SLTU", Funct::SLTU);
    map.insert("SLLV", Funct::SLLV);
    map.insert("SRLV", Funct::SRLV);
    map.insert("SRAV", Funct::SRAV);
    map
});

static FUNCT_SHIFT: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("SLL", Funct::SLL);
    map.insert("SRL", Funct::SRL);
    map.insert("SRA", Funct::SRA);
    map
});

static FUNCT_2OP: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("MULT", Funct::MULT);
    map.insert("MULTU", Funct::MULTU);
    map.insert("DIV", Funct::DIV);
    map.insert("DIVU", Funct::DIVU);
    map.insert("JALR", Funct::JALR);
    map
});

static FUNCT_1OP: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("JR", Funct::JR);
    map.insert("MFHI", Funct::MFHI);
    map.insert("MFLO", Funct::MFLO);
    map.insert("MTHI", Funct::MTHI);
    map.insert("MTLO", Funct::MTLO);
    map
});

static FUNCT_0OP: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("BREAK", Funct::BREAK);
    map.insert("SYSCALL", Funct::SYSCALL);
    map.insert("ERET", Funct::ERET);
    map
});

/// Encodes one R-format instruction into `word`. A symbolic shift
/// amount writes a 0 placeholder and records `slot` for pass 2.
pub fn encode(
    mnemonic: &str,
    ops: &[String],
    word: &mut MachineCode,
    slot: SymbolRef,
    unsolved: &mut Unsolved,
) -> Result<(), Error> {
    field::set_op(word, Op::SPECIAL)?;

    match ops.len() {
        // op rd, rs, rt -- variable shifts read `rd, rt, rs` in source
        // order, so their second and third operands swap.
        3 => {
            if let Some(&funct) = FUNCT_3OP.get(mnemonic) {
                let (rs, rt) = if matches!(mnemonic, "SLLV" | "SRLV" | "SRAV") {
                    (&ops[2], &ops[1])
                } else {
                    (&ops[1], &ops[2])
                };
                field::set_funct(word, funct)?;
                field::set_rs(word, Reg::parse(rs)?.index())?;
                field::set_rt(word, Reg::parse(rt)?.index())?;
                field::set_rd(word, Reg::parse(&ops[0])?.index())?;
            } else if let Some(&funct) = FUNCT_SHIFT.get(mnemonic) {
                if !lex::is_number(&ops[2]) && !lex::is_symbol(&ops[2]) {
                    return Err(Error::OperandError(mnemonic.to_string()));
                }
                field::set_funct(word, funct)?;
                field::set_rt(word, Reg::parse(&ops[1])?.index())?;
                field::set_rd(word, Reg::parse(&ops[0])?.index())?;
                if lex::is_number(&ops[2]) {
                    field::set_shamt(word, lex::to_number(&ops[2], true)? as u32)?;
                } else {
                    unsolved.add(&ops[2], slot);
                }
            } else {
                return Err(Error::OperandError(mnemonic.to_string()));
            }
        }
        // mult/div take `rs, rt`; jalr takes `rd, rs`.
        2 => {
            let &funct = FUNCT_2OP
                .get(mnemonic)
                .ok_or_else(|| Error::OperandError(mnemonic.to_string()))?;
            field::set_funct(word, funct)?;
            if mnemonic == "JALR" {
                field::set_rd(word, Reg::parse(&ops[0])?.index())?;
                field::set_rs(word, Reg::parse(&ops[1])?.index())?;
            } else {
                field::set_rs(word, Reg::parse(&ops[0])?.index())?;
                field::set_rt(word, Reg::parse(&ops[1])?.index())?;
            }
        }
        1 => {
            let &funct = FUNCT_1OP
                .get(mnemonic)
                .ok_or_else(|| Error::OperandError(mnemonic.to_string()))?;
            field::set_funct(word, funct)?;
            if matches!(mnemonic, "MFHI" | "MFLO") {
                field::set_rd(word, Reg::parse(&ops[0])?.index())?;
            } else {
                field::set_rs(word, Reg::parse(&ops[0])?.index())?;
            }
        }
        0 => {
            let &funct = FUNCT_0OP
                .get(mnemonic)
                .ok_or_else(|| Error::OperandError(mnemonic.to_string()))?;
            field::set_funct(word, funct)?;
            if mnemonic == "ERET" {
                field::set_op(word, Op::COP0)?;
                field::set_rs(word, ERET_RS)?;
            }
        }
        _ => return Err(Error::OperandError(mnemonic.to_string())),
    }
    Ok(())
}
