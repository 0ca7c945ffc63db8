//! Pseudo-instruction expansion.
//!
//! Macros rewrite into one or more real instructions on the current
//! record. The expander owns the extra word slots it allocates and
//! advances the address cursor by 4 for each additional word, so the
//! cursor always points past the whole expansion afterwards.

use crate::error::Error;
use crate::label::{SymbolRef, Unsolved};
use crate::lex;
use crate::source::Instruction;
use crate::{inst_i, inst_r};

use arch::reg::is_register;

/// Expands `mov` / `push` / `pop` / `nop`. On entry the record owns
/// exactly one zeroed word (the slot the driver allocated).
pub fn encode(
    mnemonic: &str,
    ops: &[String],
    inst: &mut Instruction,
    id: usize,
    cursor: &mut u32,
    unsolved: &mut Unsolved,
    notes: &mut Vec<String>,
) -> Result<(), Error> {
    let first = SymbolRef { inst: id, word: 0 };
    let second = SymbolRef { inst: id, word: 1 };

    match mnemonic {
        // nop -> sll $0, $0, 0
        "NOP" => {
            let ops = strings(&["$0", "$0", "0"]);
            inst_r::encode("SLL", &ops, &mut inst.words[0], first, unsolved)?;
        }
        "MOV" => {
            if ops.len() != 2 {
                return Err(Error::OperandError(mnemonic.to_string()));
            }
            let (dst, src) = (ops[0].as_str(), ops[1].as_str());
            if is_register(dst) && is_register(src) {
                // mov rd, rs -> or rd, $0, rs
                let ops = strings(&[dst, "$0", src]);
                inst_r::encode("OR", &ops, &mut inst.words[0], first, unsolved)?;
            } else if is_register(dst) && lex::is_memory(src) {
                let ops = strings(&[dst, src]);
                inst_i::encode("LW", &ops, &mut inst.words[0], first, unsolved, notes)?;
            } else if lex::is_memory(dst) && is_register(src) {
                let ops = strings(&[src, dst]);
                inst_i::encode("SW", &ops, &mut inst.words[0], first, unsolved, notes)?;
            } else if is_register(dst) && lex::is_symbol(src) {
                // The full 32-bit address materializes as lui + ori;
                // the resolver hands each word its half.
                inst.words.push(0);
                let hi = strings(&[dst, src]);
                let lo = strings(&[dst, dst, src]);
                inst_i::encode("LUI", &hi, &mut inst.words[0], first, unsolved, notes)?;
                inst_i::encode("ORI", &lo, &mut inst.words[1], second, unsolved, notes)?;
                *cursor += 4;
            } else if is_register(dst) && lex::is_number(src) {
                let value = lex::to_unumber(src, true)?;
                if value > 0xffff {
                    inst.words.push(0);
                    let upper = (value >> 16).to_string();
                    let lower = (value & 0xffff).to_string();
                    let hi = strings(&[dst, upper.as_str()]);
                    let lo = strings(&[dst, dst, lower.as_str()]);
                    inst_i::encode("LUI", &hi, &mut inst.words[0], first, unsolved, notes)?;
                    inst_i::encode("ORI", &lo, &mut inst.words[1], second, unsolved, notes)?;
                    *cursor += 4;
                } else {
                    let ops = strings(&[dst, "$0", src]);
                    inst_i::encode("ORI", &ops, &mut inst.words[0], first, unsolved, notes)?;
                }
            } else {
                return Err(Error::OperandError(mnemonic.to_string()));
            }
        }
        // push reg -> addi $sp, $sp, -4 ; sw reg, 0($sp)
        "PUSH" => {
            if ops.len() != 1 {
                return Err(Error::OperandError(mnemonic.to_string()));
            }
            inst.words.push(0);
            let dec = strings(&["$SP", "$SP", "-4"]);
            let store = strings(&[ops[0].as_str(), "0($SP)"]);
            inst_i::encode("ADDI", &dec, &mut inst.words[0], first, unsolved, notes)?;
            inst_i::encode("SW", &store, &mut inst.words[1], second, unsolved, notes)?;
            *cursor += 4;
        }
        // pop reg -> lw reg, 0($sp) ; addi $sp, $sp, 4
        "POP" => {
            if ops.len() != 1 {
                return Err(Error::OperandError(mnemonic.to_string()));
            }
            inst.words.push(0);
            let load = strings(&[ops[0].as_str(), "0($SP)"]);
            let inc = strings(&["$SP", "$SP", "4"]);
            inst_i::encode("LW", &load, &mut inst.words[0], first, unsolved, notes)?;
            inst_i::encode("ADDI", &inc, &mut inst.words[1], second, unsolved, notes)?;
            *cursor += 4;
        }
        _ => return Err(Error::UnknownInstruction(mnemonic.to_string())),
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(mnemonic: &str, ops: &[&str]) -> Result<(Vec<u32>, u32, Unsolved), Error> {
        let ops = strings(ops);
        let mut inst = Instruction {
            assembly: String::new(),
            file: "t.s".to_string(),
            line: 1,
            address: 0,
            done: false,
            words: vec![0],
        };
        let mut cursor = 0;
        let mut unsolved = Unsolved::new();
        let mut notes = vec![];
        encode(
            mnemonic,
            &ops,
            &mut inst,
            0,
            &mut cursor,
            &mut unsolved,
            &mut notes,
        )?;
        Ok((inst.words, cursor, unsolved))
    }

    #[test]
    fn nop_is_sll_zero() {
        let (words, cursor, _) = expand("NOP", &[]).unwrap();
        assert_eq!(words, vec![0x0000_0000]);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn mov_register_register() {
        // mov $t0, $t1 -> or $t0, $0, $t1
        let (words, _, _) = expand("MOV", &["$T0", "$T1"]).unwrap();
        assert_eq!(words, vec![0x0009_4025]);
    }

    #[test]
    fn mov_register_memory() {
        let (words, _, _) = expand("MOV", &["$T0", "4($SP)"]).unwrap();
        assert_eq!(words, vec![0x8fa8_0004]);
        let (words, _, _) = expand("MOV", &["4($SP)", "$T0"]).unwrap();
        assert_eq!(words, vec![0xafa8_0004]);
    }

    #[test]
    fn mov_small_immediate() {
        // mov $t0, 0xffff fits in one ori
        let (words, cursor, _) = expand("MOV", &["$T0", "0xFFFF"]).unwrap();
        assert_eq!(words, vec![0x3408_ffff]);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn mov_large_immediate() {
        let (words, cursor, _) = expand("MOV", &["$T0", "0x12345678"]).unwrap();
        assert_eq!(words, vec![0x3c08_1234, 0x3508_5678]);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn mov_negative_immediate_goes_wide() {
        // -5 reinterprets as 0xfffffffb, beyond 16 bits
        let (words, cursor, _) = expand("MOV", &["$T0", "-5"]).unwrap();
        assert_eq!(words, vec![0x3c08_ffff, 0x3508_fffb]);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn mov_symbol_references_both_words() {
        let (words, cursor, unsolved) = expand("MOV", &["$T0", "TABLE"]).unwrap();
        assert_eq!(words, vec![0x3c08_0000, 0x3508_0000]);
        assert_eq!(cursor, 4);
        let refs = unsolved.iter().next().unwrap();
        assert_eq!(refs.0, "TABLE");
        assert_eq!(
            refs.1.as_slice(),
            &[
                SymbolRef { inst: 0, word: 0 },
                SymbolRef { inst: 0, word: 1 }
            ]
        );
    }

    #[test]
    fn push_pop() {
        let (words, cursor, _) = expand("PUSH", &["$T0"]).unwrap();
        assert_eq!(words, vec![0x23bd_fffc, 0xafa8_0000]);
        assert_eq!(cursor, 4);

        let (words, cursor, _) = expand("POP", &["$T0"]).unwrap();
        assert_eq!(words, vec![0x8fa8_0000, 0x23bd_0004]);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn operand_errors() {
        assert!(matches!(
            expand("MOV", &["$T0"]),
            Err(Error::OperandError(_))
        ));
        assert!(matches!(
            expand("MOV", &["$T0", "$T1", "$T2"]),
            Err(Error::OperandError(_))
        ));
        assert!(matches!(expand("PUSH", &[]), Err(Error::OperandError(_))));
        assert!(matches!(
            expand("POP", &["$T0", "$T1"]),
            Err(Error::OperandError(_))
        ));
    }
}
