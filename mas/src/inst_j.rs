//! Jump-format instruction encoding.

use arch::field::{self, MachineCode};
use arch::op::Op;

use crate::error::Error;
use crate::label::{SymbolRef, Unsolved};
use crate::lex;

/// Encodes `J target` / `JAL target`. A numeric target is written
/// directly (with a note); a symbolic target is patched in pass 2.
pub fn encode(
    mnemonic: &str,
    ops: &[String],
    word: &mut MachineCode,
    slot: SymbolRef,
    unsolved: &mut Unsolved,
    notes: &mut Vec<String>,
) -> Result<(), Error> {
    if ops.len() > 1 {
        return Err(Error::TooManyOperands(mnemonic.to_string()));
    }
    let target = ops
        .first()
        .ok_or_else(|| Error::OperandError(mnemonic.to_string()))?;

    field::set_op(word, if mnemonic == "J" { Op::J } else { Op::JAL })?;

    if lex::is_number(target) {
        field::set_address(word, lex::to_number(target, true)? as u32)?;
        notes.push("immediate value in jump instruction".to_string());
    } else if lex::is_symbol(target) {
        unsolved.add(target, slot);
    } else {
        return Err(Error::ExpectNumberOrSymbol(target.to_string()));
    }
    Ok(())
}
