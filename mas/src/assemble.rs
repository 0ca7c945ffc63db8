//! The two passes: encode every record while collecting symbols and
//! forward references, then patch the recorded references once all
//! addresses are known.

use arch::field;
use arch::fmt;
use arch::op::Op;

use crate::error::{note, Error};
use crate::label::{SymbolRef, Symbols, Unsolved};
use crate::parser::{self, Format};
use crate::source::{Data, Instruction};
use crate::{data, inst_i, inst_j, inst_r, macros};

/// Pass state threaded through the encoders. The address cursor
/// belongs to the current pass and restarts at 0 per segment; only the
/// macro expander moves it beyond the default step.
pub struct Assembler {
    pub symbols: Symbols,
    pub unsolved: Unsolved,
    cursor: u32,
    pub errors: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            symbols: Symbols::new(),
            unsolved: Unsolved::new(),
            cursor: 0,
            errors: 0,
        }
    }

    /// First pass over the data segment. Runs before the text pass so
    /// data labels are visible to the instruction encoders.
    pub fn pass1_data(&mut self, list: &mut [Data]) {
        self.cursor = 0;
        for record in list.iter_mut() {
            if record.done {
                record.address = self.cursor;
                self.cursor += record.bytes.len() as u32;
                continue;
            }
            if let Err(err) = self.encode_data(record) {
                err.diag(&record.file, record.line, &record.assembly);
                self.errors += 1;
            }
            record.done = true;
        }
    }

    fn encode_data(&mut self, record: &mut Data) -> Result<(), Error> {
        let (label, body) = parser::split_label(&record.assembly);
        if let Some(label) = label {
            self.symbols.insert(&label.to_uppercase(), self.cursor)?;
        }
        record.address = self.cursor;
        let body = body.to_uppercase();
        if body.is_empty() {
            return Ok(());
        }
        data::encode(&body, &mut record.bytes)?;
        self.cursor += record.bytes.len() as u32;
        Ok(())
    }

    /// First pass over the text segment: bind labels, dispatch each
    /// mnemonic to its encoder, accumulate addresses. Errors are logged
    /// per line and the pass continues.
    pub fn pass1_text(&mut self, list: &mut Vec<Instruction>) {
        self.cursor = 0;
        for id in 0..list.len() {
            if list[id].done {
                list[id].address = self.cursor;
                self.cursor += 4 * list[id].words.len() as u32;
                continue;
            }
            if let Err(err) = self.encode_text(list, id) {
                let record = &list[id];
                err.diag(&record.file, record.line, &record.assembly);
                self.errors += 1;
            }
            list[id].done = true;
        }
    }

    fn encode_text(&mut self, list: &mut Vec<Instruction>, id: usize) -> Result<(), Error> {
        let assembly = list[id].assembly.clone();
        let (label, body) = parser::split_label(&assembly);
        if let Some(label) = label {
            self.symbols.insert(&label.to_uppercase(), self.cursor)?;
        }
        list[id].address = self.cursor;
        let body = body.to_uppercase();
        if body.is_empty() {
            return Ok(());
        }

        let mnemonic = parser::mnemonic(&body).to_string();
        let ops = parser::operands(&body);
        let mut notes = vec![];

        list[id].words.push(0);
        let slot = SymbolRef { inst: id, word: 0 };
        let record = &mut list[id];
        let result = match parser::format_of(&mnemonic) {
            Some(Format::R) => inst_r::encode(
                &mnemonic,
                &ops,
                &mut record.words[0],
                slot,
                &mut self.unsolved,
            ),
            Some(Format::I) => inst_i::encode(
                &mnemonic,
                &ops,
                &mut record.words[0],
                slot,
                &mut self.unsolved,
                &mut notes,
            ),
            Some(Format::J) => inst_j::encode(
                &mnemonic,
                &ops,
                &mut record.words[0],
                slot,
                &mut self.unsolved,
                &mut notes,
            ),
            Some(Format::Macro) => macros::encode(
                &mnemonic,
                &ops,
                record,
                id,
                &mut self.cursor,
                &mut self.unsolved,
                &mut notes,
            ),
            None => Err(Error::UnknownInstruction(mnemonic.clone())),
        };
        let record = &list[id];
        for text in &notes {
            note(text, &record.file, record.line, &record.assembly);
        }
        result?;
        self.cursor += 4;
        Ok(())
    }

    /// Second pass: bind every recorded reference. The field to patch
    /// is re-derived from the opcode already in the word.
    pub fn pass2(&mut self, list: &mut [Instruction]) {
        let unsolved = std::mem::take(&mut self.unsolved);
        for (symbol, refs) in unsolved.iter() {
            let Some(address) = self.symbols.get(symbol) else {
                let record = &list[refs[0].inst];
                Error::UndefinedSymbol(symbol.clone()).diag(
                    &record.file,
                    record.line,
                    &record.assembly,
                );
                self.errors += 1;
                continue;
            };
            for slot in refs {
                if let Err(err) = patch(&mut list[slot.inst], slot.word, address, symbol) {
                    let record = &list[slot.inst];
                    err.diag(&record.file, record.line, &record.assembly);
                    self.errors += 1;
                }
            }
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `address` into the field picked by the word's format:
/// Shamt for R, the word-scaled target for J, the immediate for I.
/// Branch opcodes get a PC-relative, word-scaled offset; the lui/ori
/// pair of a `mov rd, symbol` expansion gets the high and low halves.
fn patch(record: &mut Instruction, index: usize, address: u32, symbol: &str) -> Result<(), Error> {
    let pc = record.address;
    let word = &mut record.words[index];
    if fmt::is_r_format(*word) {
        field::set_shamt(word, address)?;
    } else if fmt::is_i_format(*word) {
        let op = fmt::opcode(*word);
        let immediate = if fmt::is_branch_opcode(op) {
            ((address as i64 - (pc as i64 + 4)) >> 2) as i32
        } else if op == Op::LUI {
            (address >> 16) as i32
        } else if op == Op::ORI {
            (address & 0xffff) as i32
        } else {
            address as i32
        };
        field::set_immediate(word, immediate)?;
    } else if fmt::is_j_format(*word) {
        field::set_address(word, address >> 2)?;
    } else {
        return Err(Error::UnknownFormat(symbol.to_string()));
    }
    Ok(())
}
