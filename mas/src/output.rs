//! Image materialization and the `.coe` / listing writers.

use std::io::Write;

use crate::source::{Data, Instruction};

/// Words per block-RAM image.
pub const TOTAL_WORDS: usize = 16384;

/// Places every instruction's words at `address / 4`. Writes that fall
/// outside the image are dropped.
pub fn text_image(list: &[Instruction]) -> Vec<u32> {
    let mut mem = vec![0u32; TOTAL_WORDS];
    for record in list {
        let base = record.address as usize / 4;
        for (k, &word) in record.words.iter().enumerate() {
            if let Some(cell) = mem.get_mut(base + k) {
                *cell = word;
            }
        }
    }
    mem
}

/// Packs each record's bytes little-endian into words starting at
/// `address / 4`; a trailing partial word is flushed zero-padded.
pub fn data_image(list: &[Data]) -> Vec<u32> {
    let mut mem = vec![0u32; TOTAL_WORDS];
    for record in list {
        let mut word_addr = record.address as usize / 4;
        let mut buffer = [0u8; 4];
        let mut filled = 0;
        for &byte in &record.bytes {
            buffer[filled] = byte;
            filled += 1;
            if filled == 4 {
                if let Some(cell) = mem.get_mut(word_addr) {
                    *cell = u32::from_le_bytes(buffer);
                }
                word_addr += 1;
                filled = 0;
                buffer = [0; 4];
            }
        }
        if filled != 0 {
            if let Some(cell) = mem.get_mut(word_addr) {
                *cell = u32::from_le_bytes(buffer);
            }
        }
    }
    mem
}

/// Renders one image in the `.coe` envelope: two header lines, then
/// one 8-digit word per line, `,`-terminated except the final `;`.
pub fn write_coe(out: &mut impl Write, mem: &[u32]) -> std::io::Result<()> {
    out.write_all(b"memory_initialization_radix = 16;\n")?;
    out.write_all(b"memory_initialization_vector =\n")?;
    for (i, word) in mem.iter().enumerate() {
        let end = if i == mem.len() - 1 { ';' } else { ',' };
        writeln!(out, "{:08x}{}", word, end)?;
    }
    Ok(())
}

/// Human-readable listing: one row per emitted word, then one row per
/// data byte.
pub fn write_listing(
    out: &mut impl Write,
    text: &[Instruction],
    data: &[Data],
) -> std::io::Result<()> {
    out.write_all(b"Code Segment\n          Machine code\n")?;
    out.write_all(b"Offset    hex       bin                               \tassembly\n")?;
    for record in text {
        let mut offset = record.address;
        for &word in &record.words {
            writeln!(
                out,
                "{:08x}  {:08x}  {:032b}\t{}",
                offset, word, word, record.assembly
            )?;
            offset += 4;
        }
    }

    out.write_all(b"\nData Segment\n          Raw data\n")?;
    out.write_all(b"Offset    hex bin     \tassembly\n")?;
    for record in data {
        let mut offset = record.address;
        for &byte in &record.bytes {
            writeln!(
                out,
                "{:08x}  {:02x}  {:08b}\t{}",
                offset, byte, byte, record.assembly
            )?;
            offset += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(address: u32, words: Vec<u32>) -> Instruction {
        Instruction {
            assembly: "x".to_string(),
            file: "t.s".to_string(),
            line: 1,
            address,
            done: true,
            words,
        }
    }

    fn datum(address: u32, bytes: Vec<u8>) -> Data {
        Data {
            assembly: "y".to_string(),
            file: "t.s".to_string(),
            line: 1,
            address,
            done: true,
            bytes,
        }
    }

    #[test]
    fn text_words_land_at_word_addresses() {
        let mem = text_image(&[inst(0, vec![1, 2]), inst(8, vec![3])]);
        assert_eq!(&mem[..4], &[1, 2, 3, 0]);
    }

    #[test]
    fn out_of_range_words_are_dropped() {
        let mem = text_image(&[inst((TOTAL_WORDS as u32 - 1) * 4, vec![7, 8])]);
        assert_eq!(mem[TOTAL_WORDS - 1], 7);
        assert_eq!(mem.len(), TOTAL_WORDS);
    }

    #[test]
    fn data_bytes_pack_little_endian() {
        let mem = data_image(&[datum(0, vec![0x44, 0x33, 0x22, 0x11, 0xaa])]);
        assert_eq!(mem[0], 0x1122_3344);
        assert_eq!(mem[1], 0x0000_00aa);
    }

    #[test]
    fn coe_envelope() {
        let mut out = vec![];
        write_coe(&mut out, &[0xdeadbeef, 0, 1]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "memory_initialization_radix = 16;\n\
             memory_initialization_vector =\n\
             deadbeef,\n\
             00000000,\n\
             00000001;\n"
        );
    }

    #[test]
    fn full_image_line_count() {
        let mut out = vec![];
        write_coe(&mut out, &text_image(&[])).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), TOTAL_WORDS + 2);
        assert!(text.ends_with("00000000;\n"));
    }

    #[test]
    fn listing_rows() {
        let mut out = vec![];
        write_listing(
            &mut out,
            &[inst(4, vec![0x2008_0005])],
            &[datum(0, vec![0xaa])],
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("00000004  20080005  00100000000010000000000000000101\tx"));
        assert!(text.contains("00000000  aa  10101010\ty"));
    }
}
