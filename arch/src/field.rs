use thiserror::Error;

/// A 32-bit MIPS machine word.
///
/// Field layout: `OP[31:26] | RS[25:21] | RT[20:16] | RD[15:11] |
/// Shamt[10:6] | Func[5:0]`. I-format reads `RD|Shamt|Func` as
/// `Immediate[15:0]`; J-format reads everything below OP as
/// `Address[25:0]`.
pub type MachineCode = u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} is too large. It should not be larger than {max}. Now it is {value}.")]
pub struct Overflow {
    pub field: &'static str,
    pub max: u32,
    pub value: i64,
}

fn check(field: &'static str, max: u32, value: u32) -> Result<(), Overflow> {
    if value > max {
        return Err(Overflow {
            field,
            max,
            value: value as i64,
        });
    }
    Ok(())
}

pub fn set_op(code: &mut MachineCode, op: u32) -> Result<(), Overflow> {
    check("OP", 63, op)?;
    *code = (*code & 0x03ff_ffff) | (op << 26);
    Ok(())
}

pub fn set_rs(code: &mut MachineCode, rs: u32) -> Result<(), Overflow> {
    check("RS", 31, rs)?;
    *code = (*code & 0xfc1f_ffff) | (rs << 21);
    Ok(())
}

pub fn set_rt(code: &mut MachineCode, rt: u32) -> Result<(), Overflow> {
    check("RT", 31, rt)?;
    *code = (*code & 0xffe0_ffff) | (rt << 16);
    Ok(())
}

pub fn set_rd(code: &mut MachineCode, rd: u32) -> Result<(), Overflow> {
    check("RD", 31, rd)?;
    *code = (*code & 0xffff_07ff) | (rd << 11);
    Ok(())
}

pub fn set_shamt(code: &mut MachineCode, shamt: u32) -> Result<(), Overflow> {
    check("Shamt", 31, shamt)?;
    *code = (*code & 0xffff_f83f) | (shamt << 6);
    Ok(())
}

pub fn set_funct(code: &mut MachineCode, funct: u32) -> Result<(), Overflow> {
    check("Func", 63, funct)?;
    *code = (*code & 0xffff_ffc0) | funct;
    Ok(())
}

/// Writes the 16-bit immediate. Signed values down to -32768 are stored
/// as their low 16 bits; the sign extension happens in hardware.
pub fn set_immediate(code: &mut MachineCode, immediate: i32) -> Result<(), Overflow> {
    if !(-32768..65536).contains(&immediate) {
        return Err(Overflow {
            field: "Immediate",
            max: 65535,
            value: immediate as i64,
        });
    }
    *code = (*code & 0xffff_0000) | (immediate as u32 & 0xffff);
    Ok(())
}

pub fn set_address(code: &mut MachineCode, address: u32) -> Result<(), Overflow> {
    check("Address", (1 << 26) - 1, address)?;
    *code = (*code & 0xfc00_0000) | address;
    Ok(())
}
