use std::io::{self, BufWriter, Write};

use anyhow::Context;
use evmscope::{disassembler::DecoderConfig, Disassembler, Instruction};
use log::debug;
use serde::Serialize;

use crate::{
    app::Cli,
    commands::common::{input_mode, load_hex},
    output::{write_json, Align, TabWriter},
};

/// One instruction in `--json` output.
#[derive(Debug, Serialize)]
pub struct InstructionRecord {
    pc: usize,
    opcode: u8,
    name: &'static str,
    operand: Option<String>,
    size: usize,
    pops: u8,
    pushes: u8,
    gas: u32,
}

impl From<&Instruction> for InstructionRecord {
    fn from(instruction: &Instruction) -> Self {
        InstructionRecord {
            pc: instruction.pc.unwrap_or_default(),
            opcode: instruction.opcode,
            name: instruction.mnemonic,
            operand: instruction.operand_hex().map(|hex| format!("0x{hex}")),
            size: instruction.size(),
            pops: instruction.stack_behavior.pops,
            pushes: instruction.stack_behavior.pushes,
            gas: instruction.gas,
        }
    }
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let mode = input_mode(&cli.input);
    let hex = load_hex(&cli.input, &cli.chain)?;

    let config = DecoderConfig::default().with_truncation(cli.on_truncation);
    // Decode everything before writing so a failure produces no partial listing
    let instructions = Disassembler::new()
        .with_config(config)
        .disassemble(&hex)
        .with_context(|| format!("failed to disassemble {mode} input"))?;
    debug!("{} instructions", instructions.len());

    let stdout = io::stdout();
    let mut w = BufWriter::new(stdout.lock());

    if cli.global.json {
        let records: Vec<InstructionRecord> = instructions.iter().map(Into::into).collect();
        write_json(&mut w, &records)?;
    } else if cli.global.table {
        write_table(&mut w, &instructions)?;
    } else {
        write_listing(&mut w, &instructions)?;
    }

    w.flush()?;
    Ok(())
}

/// One rendered line per instruction.
pub fn write_listing(w: &mut impl Write, instructions: &[Instruction]) -> io::Result<()> {
    for instruction in instructions {
        writeln!(w, "{instruction}")?;
    }
    Ok(())
}

fn write_table(w: &mut impl Write, instructions: &[Instruction]) -> io::Result<()> {
    let mut table = TabWriter::new(&[
        ("PC", Align::Left),
        ("OP", Align::Left),
        ("MNEMONIC", Align::Left),
        ("OPERAND", Align::Left),
        ("STACK", Align::Right),
        ("GAS", Align::Right),
        ("CATEGORY", Align::Left),
    ]);

    for instruction in instructions {
        let stack = instruction.stack_behavior;
        table.row(vec![
            instruction
                .pc
                .map_or_else(|| "????".to_string(), |pc| format!("{pc:04x}")),
            format!("{:02x}", instruction.opcode),
            instruction.mnemonic.to_string(),
            instruction
                .operand_hex()
                .map(|hex| format!("0x{hex}"))
                .unwrap_or_default(),
            format!("{}/{} ({:+})", stack.pops, stack.pushes, stack.net_effect),
            instruction.gas.to_string(),
            instruction.category().to_string(),
        ]);
    }

    table.write(w)
}
