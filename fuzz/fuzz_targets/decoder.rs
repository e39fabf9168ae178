#![no_main]

use evmscope::{disassembler::DecoderConfig, Disassembler};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as code: every complete instruction is contiguous
    let lenient = Disassembler::new().with_config(DecoderConfig::lenient());
    if let Ok(instructions) = lenient.decode_bytes(data) {
        let mut pc = 0;
        for instruction in &instructions {
            assert_eq!(instruction.pc, Some(pc));
            pc += instruction.size();
        }
        assert!(pc <= data.len());
    }

    // Arbitrary bytes as hex text
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Disassembler::new().disassemble(text);
    }
});
