//! Crate-private test helpers: fixture loading and temporary files.


use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::U256;

/// One expected instruction: pc, mnemonic and operand.
pub type ExpectedInstruction = (usize, String, Option<U256>);

/// A bytecode fixture under `tests/fixtures/<name>/`.
pub struct Fixture {
    pub name: String,
    pub bytecode: String,
    pub asmcode: String,
    pub listing: String,
}

/// Root of the fixture tree.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Load every fixture directory, sorted by name.
pub fn load_fixtures() -> Vec<Fixture> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter()
        .map(|dir| Fixture {
            name: dir.file_name().unwrap().to_string_lossy().into_owned(),
            bytecode: fs::read_to_string(dir.join("bytecode.txt")).unwrap(),
            asmcode: fs::read_to_string(dir.join("asmcode.txt")).unwrap(),
            listing: fs::read_to_string(dir.join("listing.txt")).unwrap(),
        })
        .collect()
}

/// Parse an expected listing of the form `0x0002: PUSH1 0x40`, one instruction per line.
///
/// Blank lines are skipped. Panics on a malformed line.
pub fn parse_asmcode(asmcode: &str) -> Vec<ExpectedInstruction> {
    asmcode
        .lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            let (pc, rest) = line
                .split_once(':')
                .unwrap_or_else(|| panic!("line {}: missing ':' in {line:?}", index + 1));
            let pc = pc
                .trim()
                .strip_prefix("0x")
                .and_then(|digits| usize::from_str_radix(digits, 16).ok())
                .unwrap_or_else(|| panic!("line {}: bad pc in {line:?}", index + 1));

            let mut fields = rest.split_whitespace();
            let name = fields
                .next()
                .unwrap_or_else(|| panic!("line {}: missing mnemonic", index + 1))
                .to_string();
            let operand = fields.next().map(|operand| {
                let digits = operand
                    .strip_prefix("0x")
                    .unwrap_or_else(|| panic!("line {}: bad operand {operand:?}", index + 1));
                U256::from_str_radix(digits, 16).unwrap()
            });
            assert!(fields.next().is_none(), "line {}: trailing fields", index + 1);

            (pc, name, operand)
        })
        .collect()
}

/// A file in the system temp directory, removed on drop.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(name: &str, contents: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!(
            "evmscope-{}-{name}.txt",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        TempFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn parse_asmcode_lines() {
    let parsed = parse_asmcode("0x0000: PUSH1 0x80\n\n  0x0002:  MSTORE  \n");
    assert_eq!(
        parsed,
        vec![
            (0, "PUSH1".to_string(), Some(U256::from(0x80))),
            (2, "MSTORE".to_string(), None),
        ]
    );
}
