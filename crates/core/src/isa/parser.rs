//! Assembly tokenizer/parser.
//!
//! Turns raw source text into a [`Program`]. Two passes: the first strips
//! comments and labels and builds each instruction with unresolved label
//! references left as text; the second resolves every label against the
//! table built in the first pass, reporting every unresolved reference
//! rather than stopping at the first one.

use super::instruction::{Instruction, InstructionId, Program};
use super::opcode::Opcode;
use crate::common::error::ParseError;
use std::collections::HashMap;

/// A BEQ/CALL operand that names a label, to be resolved in the second pass.
enum LabelRef {
    /// BEQ: the offset is `target - (pc + 1)`.
    BranchOffset { pc: usize },
    /// CALL: the target is the absolute program index.
    AbsoluteTarget,
}

struct PendingLabel {
    instruction_index: usize,
    label: String,
    kind: LabelRef,
}

/// Parses assembly source into a [`Program`].
///
/// On any parse error, returns every `{line, message}` diagnostic found
/// rather than just the first — no partial program is ever returned.
pub fn parse_program(source: &str) -> Result<Program, Vec<ParseError>> {
    let mut errors = Vec::new();
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut pending: Vec<PendingLabel> = Vec::new();
    let mut next_id = 0u32;

    for (line_no, raw_line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let line = match take_label(line) {
            Ok((label, rest)) => {
                if let Some(label) = label {
                    if labels.insert(label.clone(), instructions.len()).is_some() {
                        errors.push(ParseError::new(
                            line_no,
                            format!("duplicate label '{label}'"),
                        ));
                    }
                }
                rest
            }
            Err(message) => {
                errors.push(ParseError::new(line_no, message));
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        match parse_instruction(line, instructions.len(), InstructionId(next_id)) {
            Ok((instruction, label_ref)) => {
                if let Some((label, kind)) = label_ref {
                    pending.push(PendingLabel {
                        instruction_index: instructions.len(),
                        label,
                        kind,
                    });
                }
                instructions.push(instruction);
                next_id += 1;
            }
            Err(message) => errors.push(ParseError::new(line_no, message)),
        }
    }

    for item in pending {
        match labels.get(&item.label) {
            Some(&target) => {
                let instruction = &mut instructions[item.instruction_index];
                match item.kind {
                    LabelRef::BranchOffset { pc } => {
                        let offset = target as i64 - (pc as i64 + 1);
                        match i16::try_from(offset) {
                            Ok(offset) => instruction.imm = Some(offset),
                            Err(_) => errors.push(ParseError::new(
                                instruction.pc + 1,
                                format!("branch offset to '{}' does not fit in 16 bits", item.label),
                            )),
                        }
                    }
                    LabelRef::AbsoluteTarget => instruction.target = Some(target),
                }
            }
            None => errors.push(ParseError::new(
                instructions[item.instruction_index].pc + 1,
                format!("undefined label '{}'", item.label),
            )),
        }
    }

    if errors.is_empty() {
        Ok(Program { instructions })
    } else {
        errors.sort_by_key(|e| e.line);
        Err(errors)
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Splits a leading `label:` off a line, if present.
///
/// Returns `(Some(label), rest)` if a label prefix was found, `(None, line)`
/// otherwise. The label is a bare identifier: ascii letters, digits or `_`,
/// not starting with a digit.
fn take_label(line: &str) -> Result<(Option<String>, &str), String> {
    let Some(colon) = line.find(':') else {
        return Ok((None, line));
    };
    let candidate = line[..colon].trim();
    if candidate.is_empty() || !is_identifier(candidate) {
        return Ok((None, line));
    }
    Ok((Some(candidate.to_string()), line[colon + 1..].trim()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_register(token: &str) -> Result<usize, String> {
    let rest = token
        .strip_prefix('R')
        .ok_or_else(|| format!("expected a register like R0..R7, found '{token}'"))?;
    let idx: usize = rest
        .parse()
        .map_err(|_| format!("invalid register '{token}'"))?;
    if idx > 7 {
        return Err(format!("register index out of range 0..7: '{token}'"));
    }
    Ok(idx)
}

/// Parses an `imm(Rn)` memory operand.
fn parse_memory_operand(token: &str) -> Result<(i16, usize), String> {
    let open = token
        .find('(')
        .ok_or_else(|| format!("expected 'offset(Rn)', found '{token}'"))?;
    if !token.ends_with(')') {
        return Err(format!("expected 'offset(Rn)', found '{token}'"));
    }
    let imm_str = &token[..open];
    let reg_str = &token[open + 1..token.len() - 1];
    let imm: i16 = imm_str
        .parse()
        .map_err(|_| format!("invalid offset '{imm_str}' in '{token}'"))?;
    let reg = parse_register(reg_str)?;
    Ok((imm, reg))
}

fn split_operands(rest: &str) -> Vec<&str> {
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[allow(clippy::too_many_lines)]
fn parse_instruction(
    line: &str,
    pc: usize,
    id: InstructionId,
) -> Result<(Instruction, Option<(String, LabelRef)>), String> {
    let (mnemonic, rest) = match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim()),
        None => (line, ""),
    };
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| format!("unknown opcode '{mnemonic}'"))?;
    let operands = split_operands(rest);

    let blank = || Instruction {
        id,
        pc,
        opcode,
        ra: None,
        rb: None,
        rc: None,
        imm: None,
        target: None,
        label: None,
    };

    let instruction = match opcode {
        Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul => {
            let [ra, rb, rc] = expect_operands::<3>(&operands, opcode)?;
            Instruction {
                ra: Some(parse_register(ra)?),
                rb: Some(parse_register(rb)?),
                rc: Some(parse_register(rc)?),
                ..blank()
            }
        }
        Opcode::Load | Opcode::Store => {
            let [ra, mem] = expect_operands::<2>(&operands, opcode)?;
            let (imm, rb) = parse_memory_operand(mem)?;
            Instruction {
                ra: Some(parse_register(ra)?),
                rb: Some(rb),
                imm: Some(imm),
                ..blank()
            }
        }
        Opcode::Beq => {
            let [ra, rb, label] = expect_operands::<3>(&operands, opcode)?;
            let mut instruction = Instruction {
                ra: Some(parse_register(ra)?),
                rb: Some(parse_register(rb)?),
                label: Some(label.to_string()),
                ..blank()
            };
            if let Ok(offset) = label.parse::<i16>() {
                instruction.imm = Some(offset);
                return Ok((instruction, None));
            }
            return Ok((
                instruction,
                Some((label.to_string(), LabelRef::BranchOffset { pc })),
            ));
        }
        Opcode::Call => {
            let [target] = expect_operands::<1>(&operands, opcode)?;
            let mut instruction = Instruction {
                label: Some(target.to_string()),
                ..blank()
            };
            if let Ok(index) = target.parse::<usize>() {
                instruction.target = Some(index);
                return Ok((instruction, None));
            }
            return Ok((
                instruction,
                Some((target.to_string(), LabelRef::AbsoluteTarget)),
            ));
        }
        Opcode::Ret => {
            expect_operands::<0>(&operands, opcode)?;
            blank()
        }
    };
    Ok((instruction, None))
}

fn expect_operands<'a, const N: usize>(
    operands: &'a [&'a str],
    opcode: Opcode,
) -> Result<[&'a str; N], String> {
    if operands.len() != N {
        return Err(format!(
            "{} expects {} operand(s), found {}",
            opcode.mnemonic(),
            N,
            operands.len()
        ));
    }
    let mut out = [""; N];
    out.copy_from_slice(operands);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_arithmetic_and_load_store() {
        let program = parse_program("LOAD R1,0(R0)\nADD R3,R1,R2\nSTORE R3,4(R0)\n").unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.get(0).unwrap().opcode, Opcode::Load);
        assert_eq!(program.get(1).unwrap().rb, Some(1));
        assert_eq!(program.get(2).unwrap().imm, Some(4));
    }

    #[test]
    fn resolves_forward_branch_label() {
        let program = parse_program(
            "BEQ R1,R2,SKIP\nADD R3,R1,R2\nSKIP: STORE R3,8(R0)\n",
        )
        .unwrap();
        // SKIP is instruction index 2; BEQ is at pc 0, so offset = 2 - 1 = 1.
        assert_eq!(program.get(0).unwrap().imm, Some(1));
    }

    #[test]
    fn resolves_call_and_label_on_same_line_as_instruction() {
        let program = parse_program(
            "CALL F\nADD R7,R6,R2\nF: ADD R4,R2,R2\nRET\n",
        )
        .unwrap();
        assert_eq!(program.get(0).unwrap().target, Some(2));
    }

    #[test]
    fn reports_undefined_label() {
        let err = parse_program("BEQ R1,R2,NOWHERE\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("undefined label"));
    }

    #[test]
    fn reports_wrong_operand_count() {
        let err = parse_program("ADD R1,R2\n").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].line, 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let program = parse_program("# a comment\n\nRET # trailing comment\n").unwrap();
        assert_eq!(program.len(), 1);
    }
}
