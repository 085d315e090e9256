////////////////////////////////////////////////////////////////////////////////
// File: src/tests/translator.rs
// Description: VM translator tests
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 06.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use std::{collections::HashSet, path::PathBuf};

use crate::internal::{intermediate::CodeWriter, parse::VmParser};

use shared::{
  error::{CoreError, ErrorKind},
  io::os::FileInfo,
};

////////////////////////////////////////////////////////////////////////////////
// Test Helper Functions
////////////////////////////////////////////////////////////////////////////////

fn file_info(name: &str, source: &str) -> FileInfo {
  return FileInfo::new(
    name.to_string(),
    PathBuf::from(name),
    source.to_string(),
  );
}

fn translate(source: &str) -> String {
  let file_info = file_info("Test.vm", source);
  let tokens = VmParser::parse(&file_info).unwrap();
  let mut writer = CodeWriter::default();

  writer.set_file(&file_info.stem);
  writer.translate(&tokens);

  return writer.into_program().instructions;
}

fn translate_err(source: &str) -> ErrorKind {
  let file_info = file_info("Test.vm", source);
  let error = VmParser::parse(&file_info).unwrap_err();

  return error.downcast_ref::<CoreError>().unwrap().kind();
}

// The generated assembly without the annotation comments.
fn instructions(output: &str) -> Vec<&str> {
  return output
    .lines()
    .filter(|line| return !line.starts_with("//"))
    .collect();
}

fn labels(output: &str) -> Vec<&str> {
  return output
    .lines()
    .filter(|line| return line.starts_with('('))
    .collect();
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Stack Operations
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "push constant loads the literal and advances SP."]
fn push_constant() {
  let output = translate("push constant 7\n");

  assert_eq!(
    instructions(&output),
    vec!["@7", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]
  );
}

#[test]
#[doc = "A binary operation consumes one stack cell and works in place."]
fn push_push_add() {
  let output = translate("push constant 7\npush constant 8\nadd\n");

  assert_eq!(
    instructions(&output),
    vec![
      "@7", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1", // push 7
      "@8", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1", // push 8
      "@SP", "AM=M-1", "D=M", "A=A-1", "M=D+M", // add
    ]
  );
}

#[test]
#[doc = "Unary operations rewrite the stack top without moving SP."]
fn unary_operations() {
  assert_eq!(
    instructions(&translate("neg\n")),
    vec!["@SP", "A=M-1", "M=-M"]
  );
  assert_eq!(
    instructions(&translate("not\n")),
    vec!["@SP", "A=M-1", "M=!M"]
  );
}

#[test]
#[doc = "Indirect segments dereference base pointer plus offset."]
fn push_local_and_pop_local() {
  let push = translate("push local 3\n");
  let pop = translate("pop local 2\n");

  assert_eq!(
    instructions(&push),
    vec![
      "@LCL", "D=M", "@3", "A=D+A", "D=M", // address + read
      "@SP", "A=M", "M=D", "@SP", "M=M+1", // push
    ]
  );
  assert_eq!(
    instructions(&pop),
    vec![
      "@LCL", "D=M", "@2", "D=D+A", "@R13", "M=D", // stash target in R13
      "@SP", "M=M-1", "@SP", "A=M", "D=M", // pop value
      "@R13", "A=M", "M=D", // store
    ]
  );
}

#[test]
#[doc = "The temp segment is the fixed RAM region 5..12."]
fn temp_segment_is_direct() {
  assert!(translate("push temp 3\n").contains("@8\nD=M"));
  assert!(translate("pop temp 0\n").contains("@5\nM=D"));
}

#[test]
#[doc = "pointer 0 and 1 alias THIS and THAT."]
fn pointer_segment_aliases() {
  assert!(translate("push pointer 0\n").contains("@THIS\nD=M"));
  assert!(translate("push pointer 1\n").contains("@THAT\nD=M"));
  assert!(translate("pop pointer 0\n").contains("@THIS\nM=D"));
  assert!(translate("pop pointer 1\n").contains("@THAT\nM=D"));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Static Linkage
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Static references are named after the file stem."]
fn static_references_use_file_stem() {
  let output = translate("push static 5\npop static 5\n");

  assert_eq!(output.matches("@Test.5").count(), 2);
}

#[test]
#[doc = "Each file of a translation unit keeps its own static symbols."]
fn static_references_are_per_file() {
  let first = file_info("First.vm", "pop static 0\n");
  let second = file_info("Second.vm", "push static 0\n");
  let mut writer = CodeWriter::default();

  writer.set_file(&first.stem);
  writer.translate(&VmParser::parse(&first).unwrap());
  writer.set_file(&second.stem);
  writer.translate(&VmParser::parse(&second).unwrap());

  let output = writer.into_program().instructions;

  assert!(output.contains("@First.0"));
  assert!(output.contains("@Second.0"));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Comparisons & Branching
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Comparisons subtract, branch and write -1 or 0 to the new top."]
fn comparison_scheme() {
  let output = translate("eq\n");

  assert_eq!(
    instructions(&output),
    vec![
      "@SP", "AM=M-1", "D=M", "A=A-1", "M=M-D", "D=M", // D = lhs - rhs
      "@EQ0", "D;JEQ", // branch on true
      "@SP", "A=M-1", "M=0", "@EQDONE0", "0;JMP", // false path
      "(EQ0)", "@SP", "A=M-1", "M=-1", // true path
      "(EQDONE0)",
    ]
  );
}

#[test]
#[doc = "Every comparison draws from its own counter."]
fn comparison_counters_are_per_operation() {
  let output = translate("eq\ngt\nlt\neq\ngt\n");

  for expected in ["(EQ0)", "(EQ1)", "(GT0)", "(GT1)", "(LT0)"] {
    assert_eq!(output.matches(expected).count(), 1, "{}", expected);
  }

  assert!(output.contains("D;JEQ"));
  assert!(output.contains("D;JGT"));
  assert!(output.contains("D;JLT"));
}

#[test]
#[doc = "All emitted labels within a translation unit are unique."]
fn labels_are_unique_within_a_unit() {
  let first = file_info("First.vm", "eq\nlt\ncall Other.f 0\n");
  let second = file_info("Second.vm", "eq\ngt\ncall Other.f 1\n");
  let mut writer = CodeWriter::default();

  writer.set_file(&first.stem);
  writer.translate(&VmParser::parse(&first).unwrap());
  writer.set_file(&second.stem);
  writer.translate(&VmParser::parse(&second).unwrap());

  let output = writer.into_program().instructions;
  let all_labels = labels(&output);
  let unique: HashSet<&str> = all_labels.iter().copied().collect();

  assert_eq!(all_labels.len(), unique.len(), "{:?}", all_labels);
  assert!(output.contains("(EQ1)"));
  assert!(output.contains("(RETURN1)"));
}

#[test]
#[doc = "Branch labels inside a function carry the function prefix."]
fn branch_labels_are_function_scoped() {
  let output = translate(
    "function Foo.bar 0\nlabel loop\npush constant 0\nif-goto loop\ngoto loop\n",
  );

  assert!(output.contains("(Foo.bar$loop)"));
  assert_eq!(output.matches("@Foo.bar$loop").count(), 2);
}

#[test]
#[doc = "Branch labels outside any function stay unscoped."]
fn branch_labels_without_function_context() {
  let output = translate("label start\ngoto start\n");

  assert!(output.contains("(start)"));
  assert!(output.contains("@start\n0;JMP"));
}

#[test]
#[doc = "if-goto pops the condition and jumps on non-zero."]
fn if_goto_pops_and_tests() {
  let output = translate("label top\npush constant 1\nif-goto top\n");

  assert!(output.contains("@SP\nM=M-1\n@SP\nA=M\nD=M\n@top\nD;JNE"));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Calling Convention
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "A function declaration places its entry label and zeroes locals."]
fn function_declaration() {
  let output = translate("function Foo.bar 2\n");
  let body = instructions(&output);

  assert_eq!(body[0], "(Foo.bar)");
  // Two zero-initialised locals
  assert_eq!(
    body[1..],
    [
      "@0", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1", //
      "@0", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1",
    ]
  );
}

#[test]
#[doc = "A call saves the five-word frame and repositions ARG and LCL."]
fn call_saves_frame() {
  let output = translate("call Foo.bar 2\n");

  assert_eq!(
    instructions(&output),
    vec![
      "@RETURN0", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1", // return addr
      "@LCL", "D=M", "@SP", "A=M", "M=D", "@SP", "M=M+1", // save LCL
      "@ARG", "D=M", "@SP", "A=M", "M=D", "@SP", "M=M+1", // save ARG
      "@THIS", "D=M", "@SP", "A=M", "M=D", "@SP", "M=M+1", // save THIS
      "@THAT", "D=M", "@SP", "A=M", "M=D", "@SP", "M=M+1", // save THAT
      "@SP", "D=M", "@5", "D=D-A", "@2", "D=D-A", "@ARG", "M=D", // ARG
      "@SP", "D=M", "@LCL", "M=D", // LCL = SP
      "@Foo.bar", "0;JMP", "(RETURN0)",
    ]
  );
}

#[test]
#[doc = "The epilogue reads RET before the return value clobbers *ARG."]
fn return_epilogue() {
  let output = translate("return\n");
  let body = instructions(&output);

  // FRAME and RET are stashed first
  assert_eq!(
    body[..9],
    ["@LCL", "D=M", "@R13", "M=D", "@5", "A=D-A", "D=M", "@R14", "M=D"]
  );
  // Return value relocation and SP restore
  assert!(output.contains("@ARG\nA=M\nM=D"));
  assert!(output.contains("@ARG\nD=M+1\n@SP\nM=D"));
  // Caller frame restore order: THAT, THIS, ARG, LCL
  let that = output.find("@THAT\nM=D").unwrap();
  let this = output.find("@THIS\nM=D").unwrap();
  let arg = output.find("@ARG\nM=D").unwrap();
  let lcl = output.find("@LCL\nM=D").unwrap();

  assert!(that < this && this < arg && arg < lcl);
  // Jump through the saved return address
  assert_eq!(body[body.len() - 4..], ["@R14", "D=M", "A=D", "0;JMP"]);
}

#[test]
#[doc = "The bootstrap sets SP to 256 and calls Sys.init."]
fn bootstrap_prologue() {
  let mut writer = CodeWriter::default();

  writer.insert_bootstrap();

  let output = writer.into_program().instructions;
  let body = instructions(&output);

  assert_eq!(body[..4], ["@256", "D=A", "@SP", "M=D"]);
  assert!(output.contains("@Sys.init\n0;JMP"));
  assert!(output.contains("(RETURN0)"));
}

#[test]
#[doc = "A single-file translation carries no bootstrap."]
fn single_file_has_no_bootstrap() {
  let output = translate("push constant 1\n");

  assert!(!output.contains("Sys.init"));
  assert!(!output.contains("@256"));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Diagnostics
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Malformed commands are parse errors."]
fn parse_errors() {
  assert_eq!(translate_err("jump here\n"), ErrorKind::Parse);
  assert_eq!(translate_err("pop constant 0\n"), ErrorKind::Parse);
  assert_eq!(translate_err("push pointer 2\n"), ErrorKind::Parse);
  assert_eq!(translate_err("push temp 8\n"), ErrorKind::Parse);
  assert_eq!(translate_err("push constant 40000\n"), ErrorKind::Parse);
  assert_eq!(translate_err("push local\n"), ErrorKind::Parse);
  assert_eq!(translate_err("push bogus 1\n"), ErrorKind::Parse);
  assert_eq!(translate_err("add 1\n"), ErrorKind::Parse);
  assert_eq!(translate_err("goto\n"), ErrorKind::Parse);
}

#[test]
#[doc = "Diagnostics reference the line of the offending command."]
fn diagnostics_carry_line_numbers() {
  let file_info = file_info("Test.vm", "push constant 1\n\nbogus\n");
  let error = VmParser::parse(&file_info).unwrap_err();
  let core_error = error.downcast_ref::<CoreError>().unwrap();

  assert_eq!(core_error.line(), Some(3));
}

#[test]
#[doc = "Comments and blank lines are ignored."]
fn comments_and_blank_lines() {
  let output = translate("// header\n\npush constant 1 // inline\n");

  assert_eq!(
    instructions(&output),
    vec!["@1", "D=A", "@SP", "A=M", "M=D", "@SP", "M=M+1"]
  );
}
