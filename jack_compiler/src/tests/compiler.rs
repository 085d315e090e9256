////////////////////////////////////////////////////////////////////////////////
// File: src/tests/compiler.rs
// Description: Compilation engine tests
//
// Author: Leon Heidelbach <leon.heidelbach@hhu.de>
// Date: 15.05.2024
//
// License: GPLv3
////////////////////////////////////////////////////////////////////////////////

use super::util::{compile_err, compile_source};

use shared::error::ErrorKind;

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Subroutine Framing
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "A constructor allocates one cell per field and aims `this` at it."]
fn constructor_allocates_fields() {
  let output = compile_source(
    "class Point {
       field int x, y;
       constructor Point new(int ax, int ay) {
         let x = ax;
         let y = ay;
         return this;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Point.new 0
push constant 2
call Memory.alloc 1
pop pointer 0
push argument 0
pop this 0
push argument 1
pop this 1
push pointer 0
return
"
  );
}

#[test]
#[doc = "A method binds `this` from argument 0 before its body runs."]
fn method_prologue_and_implicit_call() {
  let output = compile_source(
    "class Point {
       field int x;
       method int getx() {
         return x;
       }
       method int double() {
         return getx() + getx();
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Point.getx 0
push argument 0
pop pointer 0
push this 0
return
function Point.double 0
push argument 0
pop pointer 0
push pointer 0
call Point.getx 1
push pointer 0
call Point.getx 1
add
return
"
  );
}

#[test]
#[doc = "Void subroutines return constant 0, do-statements discard it."]
fn void_return_and_do_discard() {
  let output = compile_source(
    "class Main {
       function void main() {
         do Screen.clearScreen();
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 0
call Screen.clearScreen 0
pop temp 0
push constant 0
return
"
  );
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Call Receivers
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "A variable receiver is pushed as implicit argument, a class is not."]
fn receiver_resolution() {
  let output = compile_source(
    "class Main {
       function void main() {
         var Point p;
         let p = Point.new();
         do p.draw();
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 1
call Point.new 0
pop local 0
push local 0
call Point.draw 1
pop temp 0
push constant 0
return
"
  );
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Control Flow
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "The while scheme emits exactly one `not` ahead of the exit branch."]
fn while_scheme() {
  let output = compile_source(
    "class Main {
       function void main() {
         var int x;
         while (x < 10) {
           let x = x + 1;
         }
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 1
label L0
push local 0
push constant 10
lt
not
if-goto L1
push local 0
push constant 1
add
pop local 0
goto L0
label L1
push constant 0
return
"
  );
  assert_eq!(output.matches("\nnot\n").count(), 1);
}

#[test]
#[doc = "if/else branches through the false label and joins at the end label."]
fn if_else_scheme() {
  let output = compile_source(
    "class Main {
       function void main() {
         var boolean b;
         if (b) {
           let b = false;
         } else {
           let b = true;
         }
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 1
push local 0
not
if-goto L0
push constant 0
pop local 0
goto L1
label L0
push constant 0
not
pop local 0
label L1
push constant 0
return
"
  );
}

#[test]
#[doc = "The label counter restarts with every subroutine."]
fn label_counter_resets_per_subroutine() {
  let output = compile_source(
    "class Main {
       function void a() {
         while (true) {
         }
         return;
       }
       function void b() {
         while (true) {
         }
         return;
       }
     }",
  );

  assert_eq!(output.matches("label L0").count(), 2);
  assert_eq!(output.matches("label L1").count(), 2);
  assert!(!output.contains("label L2"));
}

#[test]
#[doc = "Nested control flow draws distinct labels from one counter."]
fn nested_control_flow_labels_are_unique() {
  let output = compile_source(
    "class Main {
       function void main() {
         var int x;
         while (x < 3) {
           if (x = 1) {
             let x = x + 2;
           }
         }
         return;
       }
     }",
  );

  for label in ["label L0", "label L1", "label L2", "label L3"] {
    assert_eq!(output.matches(label).count(), 1, "{}", label);
  }
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Expressions
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "A string constant becomes String.new plus one appendChar per char."]
fn string_constant_expansion() {
  let output = compile_source(
    "class Main {
       function void main() {
         do Output.printString(\"AB\");
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 0
push constant 2
call String.new 1
push constant 65
call String.appendChar 2
push constant 66
call String.appendChar 2
call Output.printString 1
pop temp 0
push constant 0
return
"
  );
}

#[test]
#[doc = "Operators lower to stack commands, * and / to OS calls."]
fn operator_lowering() {
  let output = compile_source(
    "class Main {
       function void main() {
         var int r, x, y;
         let r = ((2 * 3) / x) - (1 + y);
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 3
push constant 2
push constant 3
call Math.multiply 2
push local 1
call Math.divide 2
push constant 1
push local 2
add
sub
pop local 0
push constant 0
return
"
  );
}

#[test]
#[doc = "Keyword constants and unary operators lower to stack commands."]
fn keyword_constants_and_unary_operators() {
  let output = compile_source(
    "class Main {
       function void main() {
         var int x;
         var boolean b;
         let x = -x;
         let b = true;
         let b = ~(x = null);
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 2
push local 0
neg
pop local 0
push constant 0
not
pop local 1
push local 0
push constant 0
eq
not
pop local 1
push constant 0
return
"
  );
}

#[test]
#[doc = "Array reads and writes stage the address and stash the RHS in temp 0."]
fn array_access_and_assignment() {
  let output = compile_source(
    "class Main {
       function void main() {
         var Array a;
         var int i, j;
         let a[i] = a[j];
         return;
       }
     }",
  );

  assert_eq!(
    output,
    "\
function Main.main 3
push local 0
push local 1
add
push local 0
push local 2
add
pop pointer 1
push that 0
pop temp 0
pop pointer 1
push temp 0
pop that 0
push constant 0
return
"
  );
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Symbol Resolution
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Statics map to the static segment with class-scope indices."]
fn static_variables() {
  let output = compile_source(
    "class Main {
       static int s, t;
       function void set() {
         let t = 3;
         return;
       }
     }",
  );

  assert!(output.contains("pop static 1"));
}

#[test]
#[doc = "A subroutine variable shadows a field of the same name."]
fn subroutine_scope_shadows_class_scope() {
  let output = compile_source(
    "class Point {
       field int x;
       method void m() {
         var int x;
         let x = 1;
         return;
       }
     }",
  );

  assert!(output.contains("pop local 0"));
  assert!(!output.contains("pop this 0"));
}

////////////////////////////////////////////////////////////////////////////////
// Test Cases: Diagnostics
////////////////////////////////////////////////////////////////////////////////

#[test]
#[doc = "Using an undeclared identifier as a variable is a semantic error."]
fn undeclared_variable() {
  let source = "class Main {
    function void main() {
      let x = 1;
      return;
    }
  }";

  assert_eq!(compile_err(source), ErrorKind::Semantic);
}

#[test]
#[doc = "Indexing an undeclared identifier is a semantic error."]
fn array_indexing_requires_a_variable() {
  let source = "class Main {
    function void main() {
      var int x;
      let x = q[0];
      return;
    }
  }";

  assert_eq!(compile_err(source), ErrorKind::Semantic);
}

#[test]
#[doc = "Declaring the same name twice in one scope is a semantic error."]
fn duplicate_declaration() {
  let source = "class Main {
    function void main() {
      var int x;
      var boolean x;
      return;
    }
  }";

  assert_eq!(compile_err(source), ErrorKind::Semantic);
}

#[test]
#[doc = "Syntactic mismatches are parse errors."]
fn parse_errors() {
  assert_eq!(
    compile_err("class Main { function void main() { return }"),
    ErrorKind::Parse
  );
  assert_eq!(
    compile_err("class Main { function void main() { let = 1; } }"),
    ErrorKind::Parse
  );
  assert_eq!(compile_err("class Main { } extra"), ErrorKind::Parse);
  assert_eq!(compile_err("let x = 1;"), ErrorKind::Parse);
}
