extern crate bril;

use bril::diagnostic::DiagnosticKind;
use bril::diagnostic::Diagnostics;
use bril::shared::SharedExt;
use bril::tester::Tester;
use bril::verify::verify;
use bril::verify::VerifyConfig;
use indoc::indoc;

#[test]
fn verify_load_and_store() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : !bril.ptr<i32>, %x : i32) {
      %0 = "bril.load"(%p) : (!bril.ptr<i32>) -> i32
      "bril.store"(%p, %x) : (!bril.ptr<i32>, i32) -> ()
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    assert!(Tester::verify(&module).is_empty());
}

#[test]
fn verify_load_result_mismatch() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : !bril.ptr<i32>) {
      %0 = "bril.load"(%p) : (!bril.ptr<i32>) -> f32
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    assert_eq!(
        Tester::verify_messages(&module),
        vec!["loc(:2:3): error: 'bril.load' op result type must match pointee type of pointer"]
    );
}

#[test]
fn verify_store_to_integer() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : i32, %x : i32) {
      "bril.store"(%p, %x) : (i32, i32) -> ()
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    let diagnostics = Tester::verify(&module);
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.first().unwrap();
    assert_eq!(diagnostic.kind(), DiagnosticKind::TypeMismatch);
    assert_eq!(diagnostic.message(), "expected 'ptr' type for 'ptr' operand");
}

#[test]
fn verify_structure_before_pointer_check() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : i32, %x : i32) {
      "bril.store"(%p) : (i32) -> ()
      %0 = "bril.load"(%p, %x) : (i32, i32) -> i32
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    assert_eq!(
        Tester::verify_messages(&module),
        vec![
            "loc(:2:3): error: 'bril.store' op expected 2 operands, but found 1",
            "loc(:3:3): error: 'bril.load' op expected 1 operands, but found 2",
        ]
    );
}

#[test]
fn verify_collects_errors() {
    Tester::init_tracing();
    let src = indoc! {r#"
    func.func @first(%p : !bril.ptr<i64>, %f : f64) {
      %0 = "bril.load"(%p) : (!bril.ptr<i64>) -> f64
      "bril.store"(%p, %f) : (!bril.ptr<i64>, f64) -> ()
      return
    }
    func.func @second(%q : i64) -> i64 {
      %0 = "bril.load"(%q) : (i64) -> i64
      return %0 : i64
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    assert_eq!(
        Tester::verify_messages(&module),
        vec![
            "loc(:2:3): error: 'bril.load' op result type must match pointee type of pointer",
            "loc(:3:3): error: 'bril.store' op value type must match pointee type of pointer",
            "loc(:7:3): error: 'bril.load' op expected 'ptr' type for 'ptr' operand",
        ]
    );

    let limited = verify(&*module.rd(), &VerifyConfig::new(1));
    assert_eq!(limited.len(), 1);
}

#[test]
fn verify_twice() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : !bril.ptr<i1>) {
      %0 = "bril.load"(%p) : (!bril.ptr<i1>) -> i8
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, actual) = Tester::parse(src);
    let first = Tester::verify_messages(&module);
    let second = Tester::verify_messages(&module);
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    // Verification does not modify the IR.
    assert_eq!(module.rd().to_string(), actual);
}

#[test]
fn verify_concurrently() {
    Tester::init_tracing();
    let src = indoc! {r#"
    func.func @a(%p : !bril.ptr<i32>) {
      %0 = "bril.load"(%p) : (!bril.ptr<i32>) -> i32
      return
    }
    func.func @b(%p : !bril.ptr<i32>) {
      %0 = "bril.load"(%p) : (!bril.ptr<i32>) -> i64
      return
    }
    func.func @c(%p : f32, %v : f32) {
      "bril.store"(%p, %v) : (f32, f32) -> ()
      return
    }
    "#};
    let (module, _actual) = Tester::parse(src);
    let funcs = module.rd().ops();
    let config = VerifyConfig::default();
    let sequential = funcs
        .iter()
        .map(|func| verify(&*func.rd(), &config).to_string())
        .collect::<Vec<_>>();

    let concurrent = std::thread::scope(|s| {
        let handles = funcs
            .iter()
            .map(|func| s.spawn(move || verify(&*func.rd(), &config).to_string()))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(sequential, concurrent);
    assert_eq!(sequential[0], "");
    assert!(sequential[1].contains("result type must match pointee type of pointer"));
    assert!(sequential[2].contains("expected 'ptr' type for 'ptr' operand"));
}

#[test]
fn verify_render() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%p : !bril.ptr<i64>, %x : i32) {
      "bril.store"(%p, %x) : (!bril.ptr<i64>, i32) -> ()
      "bril.ret"() : () -> ()
    }"#};
    let (module, _actual) = Tester::parse(src);
    let diagnostics: Diagnostics = Tester::verify(&module);
    let rendered = diagnostics.render(src);
    let expected = indoc! {r#"
    ```
    1  | bril.func @main(%p : !bril.ptr<i64>, %x : i32) {
    2  |   "bril.store"(%p, %x) : (!bril.ptr<i64>, i32) -> ()
           ^ error: 'bril.store' op value type must match pointee type of pointer
    ```"#};
    assert_eq!(rendered, expected);
}
