//! End-to-end scenarios exercising the evaluator through its public `run`
//! entry point, one Brew program at a time.

use brew::{run, CollectStringPrint, ExcType, FixedInput, NoInput, RunError};

fn run_ok(src: &str) -> Vec<String> {
    let mut out = CollectStringPrint::default();
    run(src, &mut out, &mut NoInput).unwrap_or_else(|err| panic!("expected success, got {err}"));
    out.lines().to_vec()
}

fn run_err_kind(src: &str) -> ExcType {
    let mut out = CollectStringPrint::default();
    match run(src, &mut out, &mut NoInput) {
        Err(RunError::Runtime(err)) => err.kind(),
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn closures_with_ref_and_value_params() {
    let src = r#"
        func foo(f1, ref f2){ f1(); f2(); }
        func main(){
            x = 0;
            lam1 = lambda(){ x = x + 1; print(x); };
            lam2 = lambda(){ x = x + 1; print(x); };
            foo(lam1, lam2);
            lam1(); lam2();
        }
    "#;
    assert_eq!(run_ok(src), vec!["1", "1", "1", "2"]);
}

#[test]
fn prototype_chain_method_lookup() {
    let src = r#"
        func main(){
            a = @; a.greet = lambda(){ print("hi"); };
            b = @; b.proto = a;
            b.greet();
        }
    "#;
    assert_eq!(run_ok(src), vec!["hi"]);
}

#[test]
fn overloaded_function_cannot_be_used_as_a_value() {
    let src = r#"
        func f(){ return 1; }
        func f(x){ return x; }
        func main(){ g = f; }
    "#;
    assert_eq!(run_err_kind(src), ExcType::NameError);
}

#[test]
fn int_bool_equality_coercion() {
    let src = r#"
        func main(){ print(-1 == false); print(0 == false); }
    "#;
    assert_eq!(run_ok(src), vec!["false", "true"]);
}

#[test]
fn method_with_this_reassignment() {
    let src = r#"
        func main(){
            p = @; p.n = 3;
            p.m = lambda(){ this.n = this.n + 1; print(this.n); };
            p.m(); p.m();
        }
    "#;
    assert_eq!(run_ok(src), vec!["4", "5"]);
}

#[test]
fn while_with_early_return() {
    let src = r#"
        func count(n){ i = 0; while(i < n){ if(i == 3){ return i; } i = i+1; } return -1; }
        func main(){ print(count(10)); }
    "#;
    assert_eq!(run_ok(src), vec!["3"]);
}

#[test]
fn reference_parameter_writes_through_to_caller() {
    let src = r#"
        func bump(ref n){ n = n + 1; }
        func main(){ q = 10; bump(q); print(q); }
    "#;
    assert_eq!(run_ok(src), vec!["11"]);
}

#[test]
fn lambda_passed_by_value_does_not_leak_mutations() {
    let src = r#"
        func invoke(f){ f(); f(); }
        func main(){
            c = 0;
            counter = lambda(){ c = c + 1; print(c); };
            invoke(counter);
            counter();
        }
    "#;
    // `invoke`'s parameter is a deep-copied lambda: its own private closure
    // accumulates across its two calls (`1`, `2`), independent of the
    // caller's `counter`, whose closure was never touched and so still
    // starts fresh at `1` afterward.
    assert_eq!(run_ok(src), vec!["1", "2", "1"]);
}

#[test]
fn returning_an_object_deep_copies_it() {
    // `passthrough` receives `a` by reference (no copy at the call
    // boundary), so only `return`'s own deep-copy can be responsible for
    // `b` being independent of `a` afterward.
    let src = r#"
        func passthrough(ref o){ return o; }
        func main(){
            a = @; a.n = 1;
            b = passthrough(a);
            b.n = 99;
            print(a.n);
            print(b.n);
        }
    "#;
    assert_eq!(run_ok(src), vec!["1", "99"]);
}

#[test]
fn object_assignment_shares_identity() {
    let src = r#"
        func main(){
            a = @; a.n = 1;
            b = a;
            b.n = 2;
            print(a.n);
        }
    "#;
    assert_eq!(run_ok(src), vec!["2"]);
}

#[test]
fn field_write_never_mutates_prototype_ancestor() {
    let src = r#"
        func main(){
            root = @; root.v = 1;
            mid = @; mid.proto = root;
            child = @; child.proto = mid;
            child.v = 5;
            print(child.v);
            print(mid.v);
            print(root.v);
        }
    "#;
    assert_eq!(run_ok(src), vec!["5", "1", "1"]);
}

#[test]
fn undefined_variable_is_name_error() {
    assert_eq!(run_err_kind("func main(){ print(nope); }"), ExcType::NameError);
}

#[test]
fn calling_an_int_is_a_type_error() {
    assert_eq!(run_err_kind("func main(){ x = 5; x(); }"), ExcType::TypeError);
}

#[test]
fn ordering_rejects_bool_operands() {
    assert_eq!(run_err_kind("func main(){ print(true < false); }"), ExcType::TypeError);
}

#[test]
fn boolean_operators_are_eager_not_short_circuiting() {
    // `false && <TypeError>` still evaluates (and rejects) its right side,
    // since Brew's `&&`/`||` never short-circuit (spec: eager evaluation).
    assert_eq!(run_err_kind(r#"func main(){ print(false && "x"); }"#), ExcType::TypeError);
}

#[test]
fn inputi_reads_and_parses_an_integer() {
    let mut out = CollectStringPrint::default();
    let mut input = FixedInput::new(["42"]);
    let result = run("func main(){ n = inputi(); return n + 1; }", &mut out, &mut input).unwrap();
    assert!(matches!(result, brew::Value::Int(43)));
}

#[test]
fn inputs_returns_the_raw_line() {
    let mut out = CollectStringPrint::default();
    let mut input = FixedInput::new(["hello there"]);
    run(r#"func main(){ s = inputs(); print(s); }"#, &mut out, &mut input).unwrap();
    assert_eq!(out.lines(), &["hello there".to_string()]);
}

#[test]
fn inputi_prompt_accepts_any_literal_not_just_strings() {
    let mut out = CollectStringPrint::default();
    let mut input = FixedInput::new(["7"]);
    run("func main(){ n = inputi(3); print(n); }", &mut out, &mut input).unwrap();
    assert_eq!(out.lines(), &["3".to_string(), "7".to_string()]);
}

#[test]
fn inputi_with_extra_arguments_is_a_name_error() {
    assert_eq!(run_err_kind("func main(){ n = inputi(1, 2); print(n); }"), ExcType::NameError);
}

#[test]
fn ref_param_with_field_access_actual_binds_by_value() {
    // `o.f` is not "a plain variable reference": passing it to
    // a `ref` parameter evaluates the field instead of erroring, and the
    // callee's mutation does not write back through to the field.
    let src = r#"
        func bump(ref n){ n = n + 1; print(n); }
        func main(){
            o = @; o.n = 10;
            bump(o.n);
            print(o.n);
        }
    "#;
    assert_eq!(run_ok(src), vec!["11", "10"]);
}

#[test]
fn this_assignment_outside_a_method_is_a_name_error() {
    assert_eq!(run_err_kind("func main(){ this = 5; }"), ExcType::NameError);
}

#[test]
fn block_scoped_assignment_does_not_leak_past_if() {
    // `y` is introduced inside the `if` body; referencing it afterward is a
    // fresh, undefined name (block scoping).
    let src = r#"
        func main(){
            x = 1;
            if (x == 1) { y = 2; }
            print(y);
        }
    "#;
    assert_eq!(run_err_kind(src), ExcType::NameError);
}

#[test]
fn function_overloading_dispatches_on_arity() {
    let src = r#"
        func f(){ return 1; }
        func f(x){ return x + 1; }
        func main(){ print(f()); print(f(10)); }
    "#;
    assert_eq!(run_ok(src), vec!["1", "11"]);
}

#[test]
fn string_concatenation_and_int_addition() {
    assert_eq!(run_ok(r#"func main(){ print("a" + "b"); print(1 + 2); }"#), vec!["ab", "3"]);
}

#[test]
fn integer_division_floors_toward_negative_infinity() {
    assert_eq!(run_ok("func main(){ print(-7 / 2); print(7 / 2); }"), vec!["-4", "3"]);
}

#[test]
fn direct_call_at_an_unmatched_arity_is_a_name_error_not_a_variable_fallback() {
    // `f` exists, just not at one argument: this must not fall through to
    // looking up a same-named variable, even though none is in scope here.
    assert_eq!(run_err_kind("func f(){ return 1; } func main(){ print(f(1)); }"), ExcType::NameError);
}

#[test]
fn call_through_variable_at_an_unmatched_arity_is_a_type_error() {
    let src = r#"
        func f(x){ return x; }
        func main(){ g = f; g(1, 2); }
    "#;
    assert_eq!(run_err_kind(src), ExcType::TypeError);
}

#[test]
fn method_call_at_an_unmatched_arity_is_a_name_error() {
    let src = r#"
        func f(x){ return x; }
        func main(){ o = @; o.m = f; o.m(1, 2); }
    "#;
    assert_eq!(run_err_kind(src), ExcType::NameError);
}

#[test]
fn lambda_arity_mismatch_is_a_name_error() {
    assert_eq!(run_err_kind("func main(){ l = lambda(x){ return x; }; l(); }"), ExcType::NameError);
}
