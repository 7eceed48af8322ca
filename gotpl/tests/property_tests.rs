//! Property-based invariants for the tokenizer and evaluator.

use proptest::prelude::*;

use gotpl::lex::tokenize;
use gotpl::{Data, Template};

proptest! {
    /// Arbitrary input must tokenize to Ok or Err, never panic.
    #[test]
    fn tokenizer_never_panics(s in "\\PC*") {
        let _ = tokenize(&s);
    }
}

proptest! {
    /// Arbitrary template text must execute to Ok or Err, never panic.
    #[test]
    fn execute_never_panics(s in "\\PC*") {
        let _ = Template::new().execute(&s, None);
    }
}

proptest! {
    /// An integer literal action renders the integer back.
    #[test]
    fn integer_literal_round_trip(n in -100_000i64..100_000) {
        let out = Template::new()
            .execute(&format!("{{{{{n}}}}}"), None)
            .unwrap();
        prop_assert_eq!(out, n.to_string());
    }
}

proptest! {
    /// A string literal over a safe alphabet renders itself.
    #[test]
    fn string_literal_round_trip(s in "[a-zA-Z0-9 ]{0,24}") {
        let out = Template::new()
            .execute(&format!("{{{{\"{s}\"}}}}"), None)
            .unwrap();
        prop_assert_eq!(out, s);
    }
}

proptest! {
    /// Piping a value into a function equals passing it as the last
    /// argument.
    #[test]
    fn pipe_threads_final_argument(s in "[a-z]{0,12}") {
        let piped = Template::new()
            .execute(&format!("{{{{\"{s}\" | print}}}}"), None)
            .unwrap();
        let direct = Template::new()
            .execute(&format!("{{{{print \"{s}\"}}}}"), None)
            .unwrap();
        prop_assert_eq!(piped, s.clone());
        prop_assert_eq!(direct, s);
    }
}

proptest! {
    /// `and` returns its first empty operand, else the last; `or` returns
    /// its first non-empty operand, else the last.
    #[test]
    fn and_or_choose_left_to_right(a in 0i64..3, b in 0i64..3) {
        let and_out = Template::new()
            .execute(&format!("{{{{and {a} {b}}}}}"), None)
            .unwrap();
        let or_out = Template::new()
            .execute(&format!("{{{{or {a} {b}}}}}"), None)
            .unwrap();
        let and_want = if a == 0 { a } else { b };
        let or_want = if a != 0 { a } else { b };
        prop_assert_eq!(and_out, and_want.to_string());
        prop_assert_eq!(or_out, or_want.to_string());
    }
}

proptest! {
    /// A `with` block swaps the dot context and restores it afterwards.
    #[test]
    fn with_scopes_are_isolated(s in "[a-z]{1,12}") {
        let out = Template::new()
            .execute(
                r#"{{.}}{{with "X"}}{{.}}{{end}}{{.}}"#,
                Some(Data::from(s.as_str())),
            )
            .unwrap();
        prop_assert_eq!(out, format!("{s}X{s}"));
    }
}

proptest! {
    /// A declared variable stays visible in later actions.
    #[test]
    fn declared_variables_persist(n in 0i64..1000) {
        let out = Template::new()
            .execute(&format!("{{{{$v := {n}}}}} {{{{$v}}}}"), None)
            .unwrap();
        prop_assert_eq!(out, format!("{n} {n}"));
    }
}

proptest! {
    /// `len` counts characters of the string operand.
    #[test]
    fn len_counts_chars(s in "[a-zA-Z0-9]{0,24}") {
        let out = Template::new()
            .execute(&format!("{{{{len \"{s}\"}}}}"), None)
            .unwrap();
        prop_assert_eq!(out, s.chars().count().to_string());
    }
}
