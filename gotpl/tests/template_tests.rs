//! End-to-end template execution scenarios.

use gotpl::{Data, Error, Template, TemplateFn, Value};

fn exec(source: &str) -> String {
    Template::new()
        .execute(source, None)
        .unwrap_or_else(|e| panic!("execute failed: {e}"))
}

// ── Pipelines ─────────────────────────────────────────────────────────────────

#[test]
fn simple_pipelines() {
    let out = exec(
        r#"
{{"\"output\""}}
  A string constant.
{{`"output"`}}
  A raw string constant.
{{print "output"}}
  A function call.
{{"output" | print}}
  A function call whose final argument comes from the previous
  command.
{{print (print "out" "put")}}
  A parenthesized argument.
{{"put" | print "out" | print}}
  A more elaborate call.
{{"output" | print | print}}
  A longer chain."#,
    );
    assert_eq!(
        out,
        r#"
"output"
  A string constant.
"output"
  A raw string constant.
output
  A function call.
output
  A function call whose final argument comes from the previous
  command.
output
  A parenthesized argument.
output
  A more elaborate call.
output
  A longer chain."#
    );
}

#[test]
fn with_scopes() {
    let out = exec(
        r#"
{{with "output"}}{{print .}}{{end}}
  A with action using dot.
{{with $x := "output" | print}}{{$x}}{{end}}
  A with action that creates and uses a variable.
{{with $x := "output"}}{{print $x}}{{end}}
  A with action that uses the variable in another action.
{{with $x := "output"}}{{$x | print}}{{end}}
  The same, but pipelined."#,
    );
    assert_eq!(
        out,
        r#"
output
  A with action using dot.
output
  A with action that creates and uses a variable.
output
  A with action that uses the variable in another action.
output
  The same, but pipelined."#
    );
}

#[test]
fn parentheses() {
    assert_eq!(exec(r#"{{(print "output")}}"#), "output");
    assert_eq!(exec(r#"{{((print "output"))}}"#), "output");
}

#[test]
fn trim_markers() {
    assert_eq!(exec("{{23 -}} < {{- 45}}"), "23<45");
}

#[test]
fn comments_inside_actions() {
    assert_eq!(exec("{{/* a comment */ 7}}"), "7");
}

#[test]
fn empty_action_is_plain_text() {
    assert_eq!(exec("a{{}}b"), "a{{}}b");
}

// ── Data context ──────────────────────────────────────────────────────────────

#[test]
fn member_access() {
    let data = Data::map([("x", Data::from("output"))]);
    let out = Template::new().execute("{{.x}}", Some(data)).unwrap();
    assert_eq!(out, "output");
}

#[test]
fn nested_members() {
    let data = Data::map([("x", Data::map([("y", Data::from("output"))]))]);
    let out = Template::new().execute("{{.x.y}}", Some(data)).unwrap();
    assert_eq!(out, "output");
}

#[test]
fn bare_dot_reads_whole_context() {
    let out = Template::new()
        .execute("{{.}}", Some(Data::from("output")))
        .unwrap();
    assert_eq!(out, "output");
}

#[test]
fn missing_field_fails() {
    let data = Data::map([("x", Data::from(1i64))]);
    assert_eq!(
        Template::new().execute("{{.y}}", Some(data)),
        Err(Error::UndefinedField("y".into()))
    );
}

// ── Functions ─────────────────────────────────────────────────────────────────

#[test]
fn custom_functions() {
    let mut tmpl = Template::new();
    tmpl.register_fn("id", TemplateFn::Arity1(Box::new(|v| v)));
    tmpl.register_fn(
        "add",
        TemplateFn::Arity2(Box::new(|a, b| match (a, b) {
            (Value::Num(a), Value::Num(b)) => Value::Num(a + b),
            _ => Value::Nil,
        })),
    );
    assert_eq!(tmpl.execute(r#"{{id "output"}}"#, None).unwrap(), "output");
    assert_eq!(tmpl.execute("{{add 2 3}}", None).unwrap(), "5");
}

#[test]
fn builtins_in_actions() {
    assert_eq!(exec("{{eq 1 2 1}}"), "true");
    assert_eq!(exec(r#"{{len "foo"}}"#), "3");
    assert_eq!(exec("{{not 0}}"), "true");
    assert_eq!(exec(r#"{{and 1 "x"}}"#), "x");
    assert_eq!(exec(r#"{{or 0 "x"}}"#), "x");
    assert_eq!(exec("{{lt 1 2}}"), "true");
}

#[test]
fn keywords_render() {
    assert_eq!(exec("{{nil}}"), "<nil>");
    assert_eq!(exec("{{true}}"), "true");
    assert_eq!(exec("{{false}}"), "false");
}

#[test]
fn reserved_keywords_fail() {
    for name in ["if", "range", "define", "template", "block", "printf", "call"] {
        assert_eq!(
            Template::new().execute(&format!("{{{{{name}}}}}"), None),
            Err(Error::NotImplemented(name.into())),
            "keyword {name}"
        );
    }
    assert_eq!(
        Template::new().execute("{{range .}}...{{end}}", None),
        Err(Error::NotImplemented("range".into()))
    );
}

// ── Variables ─────────────────────────────────────────────────────────────────

#[test]
fn declaration_renders_its_value_and_persists() {
    assert_eq!(exec("{{$x := 1}}{{$x}}"), "11");
}

#[test]
fn assignment_shadows_in_the_inner_frame() {
    // `$x = 3` requires an existing binding, but the write lands in the
    // innermost frame, so the outer binding survives the block.
    assert_eq!(exec("{{$x := 1}}{{with 2}}{{$x = 3}}{{end}}{{$x}}"), "131");
}

#[test]
fn assignment_without_declaration_fails() {
    assert_eq!(
        Template::new().execute("{{$x = 1}}", None),
        Err(Error::UndefinedVariable("x".into()))
    );
}

#[test]
fn undefined_variable_fails() {
    assert_eq!(
        Template::new().execute("{{$missing}}", None),
        Err(Error::UndefinedVariable("missing".into()))
    );
}

#[test]
fn variable_scope_ends_with_the_block() {
    assert_eq!(
        Template::new().execute(r#"{{with $x := "v"}}{{end}}{{$x}}"#, None),
        Err(Error::UndefinedVariable("x".into()))
    );
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[test]
fn unexpected_end() {
    assert_eq!(
        Template::new().execute("{{end}}", None),
        Err(Error::Syntax("unexpected {{end}}".into()))
    );
}

#[test]
fn unclosed_with() {
    assert_eq!(
        Template::new().execute(r#"{{with "x"}}inside"#, None),
        Err(Error::Syntax("unclosed {{with}}".into()))
    );
}

#[test]
fn leftover_tokens() {
    assert_eq!(
        Template::new().execute("{{1 2}}", None),
        Err(Error::Syntax("literal".into()))
    );
}

#[test]
fn bad_token_reports_offset() {
    assert_eq!(
        Template::new().execute("{{1 % 2}}", None),
        Err(Error::Syntax("% 2 at 2".into()))
    );
}

#[test]
fn incompatible_comparison() {
    assert_eq!(
        Template::new().execute(r#"{{lt 1 "2"}}"#, None),
        Err(Error::TypeMismatch("incompatible types for comparison".into()))
    );
}
