//! Render a small form letter from a nested data context.
//!
//! Run with: cargo run --example letter

use gotpl::{Data, Template, TemplateFn, Value};

fn main() {
    let mut tmpl = Template::with_name("letter");
    tmpl.register_fn(
        "shout",
        TemplateFn::Arity1(Box::new(|v| Value::Str(v.to_string().to_uppercase()))),
    );

    let data = Data::map([
        (
            "sender",
            Data::map([("name", Data::from("Ada")), ("city", Data::from("London"))]),
        ),
        ("subject", Data::from("engines")),
    ]);

    let source = "\
Dear reader,

{{.subject | shout}} news from {{.sender.city}}.
{{with $greeting := \"warm regards\"}}{{$greeting}}{{end}}, {{.sender.name}}
";

    match tmpl.execute(source, Some(data)) {
        Ok(out) => print!("{out}"),
        Err(e) => eprintln!("template failed: {e}"),
    }
}
