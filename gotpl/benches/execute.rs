use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gotpl::lex::tokenize;
use gotpl::{Data, Template};

fn make_template(actions: usize) -> String {
    let chunk = r#"Dear {{.name}}, {{with $n := "letters" | print}}{{len $n}}{{end}} letters. "#;
    chunk.repeat(actions)
}

fn bench_tokenize(c: &mut Criterion) {
    let action = r#"$n := "some value" | print "prefix" | len"#;

    c.bench_function("tokenize_action", |b| {
        b.iter(|| tokenize(black_box(action)))
    });
}

fn bench_execute(c: &mut Criterion) {
    let small = make_template(1);
    let med = make_template(50);
    let large = make_template(500);
    let data = || Some(Data::map([("name", Data::from("Josie"))]));

    let tmpl = Template::new();
    let mut g = c.benchmark_group("execute");

    g.bench_function("small", |b| {
        b.iter(|| tmpl.execute(black_box(&small), data()))
    });
    g.bench_function("med", |b| {
        b.iter(|| tmpl.execute(black_box(&med), data()))
    });
    g.bench_function("large", |b| {
        b.iter(|| tmpl.execute(black_box(&large), data()))
    });

    g.finish();
}

criterion_group!(benches, bench_tokenize, bench_execute);
criterion_main!(benches);
