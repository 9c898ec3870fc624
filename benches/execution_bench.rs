use criterion::{black_box, criterion_group, criterion_main, Criterion};
use monkey::{parse_source, tokenize, Evaluator};

const PROGRAM: &str = r#"
    let newAdder = fn(x) { fn(y) { x + y } };
    let addTwo = newAdder(2);
    let compose = fn(f, g) { fn(x) { g(f(x)) } };
    let addFour = compose(addTwo, addTwo);
    let classify = fn(n) {
        if (n > 100) { return "big"; }
        if (n < 0) { return "negative"; }
        "small"
    };
    let total = addFour(10) * 3 - 7 / 2;
    classify(total) + " " + classify(-total)
"#;

fn lexer_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize program", |b| {
        b.iter(|| tokenize(black_box(PROGRAM)))
    });
}

fn parser_benchmark(c: &mut Criterion) {
    c.bench_function("parse program", |b| {
        b.iter(|| parse_source(black_box(PROGRAM)).unwrap())
    });
}

fn evaluator_benchmark(c: &mut Criterion) {
    let program = parse_source(PROGRAM).unwrap();
    c.bench_function("evaluate program", |b| {
        b.iter(|| Evaluator::new().execute(black_box(&program)).unwrap())
    });
}

criterion_group!(benches, lexer_benchmark, parser_benchmark, evaluator_benchmark);
criterion_main!(benches);
