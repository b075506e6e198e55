//! Parser benchmarks.
//!
//! Run with: `cargo bench --package ferritec-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ferritec_par::parse;
use ferritec_util::Handler;

fn parse_source(source: &str) -> usize {
    let handler = Handler::new();
    let file = parse(source, &handler);
    file.body.len()
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let source = "let x = 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("let_statement", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_functions");

    let source = r#"
        func main() {
            let x = 42;
            let y = x + 1;
            return y;
        }

        func fib(n: int32) -> int32 {
            if (n <= 1) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("functions", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_aggregates");

    let source = r#"
        aggregate Point {
            x: int32;
            y: int32;
        }

        aggregate Rectangle {
            origin: Point;
            width: int32;
            height: int32;
        }

        func area(r: Rectangle) -> int32 {
            return r.width * r.height;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("aggregates", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_enums(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_enums");

    let source = r#"
        enum Color {
            Red,
            Green,
            Blue,
        }

        enum Status: int8 {
            Ok = 0,
            Failed = 1,
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("enums", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        func process(n: int32) -> int32 {
            if (n < 0) {
                return -1;
            } elif (n == 0) {
                return 0;
            } else {
                let mut sum = 0;
                let mut i = 0;
                while (i < n) {
                    sum = sum + i;
                    i = i + 1;
                }
                return sum;
            }
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("control_flow", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        module geometry;

        aggregate Point {
            x: int32;
            y: int32;
        }

        func new_point(x: int32, y: int32) -> Point {
            return Point { x = x, y = y };
        }

        func distance(a: Point, b: Point) -> float64 {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            return dx * dx + dy * dy as float64;
        }

        func main() {
            let p = new_point(10, 20);
            let points: int32[5] = [1, 2, 3, 4, 5];
            let total = points[0] + points[1];
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_functions,
    bench_parser_aggregates,
    bench_parser_enums,
    bench_parser_control_flow,
    bench_parser_complex
);
criterion_main!(benches);
