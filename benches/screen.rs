//! Screen and dispatch benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ozterm::Terminal;

fn bench_print_chars(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let text = "Hello, World! ".repeat(100);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("print_chars", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80).unwrap();
            terminal.feed(black_box(text.as_bytes()));
            black_box(terminal)
        })
    });

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let mut input = String::new();
    for i in 0..100 {
        input.push_str(&format!("Line {}: Some text content here\r\n", i));
    }
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("scroll", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80).unwrap();
            terminal.feed(black_box(input.as_bytes()));
            black_box(terminal)
        })
    });

    group.finish();
}

fn bench_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // A full-screen repaint, the way a text editor opens.
    let mut input = String::new();
    for row in 1..=24 {
        input.push_str(&format!("\x1b[{};1H", row));
        input.push_str(&"X".repeat(80));
    }
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("full_redraw", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80).unwrap();
            terminal.feed(black_box(input.as_bytes()));
            black_box(terminal)
        })
    });

    group.finish();
}

fn bench_region_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let input = "\x1b[5;20r\x1b[20;1H\n".repeat(200);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("region_scroll", |b| {
        b.iter(|| {
            let mut terminal = Terminal::new(24, 80).unwrap();
            terminal.feed(black_box(input.as_bytes()));
            black_box(terminal)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_print_chars,
    bench_scroll,
    bench_full_redraw,
    bench_region_scroll
);
criterion_main!(benches);
