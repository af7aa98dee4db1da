/// Benchmark runner for utterance generation.
///
/// Times the hot paths: a plain widget, a whole table row, a deep context
/// breadcrumb, and loading the built-in tables.

extern crate utter;

use std::time::{Duration, Instant};

use utter::runner::api::{GenerateOptions, Presenter};
use utter::runner::ds::{
    AccessibleRef, FormatMode, MemoryTree, NativeId, ObjectCache, OutputChannel, Role, Snapshot,
    StateSet, TableInfo,
};

const ROWS: usize = 50;
const COLUMNS: usize = 8;
const DEPTH: usize = 12;

struct Fixture {
    cache: ObjectCache,
    checkbox: NativeId,
    cell: NativeId,
    deep: NativeId,
    top: NativeId,
}

fn build_fixture() -> Fixture {
    let tree = MemoryTree::new();
    let frame = tree.add(None, Snapshot::new(Role::Frame).with_name("Bench"));
    let checkbox = tree.add(
        Some(&frame),
        Snapshot::new(Role::CheckBox)
            .with_name("Enable")
            .add_states(StateSet::CHECKABLE | StateSet::CHECKED),
    );

    let table = NativeId::new("table");
    let mut info = TableInfo::new(ROWS, COLUMNS);
    for row in 0..ROWS {
        for column in 0..COLUMNS {
            let id = NativeId::new(format!("cell_{}_{}", row, column));
            info.set_cell(row, column, id.clone());
        }
    }
    tree.add_with_id(
        table.clone(),
        Some(&frame),
        Snapshot::new(Role::Table).with_name("Data").with_table(info),
    );
    for row in 0..ROWS {
        for column in 0..COLUMNS {
            tree.add_with_id(
                NativeId::new(format!("cell_{}_{}", row, column)),
                Some(&table),
                Snapshot::new(Role::TableCell).with_name(format!("r{}c{}", row, column)),
            );
        }
    }

    let mut parent = frame.clone();
    for level in 0..DEPTH {
        parent = tree.add(
            Some(&parent),
            Snapshot::new(Role::Panel).with_name(format!("Panel {}", level)),
        );
    }
    let deep = tree.add(Some(&parent), Snapshot::new(Role::PushButton).with_name("OK"));

    Fixture {
        cache: ObjectCache::new(Box::new(tree)),
        checkbox,
        cell: NativeId::new("cell_25_3"),
        deep,
        top: frame,
    }
}

fn get(fixture: &Fixture, id: &NativeId) -> AccessibleRef {
    fixture.cache.get(id).expect("fixture object")
}

fn time<F: FnMut()>(iterations: u32, mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    start.elapsed()
}

fn main() {
    println!("=======================================================");
    println!("  utter - Generation Benchmarks");
    println!("=======================================================\n");

    let fixture = build_fixture();
    let speech = Presenter::with_defaults(OutputChannel::Speech);
    let braille = Presenter::with_defaults(OutputChannel::Braille);

    let checkbox = get(&fixture, &fixture.checkbox);
    let cell = get(&fixture, &fixture.cell);
    let deep = get(&fixture, &fixture.deep);
    let top = get(&fixture, &fixture.top);

    let results: Vec<(&str, u32, Duration)> = vec![
        (
            "Check box (speech)",
            10_000,
            time(10_000, || {
                speech.generate(&checkbox, FormatMode::Unfocused, None);
            }),
        ),
        (
            "Table row, 8 cells (speech)",
            2_000,
            time(2_000, || {
                speech.reset_point_of_reference();
                speech.generate(&cell, FormatMode::Focused, None);
            }),
        ),
        (
            "Table row, 8 cells (braille)",
            2_000,
            time(2_000, || {
                braille.generate(&cell, FormatMode::Focused, None);
            }),
        ),
        (
            "Context, 12 panels",
            5_000,
            time(5_000, || {
                speech.generate_with(
                    &deep,
                    GenerateOptions::new(FormatMode::Focused).with_prior_object(&top),
                );
            }),
        ),
        (
            "Load + validate defaults",
            200,
            time(200, || {
                Presenter::with_defaults(OutputChannel::Speech);
            }),
        ),
    ];

    println!("{:<32} {:>10} {:>14} {:>14}", "Benchmark", "Runs", "Total", "Per run");
    println!("{}", "-".repeat(74));
    for (name, iterations, elapsed) in &results {
        println!(
            "{:<32} {:>10} {:>12.2?} {:>12.2?}",
            name,
            iterations,
            elapsed,
            *elapsed / *iterations
        );
    }

    println!("\n=======================================================");
    println!("  Output Check");
    println!("=======================================================\n");
    speech.reset_point_of_reference();
    println!("{}", speech.generate(&cell, FormatMode::Focused, None));
    println!("{}", braille.generate(&cell, FormatMode::Focused, None));
}
