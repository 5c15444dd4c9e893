use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dbdie_labeler::catalog::{CatalogEntry, Catalogs};
use dbdie_labeler::labeling::{Labeler, LabelerSelector};
use dbdie_labeler::predictables::FullModelType;
use dbdie_labeler::tables::{Dataset, LabelRow, LabelTable, MatchRecord, MatchTable};

const MATCH_COUNT: i64 = 2_000;

fn setup_dataset() -> Dataset {
    let matches = MatchTable::new((0..MATCH_COUNT).map(|id| MatchRecord {
        id,
        filename: format!("match_{id}.png"),
        match_date: None,
        dbd_version: None,
    }));
    let labels = LabelTable::new((0..MATCH_COUNT).flat_map(|id| {
        (0..=4u8).map(move |player| {
            let mut row = LabelRow::new(id, player);
            row.perks = [Some(2), Some(3), Some(4), Some(5)];
            row.item = Some(20 + id % 3);
            row.addons = [Some(40), Some(41)];
            row
        })
    }));
    Dataset::new(matches, labels)
}

fn setup_catalogs() -> Catalogs {
    let mut catalogs = Catalogs::new();
    let addons: FullModelType = "addons__killer".parse().expect("fmt");
    let mut entries = vec![CatalogEntry::new(0, "NoKillerAddon")];
    entries.extend((0..300).map(|i| CatalogEntry {
        item_id: Some(20 + i % 3),
        rarity_id: Some(i % 5),
        ..CatalogEntry::new(100 + i, format!("Addon {i}"))
    }));
    catalogs.insert_predictables(addons, entries);
    catalogs
}

fn bench_walk_perks(c: &mut Criterion) {
    let data = setup_dataset();
    let fmt: FullModelType = "perks__surv".parse().expect("fmt");
    c.bench_with_input(
        BenchmarkId::new("walk_pending", MATCH_COUNT),
        &data,
        |b, data| {
            b.iter(|| {
                let mut labeler = Labeler::new(data, fmt).expect("labeler");
                while !labeler.done() {
                    black_box(labeler.next(data, false).expect("next"));
                }
            });
        },
    );
}

fn bench_correlated_steps(c: &mut Criterion) {
    let start: FullModelType = "addons__killer".parse().expect("fmt");
    let mut selector =
        LabelerSelector::new(setup_dataset(), setup_catalogs(), start).expect("selector");
    selector.next().expect("next");
    c.bench_function("correlated_back_and_forth", |b| {
        b.iter(|| {
            selector.previous().expect("previous");
            black_box(selector.next().expect("next"));
        });
    });
}

criterion_group!(benches, bench_walk_perks, bench_correlated_steps);
criterion_main!(benches);
