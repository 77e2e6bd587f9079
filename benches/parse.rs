//! Card text parsing and registry loading throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ccg_rules::cards::CardRegistry;
use ccg_rules::parser::parse;

const CORPUS: &[&str] = &[
    "Land\nSource\n{t}: Add {s}.\n",
    "Knight {2}{s}\nUnit - Human Soldier\nFly\n2/3",
    "Flashcaster {1}{s}\nUnit - Wizard\nWhen you play a spell, Flashcaster deals 1 damage to any target.\n1/2",
    "Bolt {s}\nSpell\nDeal 3 damage to target unit.",
    "Recruiter {2}{c}\nUnit - Human Merchant\nWhen Recruiter is put on the board, create a 1/1 soldier token.\n1/1",
    "Altar {c}{c}\nItem\nSacrifice a unit: draw 2 cards.",
    "Scholar {1}{w}\nUnit - Gnome Wizard\nYou may draw a card, then gain 1 life.\n0/2",
    "Purge {1}{o}\nSpell\nDestroy target non-coin unit with health 2 or less.",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_corpus", |b| {
        b.iter(|| {
            for text in CORPUS {
                let _ = black_box(parse(black_box(text)));
            }
        });
    });

    let text = CORPUS.join("\n\n");
    c.bench_function("registry_load", |b| {
        b.iter(|| CardRegistry::load(black_box(&text)));
    });

    let (registry, _) = CardRegistry::load(&text);
    if let Ok(bytes) = registry.to_bytes() {
        c.bench_function("registry_from_bytes", |b| {
            b.iter(|| CardRegistry::from_bytes(black_box(&bytes)));
        });
    }
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
