use criterion::{black_box, criterion_group, criterion_main, Criterion};

use itemforge::data::{defaults, DataManager};
use itemforge::items::{item_level, BonusData, ItemLevelContext};

fn bench_bonus_fold(c: &mut Criterion) {
    let data = DataManager::builtin();
    let template = defaults::longsword();
    let ids = [
        defaults::BONUS_SUFFIX_OF_THE_BEAR,
        defaults::BONUS_HEROIC,
        defaults::BONUS_PRISMATIC_SOCKET,
        defaults::BONUS_SUFFIX_OF_THE_WHALE,
        defaults::BONUS_HASTE,
        defaults::BONUS_CHEAP_REPAIR,
    ];

    c.bench_function("fold six bonus lists", |b| {
        b.iter(|| BonusData::from_bonus_lists(black_box(&template), black_box(&ids), &data))
    });

    let bonus = BonusData::from_bonus_lists(&template, &ids, &data);
    let ctx = ItemLevelContext { level: 60, min_item_level: 310, min_item_level_cutoff: 300, ..Default::default() };
    c.bench_function("item level", |b| {
        b.iter(|| item_level(black_box(&template), black_box(&bonus), &ctx, 0, &data))
    });

    let heirloom = defaults::heirloom_shoulders();
    let heirloom_bonus = BonusData::new(&heirloom);
    c.bench_function("heirloom item level", |b| {
        b.iter(|| item_level(black_box(&heirloom), &heirloom_bonus, &ItemLevelContext::for_level(black_box(42)), 0, &data))
    });
}

criterion_group!(benches, bench_bonus_fold);
criterion_main!(benches);
