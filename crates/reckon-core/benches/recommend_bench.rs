//! Benchmarks for matrix construction and ranking.

#![allow(clippy::unwrap_used)]

use criterion::{Criterion, criterion_group, criterion_main};
use reckon_core::{
    Interaction, RecommendOptions, UserId, UserItemMatrix, popular_items, recommend_for_user,
};
use std::hint::black_box;

/// Deterministic synthetic interactions: every user rates a stride of items.
fn synthetic(users: usize, items: usize, per_user: usize) -> Vec<Interaction> {
    let mut rows = Vec::with_capacity(users * per_user);
    for u in 0..users {
        for k in 0..per_user {
            let i = (u * 7 + k * 13) % items;
            let rating = ((u + k) % 5 + 1) as f64;
            rows.push(Interaction::new(format!("u{u}"), format!("i{i}"), rating));
        }
    }
    rows
}

fn bench_build(c: &mut Criterion) {
    let rows = synthetic(500, 1_000, 40);
    c.bench_function("matrix_build_500x1000", |b| {
        b.iter(|| UserItemMatrix::from_interactions(black_box(&rows)));
    });
}

fn bench_recommend(c: &mut Criterion) {
    let rows = synthetic(500, 1_000, 40);
    let matrix = UserItemMatrix::from_interactions(&rows);
    let user = UserId::new("u42");
    let options = RecommendOptions::default().with_top_n(10);
    c.bench_function("recommend_for_user_500x1000", |b| {
        b.iter(|| recommend_for_user(black_box(&matrix), &user, &options).unwrap());
    });
}

fn bench_popular(c: &mut Criterion) {
    let rows = synthetic(500, 1_000, 40);
    c.bench_function("popular_items_20k", |b| {
        b.iter(|| popular_items(black_box(&rows), 10));
    });
}

criterion_group!(benches, bench_build, bench_recommend, bench_popular);
criterion_main!(benches);
