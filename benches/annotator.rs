use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use cryptic_lens::controller::{ClueSubmission, SolveMode};
use cryptic_lens::geometry::{self, Placement, Rect, Viewport};
use cryptic_lens::mock::mock_result;
use cryptic_lens::timeline::{FADE_OUT_MS, SHOW_DELAY_MS};
use cryptic_lens::{GridLayout, Page};

fn bench_positioning(c: &mut Criterion) {
    const ANCHORS: &[(&str, f64, f64)] = &[
        ("left_edge", 5.0, 400.0),
        ("centre", 600.0, 400.0),
        ("top_edge", 900.0, 30.0),
    ];
    let viewport = Viewport::default();
    for &(label, left, top) in ANCHORS {
        let anchor = Rect::new(left, top, 48.0, 16.0);
        c.bench_with_input(BenchmarkId::new("position", label), &anchor, |b, &anchor| {
            b.iter(|| {
                let above = geometry::position(black_box(anchor), None, viewport, Placement::Above);
                let below = geometry::position(black_box(anchor), Some(96.0), viewport, Placement::Below);
                black_box((above, below));
            });
        });
    }
}

fn rendered_page() -> Page {
    let mut page = Page::new(SolveMode::Mock, GridLayout::default());
    if let Ok(ticket) = page.submit(&ClueSubmission::default()) {
        page.settle(&ticket, Ok(mock_result()));
    }
    page
}

fn bench_hover_cycle(c: &mut Criterion) {
    let mut page = rendered_page();
    c.bench_function("hover_cycle::paired", |b| {
        b.iter(|| {
            let shown = page.hover_enter(black_box(2));
            page.advance(SHOW_DELAY_MS);
            page.hover_leave();
            page.advance(FADE_OUT_MS);
            black_box(shown);
        });
    });

    c.bench_function("hover_cycle::sweep", |b| {
        b.iter(|| {
            for position in 0..8 {
                page.hover_enter(black_box(position));
                page.advance(SHOW_DELAY_MS);
            }
            page.hover_leave();
            page.settle_transitions();
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let result = mock_result();
    c.bench_function("render::mock_result", |b| {
        b.iter(|| {
            let mut page = Page::new(SolveMode::Mock, GridLayout::default());
            if let Ok(ticket) = page.submit(&ClueSubmission::default()) {
                page.settle(&ticket, Ok(black_box(result.clone())));
            }
            black_box(page.surface().tokens().count());
        });
    });
}

criterion_group!(benches, bench_positioning, bench_hover_cycle, bench_render);
criterion_main!(benches);
