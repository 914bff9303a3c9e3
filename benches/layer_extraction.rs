//! Criterion benchmarks for page layer reconstruction.
//!
//! The synthetic page is a two-column article: word-level text blocks, a
//! figure between two paragraphs of the left column, and a grid of ruled
//! boxes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use page_layers::elements::Color;
use page_layers::geometry::{Rect, Rotation};
use page_layers::layout::parent_indices;
use page_layers::primitives::{
    BBox, DrawOp, DrawingPrimitive, PageSnapshot, RasterColorSpace, RasterData, RasterPrimitive,
    TextBlock, TextLine, TextSpan,
};
use page_layers::LayerPipeline;

fn word_block(x: f32, y: f32, text: &str) -> TextBlock {
    let bbox = BBox::new(x, y, x + 6.0 * text.len() as f32, y + 12.0);
    TextBlock {
        bbox,
        lines: vec![TextLine {
            bbox,
            spans: vec![TextSpan {
                text: text.to_string(),
                size: 11.0,
                font: "Times-Roman".to_string(),
                color: 0x222222,
                bbox,
            }],
        }],
    }
}

fn synthetic_page() -> PageSnapshot {
    let mut page = PageSnapshot::new(BBox::new(0.0, 0.0, 612.0, 792.0), Rotation::None);

    for column_x in [40.0f32, 330.0] {
        for row in 0..45 {
            let y = 40.0 + row as f32 * 14.0 + if row >= 20 { 60.0 } else { 0.0 };
            let mut x = column_x;
            for word in ["lorem", "ipsum", "dolor", "sit", "amet"] {
                page.text.blocks.push(word_block(x, y, word));
                x += 6.0 * word.len() as f32 + 4.0;
            }
        }
    }

    page.rasters.insert(
        1,
        RasterData {
            width: 64,
            height: 48,
            color_space: RasterColorSpace::Rgb,
            alpha: false,
            samples: vec![128; 64 * 48 * 3],
            smask: None,
        },
    );
    page.images.push(RasterPrimitive {
        xref: 1,
        bbox: BBox::new(40.0, 325.0, 280.0, 375.0),
    });

    for i in 0..20 {
        let x = 40.0 + (i % 5) as f32 * 100.0;
        let y = 500.0 + (i / 5) as f32 * 60.0;
        let rect = BBox::new(x, y, x + 90.0, y + 50.0);
        page.drawings.push(DrawingPrimitive {
            rect,
            items: vec![DrawOp::Rect { rect }],
            stroke: Some(Color::black()),
            fill: None,
            stroke_width: Some(0.5),
        });
    }

    page
}

fn bench_extract_page(c: &mut Criterion) {
    let page = synthetic_page();
    let pipeline = LayerPipeline::new();

    c.bench_function("extract_page (two columns, 450 blocks)", |b| {
        b.iter(|| black_box(pipeline.extract(black_box(&page))));
    });
}

fn bench_hierarchy(c: &mut Criterion) {
    let rects: Vec<Rect> = (0..300)
        .map(|i| {
            let inset = (i % 30) as f32 * 5.0;
            Rect::new(inset, inset, 400.0 - 2.0 * inset, 400.0 - 2.0 * inset)
        })
        .collect();

    c.bench_function("parent_indices (300 rects)", |b| {
        b.iter(|| black_box(parent_indices(black_box(&rects), 2.0)));
    });
}

criterion_group!(benches, bench_extract_page, bench_hierarchy);
criterion_main!(benches);
