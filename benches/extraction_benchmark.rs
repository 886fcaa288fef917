//! Document strategy and fabrication inference throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scraper::Html;
use storefront_harvest::infrastructure::parsing::{
    ContextualParser, DetailParseContext, FabricationMatcher, ProductDetailParser, StorefrontProduct,
};
use storefront_harvest::domain::CanonicalProductRecord;

const PRODUCT_PAGE: &str = r#"<html><head>
    <meta property="og:image" content="//cdn.shop.com/files/hoodie.jpg">
    <meta name="description" content="Brushed fleece hoodie">
</head><body>
    <nav><ul><li>Women</li><li>Men</li><li>Sale</li></ul></nav>
    <main>
        <div class="product__title"><h1>Cloud Hoodie</h1></div>
        <span class="price-item--regular">$120.00</span>
        <div class="product__description"><p>Brushed fleece with a relaxed fit.</p>
            <p>Material: 80% Organic Cotton, 20% Recycled Polyester.</p></div>
        <div data-option-name="Size">
            <span class="swatch-element">XS</span><span class="swatch-element">S</span>
            <span class="swatch-element">M</span><span class="swatch-element">L</span>
        </div>
    </main>
</body></html>"#;

const STRUCTURED: &str = r#"{"product":{"title":"Cloud Hoodie","price":12000,
    "description":"<p>Brushed fleece.</p><p>Made from organic cotton.</p>",
    "variants":[{"option1":"XS"},{"option1":"S"},{"option1":"M"},{"option1":"L"}],
    "images":[{"src":"//cdn.shop.com/files/hoodie.jpg"}]}}"#;

fn bench_document_strategy(c: &mut Criterion) {
    let parser = ProductDetailParser::new().unwrap();
    let context = DetailParseContext::new("https://shop.com/products/cloud-hoodie", "https://shop.com");

    // Late cascade rules match here, so every field walks its fallbacks
    c.bench_function("document_strategy_fallback_rules", |b| {
        b.iter(|| {
            let document = Html::parse_document(black_box(PRODUCT_PAGE));
            parser.parse_with_context(&document, &context).unwrap()
        })
    });
}

fn bench_structured_strategy(c: &mut Criterion) {
    let matcher = FabricationMatcher::new().unwrap();
    let url = "https://shop.com/products/cloud-hoodie";

    c.bench_function("structured_strategy_apply", |b| {
        b.iter(|| {
            let mut record = CanonicalProductRecord::empty(url);
            StorefrontProduct::parse(url, black_box(STRUCTURED))
                .unwrap()
                .apply_to(&mut record, "https://shop.com", &matcher);
            record
        })
    });
}

fn bench_fabrication(c: &mut Criterion) {
    let matcher = FabricationMatcher::new().unwrap();
    let mut group = c.benchmark_group("fabrication");

    group.bench_function("label", |b| {
        b.iter(|| matcher.infer(black_box("Relaxed fit. Fabric: 100% Linen. Machine wash cold.")))
    });
    group.bench_function("composition", |b| {
        b.iter(|| matcher.infer(black_box("Shell is 80% Nylon, 20% Spandex with a brushed back")))
    });
    group.bench_function("no_match", |b| {
        b.iter(|| matcher.infer(black_box("A lightweight layer for warm evenings and early mornings")))
    });
    group.finish();
}

criterion_group!(benches, bench_document_strategy, bench_structured_strategy, bench_fabrication);
criterion_main!(benches);
