use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageOutputFormat, RgbImage};

use matchlens::core::fetch::build_client;
use matchlens::{
    AppError, CatalogStore, ImageEncoder, ImageSource, IngestOutcome, ProductCreate,
    ProductMatcher, Result, SearchOptions,
};

const DIM: usize = 16;

/// Deterministic encoder: embeds an image from its mean channel
/// intensities, so identical images always embed identically.
struct TestEncoder;

impl ImageEncoder for TestEncoder {
    fn dimension(&self) -> usize {
        DIM
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let rgb = image.to_rgb8();
        let pixels = rgb.pixels().count().max(1) as f32;
        let mut sums = [0.0f32; 3];
        for p in rgb.pixels() {
            sums[0] += p[0] as f32;
            sums[1] += p[1] as f32;
            sums[2] += p[2] as f32;
        }
        let mut v = vec![0.0; DIM];
        for (i, slot) in v.iter_mut().enumerate() {
            *slot = sums[i % 3] / pixels + i as f32;
        }
        Ok(v)
    }
}

fn matcher(catalog: Arc<CatalogStore>) -> ProductMatcher {
    let encoder: Arc<dyn ImageEncoder> = Arc::new(TestEncoder);
    ProductMatcher::new(Some(encoder), build_client(1), catalog)
}

fn png(r: u8, g: u8, b: u8) -> ImageSource {
    let mut buf = RgbImage::new(8, 8);
    for pixel in buf.pixels_mut() {
        *pixel = image::Rgb([r, g, b]);
    }
    let img = DynamicImage::ImageRgb8(buf);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
    ImageSource::Bytes(bytes::Bytes::from(out.into_inner()))
}

fn metadata(name: &str, category: &str) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        category: category.to_string(),
        image_url: format!("https://example.com/{}.jpg", name.replace(' ', "-")),
        price: Some(25.0),
        description: Some(format!("Sample {}", name)),
    }
}

#[tokio::test]
async fn search_on_empty_catalog_is_empty_not_an_error() {
    let m = matcher(Arc::new(CatalogStore::in_memory(DIM)));
    let results = m
        .search(png(1, 2, 3), &SearchOptions::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn identical_image_is_a_perfect_match() {
    let m = matcher(Arc::new(CatalogStore::in_memory(DIM)));
    let stored = m
        .ingest(png(120, 30, 200), metadata("Purple Vase", "Home"))
        .await
        .unwrap();

    let options = SearchOptions {
        category: None,
        min_similarity: 0.5,
        limit: 10,
    };
    let results = m.search(png(120, 30, 200), &options).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, stored.id);
    assert!((results[0].similarity_score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn category_filter_and_floor_apply_together() {
    let m = matcher(Arc::new(CatalogStore::in_memory(DIM)));
    for (name, category, color) in [
        ("Laptop", "Electronics", (10u8, 10u8, 10u8)),
        ("Phone", "Electronics", (20, 20, 20)),
        ("Sneaker", "Fashion", (30, 30, 30)),
        ("Jacket", "Fashion", (40, 40, 40)),
        ("Scarf", "Fashion", (200, 200, 200)),
    ] {
        m.ingest(png(color.0, color.1, color.2), metadata(name, category))
            .await
            .unwrap();
    }

    let options = SearchOptions {
        category: Some("Fashion".to_string()),
        min_similarity: 0.9,
        limit: 10,
    };
    let results = m.search(png(35, 35, 35), &options).await.unwrap();

    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result.category, "Fashion");
        assert!(result.similarity_score >= 0.9);
    }
    for pair in results.windows(2) {
        assert!(pair[0].similarity_score >= pair[1].similarity_score);
    }
}

#[tokio::test]
async fn limit_truncates_to_top_scores() {
    let m = matcher(Arc::new(CatalogStore::in_memory(DIM)));
    for (name, color) in [
        ("A", (50u8, 50u8, 50u8)),
        ("B", (60, 60, 60)),
        ("C", (70, 70, 70)),
        ("D", (80, 80, 80)),
        ("E", (90, 90, 90)),
    ] {
        m.ingest(png(color.0, color.1, color.2), metadata(name, "Misc"))
            .await
            .unwrap();
    }

    let options = SearchOptions {
        category: None,
        min_similarity: -1.0,
        limit: 2,
    };
    let results = m.search(png(70, 70, 70), &options).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].similarity_score >= results[1].similarity_score);
}

#[tokio::test]
async fn repeated_queries_return_identical_orderings() {
    let m = matcher(Arc::new(CatalogStore::in_memory(DIM)));
    // Same image for every record forces score ties.
    for name in ["One", "Two", "Three", "Four"] {
        m.ingest(png(128, 128, 128), metadata(name, "Misc"))
            .await
            .unwrap();
    }

    let options = SearchOptions {
        category: None,
        min_similarity: 0.0,
        limit: 10,
    };
    let first = m.search(png(128, 128, 128), &options).await.unwrap();
    let second = m.search(png(128, 128, 128), &options).await.unwrap();

    let ids = |results: &[matchlens::SearchResult]| {
        results.iter().map(|r| r.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    let mut sorted = ids(&first);
    sorted.sort();
    assert_eq!(ids(&first), sorted);
}

#[tokio::test]
async fn unreachable_source_fails_and_stores_nothing() {
    let catalog = Arc::new(CatalogStore::in_memory(DIM));
    let m = matcher(catalog.clone());

    // TEST-NET-1 is guaranteed unroutable; the 1 s client timeout bounds it.
    let err = m
        .ingest(
            ImageSource::Url("http://192.0.2.1/missing.jpg".to_string()),
            metadata("Ghost Product", "Misc"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::SourceUnavailable(_)));
    assert_eq!(catalog.count().await, 0);
}

#[tokio::test]
async fn bulk_ingest_reports_per_item_outcomes() {
    let catalog = Arc::new(CatalogStore::in_memory(DIM));
    let m = matcher(catalog.clone());

    let items = vec![
        (png(10, 20, 30), metadata("First", "Home")),
        (
            ImageSource::Bytes(bytes::Bytes::from_static(b"definitely not a png")),
            metadata("Broken", "Home"),
        ),
        (png(90, 80, 70), metadata("Second", "Home")),
    ];
    let outcomes = m.bulk_ingest(items).await;

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], IngestOutcome::Stored { .. }));
    assert!(matches!(outcomes[1], IngestOutcome::Failed { .. }));
    assert!(matches!(outcomes[2], IngestOutcome::Stored { .. }));
    assert_eq!(catalog.count().await, 2);
}

#[tokio::test]
async fn catalog_contents_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");

    let stored = {
        let catalog = Arc::new(CatalogStore::open(&path, DIM).await.unwrap());
        let m = matcher(catalog);
        m.ingest(png(15, 45, 75), metadata("Keeper", "Home"))
            .await
            .unwrap()
    };

    let catalog = Arc::new(CatalogStore::open(&path, DIM).await.unwrap());
    assert_eq!(catalog.count().await, 1);

    let m = matcher(catalog);
    let results = m
        .search(png(15, 45, 75), &SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, stored.id);
}
