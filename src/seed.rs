//! Built-in sample catalog used to seed an empty store.

use crate::models::product::{ImageSource, ProductCreate};

/// (name, category, price, image URL) rows for the demo catalog.
const SAMPLE_PRODUCTS: &[(&str, &str, f64, &str)] = &[
    // Electronics
    ("MacBook Pro 16", "Electronics", 2499.0, "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=500"),
    ("Dell XPS 15", "Electronics", 1899.0, "https://images.unsplash.com/photo-1593642632823-8f785ba67e45?w=500"),
    ("iPhone 15 Pro", "Electronics", 999.0, "https://images.unsplash.com/photo-1592286927505-0485968717fc?w=500"),
    ("Samsung Galaxy S24", "Electronics", 899.0, "https://images.unsplash.com/photo-1610945415295-d9bbf067e59c?w=500"),
    ("Wireless Headphones", "Electronics", 249.0, "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500"),
    ("Bluetooth Speaker", "Electronics", 99.0, "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=500"),
    // Fashion
    ("Nike Air Max", "Fashion", 150.0, "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=500"),
    ("Adidas Ultraboost", "Fashion", 180.0, "https://images.unsplash.com/photo-1608231387042-66d1773070a5?w=500"),
    ("Converse Chuck Taylor", "Fashion", 65.0, "https://images.unsplash.com/photo-1607522370275-f14206abe5d3?w=500"),
    ("Leather Jacket", "Fashion", 299.0, "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=500"),
    ("Denim Jacket", "Fashion", 89.0, "https://images.unsplash.com/photo-1576995853123-5a10305d93c0?w=500"),
    // Furniture
    ("Office Chair Ergonomic", "Furniture", 349.0, "https://images.unsplash.com/photo-1580480055273-228ff5388ef8?w=500"),
    ("Wooden Dining Chair", "Furniture", 129.0, "https://images.unsplash.com/photo-1503602642458-232111445657?w=500"),
    ("Coffee Table Modern", "Furniture", 199.0, "https://images.unsplash.com/photo-1618219740975-d40978bb7378?w=500"),
    ("Standing Desk", "Furniture", 449.0, "https://images.unsplash.com/photo-1595515106969-1ce29566ff1c?w=500"),
    // Home
    ("Table Lamp Modern", "Home", 79.0, "https://images.unsplash.com/photo-1507473885765-e6ed057f782c?w=500"),
    ("Wall Mirror Large", "Home", 149.0, "https://images.unsplash.com/photo-1618221195710-dd6b41faaea6?w=500"),
    ("Area Rug", "Home", 199.0, "https://images.unsplash.com/photo-1600166898405-da9535204843?w=500"),
    // Sports
    ("Yoga Mat Premium", "Sports", 49.0, "https://images.unsplash.com/photo-1601925260368-ae2f83cf8b7f?w=500"),
    ("Dumbbell Set", "Sports", 199.0, "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=500"),
    ("Tennis Racket", "Sports", 159.0, "https://images.unsplash.com/photo-1617083278810-f9de9086e4f9?w=500"),
    // Kitchen
    ("Blender High Speed", "Kitchen", 99.0, "https://images.unsplash.com/photo-1570222094114-d054a817e56b?w=500"),
    ("Coffee Maker", "Kitchen", 129.0, "https://images.unsplash.com/photo-1517668808822-9ebb02f2a0e6?w=500"),
    // Accessories
    ("Smartwatch", "Accessories", 299.0, "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500"),
    ("Backpack Leather", "Accessories", 189.0, "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=500"),
];

/// Materialize the sample catalog as bulk-ingestion items.
pub fn sample_products() -> Vec<(ImageSource, ProductCreate)> {
    SAMPLE_PRODUCTS
        .iter()
        .map(|&(name, category, price, url)| {
            (
                ImageSource::Url(url.to_string()),
                ProductCreate {
                    name: name.to_string(),
                    category: category.to_string(),
                    image_url: url.to_string(),
                    price: Some(price),
                    description: None,
                },
            )
        })
        .collect()
}
