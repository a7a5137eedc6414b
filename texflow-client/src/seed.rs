//! Demo data shown before the first successful read

use serde_json::{Value, json};

pub fn products() -> Value {
    json!([
        {
            "id": "m1",
            "name": "Cotton Silk Blend",
            "category": "Fabric",
            "sku": "TEX-M001",
            "variant": "Gold / 100m",
            "costPrice": 500,
            "sellingPrice": 850,
            "stock": 45,
            "description": "Luxury cotton silk blend for high-end garments.",
            "image": "https://picsum.photos/seed/texm1/200/200"
        },
        {
            "id": "m2",
            "name": "Microfiber Towel",
            "category": "Towel",
            "sku": "TEX-M002",
            "variant": "Blue / Set of 4",
            "costPrice": 200,
            "sellingPrice": 450,
            "stock": 12,
            "description": "Quick-dry microfiber towels.",
            "image": "https://picsum.photos/seed/texm2/200/200"
        }
    ])
}

pub fn suppliers() -> Value {
    json!([
        {
            "id": "ms1",
            "name": "Local Fabrics Co",
            "contact": "1234567890",
            "email": "contact@localfabrics.com"
        }
    ])
}

pub fn customers() -> Value {
    json!([
        {
            "id": "mc1",
            "name": "Walk-in Customer",
            "phone": "9999999999",
            "email": "walkin@example.com"
        }
    ])
}
