use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (city, centre latitude, centre longitude, areas)
const CITIES: [(&str, f64, f64, &[&str]); 4] = [
    ("Bangalore", 12.97, 77.59, &["Koramangala", "Indiranagar", "Jayanagar", "Whitefield"]),
    ("Delhi", 28.61, 77.21, &["Saket", "Dwarka", "Connaught Place"]),
    ("Mumbai", 19.08, 72.88, &["Andheri", "Bandra", "Powai", "Colaba"]),
    ("Pune", 18.52, 73.86, &["Baner", "Kothrud"]),
];

const FOOD_TYPES: [&str; 7] = [
    "North Indian",
    "South Indian",
    "Chinese",
    "Biryani",
    "Pizzas",
    "Desserts",
    "Fast Food",
];

const NAME_PREFIX: [&str; 8] = [
    "Royal", "Spice", "Green", "Urban", "Golden", "Masala", "Tasty", "Hungry",
];
const NAME_SUFFIX: [&str; 6] = ["Kitchen", "Dhaba", "Bistro", "Point", "House", "Express"];

struct Listing {
    city: String,
    area: String,
    restaurant: String,
    price: Option<f64>,
    rating: Option<f64>,
    delivery: String,
    food_type: String,
    latitude: f64,
    longitude: f64,
}

fn generate(rng: &mut SimpleRng, count: usize) -> Vec<Listing> {
    (0..count)
        .map(|_| {
            let (city, lat, lon, areas) = CITIES[rng.below(CITIES.len())];
            let restaurant = format!("{} {}", rng.pick(&NAME_PREFIX), rng.pick(&NAME_SUFFIX));
            let rating = (!rng.chance(0.03)).then(|| (25.0 + rng.next_f64() * 24.0).round() / 10.0);
            let price = (!rng.chance(0.05)).then(|| (100.0 + rng.next_f64() * 700.0).round());
            let delivery = if rng.chance(0.04) {
                "N/A".to_string()
            } else {
                format!("{} mins", 15 + rng.below(60))
            };
            Listing {
                city: city.to_string(),
                area: rng.pick(areas).to_string(),
                restaurant,
                price,
                rating,
                delivery,
                food_type: rng.pick(&FOOD_TYPES).to_string(),
                latitude: lat + (rng.next_f64() - 0.5) * 0.2,
                longitude: lon + (rng.next_f64() - 0.5) * 0.2,
            }
        })
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Source-style headers without coordinates, so the city rollup is used.
fn write_csv(path: &str, rows: &[Listing]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(["City", "Area", "Restaurant", "Price", "Avg ratings", "Delivery time", "Food type"])
        .expect("Failed to write header");
    for r in rows {
        let price = fmt_opt(r.price);
        let rating = fmt_opt(r.rating);
        writer
            .write_record([
                r.city.as_str(),
                r.area.as_str(),
                r.restaurant.as_str(),
                price.as_str(),
                rating.as_str(),
                r.delivery.as_str(),
                r.food_type.as_str(),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

/// Same listings plus coordinates, so the geo view is used.
fn write_parquet(path: &str, rows: &[Listing]) {
    let text = |f: fn(&Listing) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&Listing) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("City", DataType::Utf8, false),
        Field::new("Area", DataType::Utf8, false),
        Field::new("Restaurant", DataType::Utf8, false),
        Field::new("Price", DataType::Float64, true),
        Field::new("Avg ratings", DataType::Float64, true),
        Field::new("Delivery time", DataType::Utf8, false),
        Field::new("Food type", DataType::Utf8, false),
        Field::new("Latitude", DataType::Float64, true),
        Field::new("Longitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.city.as_str()),
            text(|r| r.area.as_str()),
            text(|r| r.restaurant.as_str()),
            number(|r| r.price),
            number(|r| r.rating),
            text(|r| r.delivery.as_str()),
            text(|r| r.food_type.as_str()),
            number(|r| Some(r.latitude)),
            number(|r| Some(r.longitude)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 500);

    write_csv("sample_listings.csv", &rows);
    write_parquet("sample_listings.parquet", &rows);

    println!(
        "Wrote {} listings to sample_listings.csv and sample_listings.parquet",
        rows.len()
    );
}
