use std::path::Path;

use anyhow::{Context, Result};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    let cities = [
        "New Delhi",
        "Mumbai",
        "Pune",
        "Bangalore",
        "Hyderabad",
        "Kolkata",
    ];
    let first_words = [
        "Spice", "Royal", "Golden", "Blue", "Urban", "Coastal", "Garden", "Old Town",
    ];
    let second_words = [
        "Route", "Kitchen", "Bistro", "Tandoor", "Diner", "House", "Cafe", "Grill",
    ];
    let cuisine_pool = [
        "North Indian",
        "South Indian",
        "Chinese",
        "Thai",
        "Continental",
        "Italian",
        "Mexican",
        "Seafood",
        "Cafe",
        "Desserts",
        "Fast Food",
        "Mughlai",
    ];

    let output_path = "Dataset.csv";
    let mut writer = csv::Writer::from_path(Path::new(output_path))
        .with_context(|| format!("creating {output_path}"))?;

    // Header with deliberately padded labels: the loader is expected to trim.
    writer.write_record([
        "Restaurant ID",
        "Restaurant Name",
        " City ",
        "Cuisines",
        "Price range",
        "Aggregate rating",
        "Votes",
        "Has Online delivery",
    ])?;

    let n_rows = 400;
    for id in 0..n_rows {
        let city = *rng.pick(&cities);
        let name = format!("{} {}", rng.pick(&first_words), rng.pick(&second_words));

        // One to three cuisines, no repeats, joined the way the source data is.
        let mut cuisines: Vec<&str> = Vec::new();
        let n_cuisines = 1 + (rng.next_u64() % 3) as usize;
        while cuisines.len() < n_cuisines {
            let c = *rng.pick(&cuisine_pool);
            if !cuisines.contains(&c) {
                cuisines.push(c);
            }
        }
        let cuisines = cuisines.join(", ");

        // Mid-heavy price distribution on the 1–4 scale.
        let price = rng.gauss(2.3, 0.9).round().clamp(1.0, 4.0) as i64;

        // Ratings cluster around 3.8; roughly one record in twenty has none.
        let rating = if rng.next_f64() < 0.05 {
            String::new()
        } else {
            format!("{:.1}", rng.gauss(3.8, 0.6).clamp(1.0, 5.0))
        };

        let votes = (rng.next_f64().powi(2) * 1500.0) as i64;

        // Occasional messy delivery flags, as seen in real exports.
        let delivery = if rng.next_f64() < 0.4 {
            if rng.next_f64() < 0.1 {
                " Yes "
            } else {
                "Yes"
            }
        } else {
            "No"
        };

        writer.write_record([
            id.to_string(),
            name,
            city.to_string(),
            cuisines,
            price.to_string(),
            rating,
            votes.to_string(),
            delivery.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    // Load the file back through the pipeline as a sanity check.
    let dataset = plateful::load_file(Path::new(output_path))?;
    let all: Vec<usize> = (0..dataset.len()).collect();
    let summary = plateful::aggregate::summarize(&dataset, &all);

    println!(
        "Wrote {} restaurants across {} cities to {output_path} (mean rating {:.2})",
        dataset.len(),
        dataset.cities.len(),
        summary.mean_rating.unwrap_or(0.0)
    );
    Ok(())
}
