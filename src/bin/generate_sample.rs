use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const GENRES: [(&str, f64, f64); 6] = [
    // (genre, mean IMDB score, mean runtime)
    ("Documentary", 6.9, 85.0),
    ("Drama", 6.4, 110.0),
    ("Comedy", 5.8, 98.0),
    ("Thriller", 5.9, 104.0),
    ("Romantic comedy", 5.7, 100.0),
    ("Concert Film", 7.0, 75.0),
];

const LANGUAGES: [&str; 6] = ["English", "English", "English", "Hindi", "Spanish", "Français"];

const ADJECTIVES: [&str; 8] = [
    "Silent", "Last", "Crimson", "Hidden", "Endless", "Broken", "Golden", "Little",
];
const NOUNS: [&str; 8] = [
    "Harbor", "Summer", "Witness", "Kingdom", "Letters", "Orbit", "Reunion", "Road",
];

/// Premiere values the dashboard cannot parse, mixed in on purpose.
const BAD_PREMIERES: [&str; 3] = ["31-Feb-20", "August 5, 2019", "TBA"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "NetflixOriginals.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record(["Title", "Genre", "Premiere", "Runtime", "IMDB Score", "Language"])?;

    let first_day = NaiveDate::from_ymd_opt(2014, 12, 13).context("valid start date")?;
    let n_films = 120;

    for i in 0..n_films {
        let (genre, score_mean, runtime_mean) = GENRES[i % GENRES.len()];
        let title = format!(
            "The {} {} {}",
            rng.pick(&ADJECTIVES),
            rng.pick(&NOUNS),
            i + 1
        );

        let premiere = if i % 40 == 7 {
            BAD_PREMIERES[(i / 40) % BAD_PREMIERES.len()].to_string()
        } else {
            let offset = (rng.next_f64() * 2200.0) as i64;
            (first_day + Duration::days(offset))
                .format("%d-%b-%y")
                .to_string()
        };

        let runtime = rng.gauss(runtime_mean, 18.0).clamp(4.0, 209.0).round();
        let score = (rng.gauss(score_mean, 0.9).clamp(2.5, 9.0) * 10.0).round() / 10.0;

        writer.write_record([
            title,
            genre.to_string(),
            premiere,
            format!("{runtime}"),
            format!("{score:.1}"),
            rng.pick(&LANGUAGES).to_string(),
        ])?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {n_films} films to {output_path}");
    Ok(())
}
