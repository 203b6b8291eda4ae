//! Write synthetic through-focus MTF files for trying out the viewer.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default `sample_data`).

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Through-focus MTF peaks at `best_focus` and falls off as a gaussian.
fn through_focus(z: f64, best_focus: f64, depth: f64, peak: f64) -> f64 {
    peak * (-(z - best_focus).powi(2) / (2.0 * depth.powi(2))).exp()
}

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

    /// Uniform in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

fn join_tab(values: impl IntoIterator<Item = String>) -> String {
    values.into_iter().collect::<Vec<_>>().join("\t")
}

/// One MTF section: `freq \t mtf(z0) \t mtf(z1) ...` per frequency.
fn mtf_rows(
    out: &mut String,
    frequencies: &[f64],
    defocus: &[f64],
    best_focus: f64,
    rng: &mut SimpleRng,
) -> std::fmt::Result {
    for &freq in frequencies {
        // Higher frequencies: lower peak, shallower depth of focus.
        let peak = 95.0 - 0.35 * freq;
        let depth = 60.0 - 0.25 * freq;
        let values = defocus.iter().map(|&z| {
            let mtf = through_focus(z, best_focus, depth, peak) + rng.jitter(0.5);
            format!("{:.1}", mtf.clamp(0.0, 100.0))
        });
        writeln!(out, "{freq}\t{}", join_tab(values))?;
    }
    Ok(())
}

fn thf_body(name: &str, best_focus: (f64, f64), rng: &mut SimpleRng) -> Result<String> {
    let frequencies = [10.0, 26.0, 52.0, 78.0, 104.0, 130.0];
    let defocus: Vec<f64> = (0..21).map(|i| -200.0 + i as f64 * 20.0).collect();
    let positions = join_tab(defocus.iter().map(|z| z.to_string()));

    let mut s = String::new();
    writeln!(s, "Through Focus MTF")?;
    writeln!(s, "Sample: {name}")?;
    writeln!(s)?;
    writeln!(s, "Horizontal Freq (lp/mm)  MTF @")?;
    writeln!(s, "\t{positions}")?;
    mtf_rows(&mut s, &frequencies, &defocus, best_focus.0, rng)?;
    writeln!(s)?;
    writeln!(s, "Vertical Freq (lp/mm)  MTF @")?;
    mtf_rows(&mut s, &frequencies, &defocus, best_focus.1, rng)?;
    writeln!(s, "Defocus Intensity Data: Horiz\tVert")?;
    for _ in &defocus {
        writeln!(s, "{:.3}\t{:.3}", 0.9 + rng.jitter(0.05), 0.9 + rng.jitter(0.05))?;
    }
    writeln!(s)?;
    writeln!(s, "Defocus Position")?;
    writeln!(s, "{positions}")?;
    writeln!(s)?;
    Ok(s)
}

fn main() -> Result<()> {
    env_logger::init();

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let lenses = [("set1a+17-0", 0.0), ("set1a-33-90", 1.0), ("set1b+17-0", 2.0), ("set1b-33-90", 3.0)];

    for (name, k) in lenses {
        let best_focus = (rng.jitter(30.0) + 10.0 * k, rng.jitter(30.0) - 10.0 * k);
        let body = thf_body(name, best_focus, &mut rng)?;
        // Exercise both extension cases.
        let ext = if k as usize % 2 == 0 { "thf" } else { "THF" };
        let path = output_dir.join(format!("{name}.{ext}"));
        std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    println!(
        "Wrote {} through-focus MTF files to {}",
        lenses.len(),
        output_dir.display()
    );
    Ok(())
}
