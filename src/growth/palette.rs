use crate::scene::Color;
use super::rng::Distortion;

/// Resolution of the autumn lookup table
pub const AUTUMN_SAMPLES: usize = 100;

/// Colour lookup table sampled from a two-stop linear gradient
#[derive(Debug, Clone)]
pub struct Gradient {
    table: Vec<Color>,
}

impl Gradient {
    /// Pre-sample `samples` colours from `from` to `to`, at pixel centres
    pub fn linear(from: Color, to: Color, samples: usize) -> Self {
        let samples = samples.max(1);
        let table = (0..samples)
            .map(|i| from.lerp(&to, (i as f32 + 0.5) / samples as f32))
            .collect();
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Colour at `index`, clamped to the table
    pub fn at(&self, index: usize) -> Color {
        self.table[index.min(self.table.len() - 1)]
    }

    /// Colour at a uniformly sampled index
    pub fn sample(&self, rng: &mut Distortion) -> Color {
        self.at(rng.index(self.table.len()))
    }
}

/// Yellow to red, the range autumn leaves turn to
pub fn autumn_gradient() -> Gradient {
    Gradient::linear(Color::YELLOW, Color::RED, AUTUMN_SAMPLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autumn_endpoints() {
        let g = autumn_gradient();
        assert_eq!(g.len(), AUTUMN_SAMPLES);

        let first = g.at(0);
        let last = g.at(AUTUMN_SAMPLES - 1);
        assert_eq!(first.r, 1.0);
        assert!(first.g > 0.99);
        assert!(last.g < 0.01);
        assert_eq!(g.at(10_000), last);
    }

    #[test]
    fn test_samples_stay_on_gradient() {
        let g = autumn_gradient();
        let mut rng = Distortion::new(21);
        for _ in 0..200 {
            let c = g.sample(&mut rng);
            assert_eq!(c.r, 1.0);
            assert_eq!(c.b, 0.0);
            assert!((0.0..=1.0).contains(&c.g));
        }
    }
}
