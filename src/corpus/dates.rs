//! A synthetic corpus of human written dates and their ISO 8601 form. It's handy for checking a
//! sequence to sequence setup works before pointing it at a real lexicon, the mapping is learnable
//! and there's an unlimited amount of it.
use super::*;
use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Formats the human side is drawn from. The first four mirror the usual short, medium, long and
/// full locale formats for English, the rest are hand written day/month/year variations.
const FORMATS: &[&str] = &[
    "%-m/%-d/%y",
    "%b %-d, %Y",
    "%B %-d, %Y",
    "%A, %B %-d, %Y",
    "%-d %b %Y",
    "%-d %B %Y",
    "%d %b %Y",
    "%-d %b, %Y",
    "%-d %B, %Y",
    "%d, %b %Y",
    "%-d %m %y",
    "%B %-d %Y",
    "%B %-d, %Y",
    "%d.%m.%y",
];

/// Default number of pairs generated
pub const DEFAULT_SIZE: usize = 50_000;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateCorpus {
    pub seed: u64,
    pub size: usize,
}

impl Default for DateCorpus {
    fn default() -> Self {
        Self {
            seed: 42,
            size: DEFAULT_SIZE,
        }
    }
}

impl DateCorpus {
    pub fn new(seed: u64, size: usize) -> Self {
        Self { seed, size }
    }

    /// Generates one `(human, machine)` pair
    fn create_date(rng: &mut impl Rng, start: NaiveDate, span: u64) -> (String, String) {
        let date = start + Days::new(rng.gen_range(0..span));
        let format = FORMATS[rng.gen_range(0..FORMATS.len())];
        let mut human = date.format(format).to_string();
        // Half the time we change the case
        match rng.gen_range(0..4) {
            1 => human = human.to_uppercase(),
            2 => human = human.to_lowercase(),
            _ => {}
        }
        let machine = date.format("%Y-%m-%d").to_string();
        (human, machine)
    }
}

impl CorpusLoader for DateCorpus {
    fn load(&self) -> Result<ParallelCorpus> {
        if self.size == 0 {
            return Err(PrepError::EmptyCorpus);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let start = NaiveDate::from_ymd_opt(1970, 1, 1)
            .ok_or_else(|| PrepError::Corpus("invalid start date".to_string()))?;
        let end = NaiveDate::from_ymd_opt(2030, 12, 31)
            .ok_or_else(|| PrepError::Corpus("invalid end date".to_string()))?;
        let span = (end - start).num_days() as u64 + 1;

        let (sources, targets) = (0..self.size)
            .map(|_| Self::create_date(&mut rng, start, span))
            .map(|(h, m)| (RawSequence::Word(h), RawSequence::Word(m)))
            .unzip();
        info!("Generated {} synthetic dates", self.size);
        ParallelCorpus::new(sources, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        let a = DateCorpus::new(7, 100).load().unwrap();
        let b = DateCorpus::new(7, 100).load().unwrap();
        let c = DateCorpus::new(8, 100).load().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn targets_are_iso_dates() {
        let corpus = DateCorpus::new(1, 200).load().unwrap();
        for target in &corpus.targets {
            let target = target.as_word().unwrap();
            assert_eq!(target.len(), 10);
            assert!(NaiveDate::parse_from_str(target, "%Y-%m-%d").is_ok());
        }
        assert!(corpus.sources.iter().all(|x| !x.is_empty()));
    }

    #[test]
    fn empty_corpus() {
        assert!(matches!(
            DateCorpus::new(1, 0).load(),
            Err(PrepError::EmptyCorpus)
        ));
    }
}
