//! Unique restaurant name pools, one per cuisine.

use super::settings::{CuisineSettings, GeneratorSettings};
use crate::catalog::Cuisine;
use crate::types::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Shuffled, draw-without-replacement name pools.
#[derive(Debug)]
pub struct NamePools {
    pools: HashMap<Cuisine, Vec<String>>,
}

impl NamePools {
    /// Build and shuffle every pool, in the settings' cuisine order.
    pub fn build<R: Rng + ?Sized>(settings: &GeneratorSettings, rng: &mut R) -> Self {
        let mut pools = HashMap::with_capacity(settings.cuisines.len());
        for cuisine in &settings.cuisines {
            let mut names = candidate_names(settings, cuisine);
            names.shuffle(rng);
            pools.insert(cuisine.cuisine, names);
        }
        Self { pools }
    }

    /// Take the next name for `cuisine`. An empty pool is a hard stop.
    pub fn pop(&mut self, cuisine: Cuisine) -> Result<String> {
        self.pools
            .get_mut(&cuisine)
            .and_then(Vec::pop)
            .ok_or_else(|| {
                Error::resource_exhausted(format!("no unique names left for {} cuisine", cuisine))
            })
    }

    pub fn remaining(&self, cuisine: Cuisine) -> usize {
        self.pools.get(&cuisine).map_or(0, Vec::len)
    }
}

/// Number of names a settings table can produce across all cuisines.
pub fn total_capacity(settings: &GeneratorSettings) -> usize {
    settings
        .cuisines
        .iter()
        .map(|c| settings.name_prefixes.len() * c.name_words.len() * settings.name_suffixes.len())
        .sum()
}

fn candidate_names(settings: &GeneratorSettings, cuisine: &CuisineSettings) -> Vec<String> {
    let mut names = Vec::with_capacity(
        settings.name_prefixes.len() * cuisine.name_words.len() * settings.name_suffixes.len(),
    );
    for prefix in &settings.name_prefixes {
        for word in &cuisine.name_words {
            for suffix in &settings.name_suffixes {
                names.push(combine_words(&[*prefix, *word, *suffix]));
            }
        }
    }
    names
}

/// Concatenate without spaces, skipping empty words.
fn combine_words(words: &[&str]) -> String {
    words.iter().filter(|w| !w.is_empty()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_combine_words() {
        assert_eq!(combine_words(&["", "Rome", ""]), "Rome");
        assert_eq!(combine_words(&["Little", "Kyoto", "Garden"]), "LittleKyotoGarden");
    }

    #[test]
    fn test_pools_are_globally_unique() {
        let settings = GeneratorSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pools = NamePools::build(&settings, &mut rng);

        let mut seen = HashSet::new();
        for cuisine in Cuisine::ALL {
            assert_eq!(pools.remaining(cuisine), 8 * 9 * 4);
            while let Ok(name) = pools.pop(cuisine) {
                assert!(seen.insert(name));
            }
        }
        assert_eq!(seen.len(), total_capacity(&settings));
    }

    #[test]
    fn test_exhausted_pool_fails() {
        let mut settings = GeneratorSettings::default();
        settings.name_prefixes = vec![""];
        settings.name_suffixes = vec![""];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pools = NamePools::build(&settings, &mut rng);

        for _ in 0..9 {
            pools.pop(Cuisine::Greek).unwrap();
        }
        let err = pools.pop(Cuisine::Greek).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted(_)));
    }
}
