//! Synthetic catalog generator.
//!
//! Deterministic for a fixed `(seed, target_count)`: the RNG is a seeded
//! `ChaCha8Rng` and every draw happens in a fixed order.
//!
//! Sampling steps per accepted restaurant:
//! 1. district: uniform pick, then accepted when a uniform integer in
//!    `[0, sum_of_shares]` falls below the district's share (rejection
//!    sampling, redrawn from scratch on reject)
//! 2. cuisine: integer-weighted pick among the district's cuisines
//! 3. name: popped from the cuisine's pre-shuffled pool
//! 4. dishes: 2–4 distinct dishes, first one is the signature dish
//! 5. price: Gaussian redrawn until it reaches the district minimum, truncated
//! 6. food and service ratings, then seating capacity

pub mod describe;
pub mod names;
pub mod settings;

pub use describe::{describe, join_with_and};
pub use names::NamePools;
pub use settings::{CuisineSettings, DistrictSettings, GeneratorSettings};

use crate::catalog::{Catalog, Cuisine, Restaurant};
use crate::storage::ObjectStore;
use crate::types::{Error, Result, StorageConfig};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// Output
// =============================================================================

/// Id of the n-th (1-based) description artifact.
pub fn description_id(sequence: usize) -> String {
    format!("restaurant-{:04}", sequence)
}

/// Where generated artifacts land inside an object store.
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    pub metadata_key: String,
    pub descriptions_prefix: String,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for CatalogLayout {
    fn from(config: &StorageConfig) -> Self {
        Self {
            metadata_key: config.metadata_key.clone(),
            descriptions_prefix: config.descriptions_prefix.clone(),
        }
    }
}

impl CatalogLayout {
    pub fn description_key(&self, id: &str) -> String {
        format!("{}/{}.txt", self.descriptions_prefix, id)
    }
}

/// Structured records plus one description per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCatalog {
    pub restaurants: Vec<Restaurant>,
    /// `restaurant-NNNN` → description text, in generation order.
    pub descriptions: BTreeMap<String, String>,
}

impl GeneratedCatalog {
    /// The catalog document: a JSON array, four-space indented.
    pub fn catalog_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.restaurants.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Write every description, then the catalog document.
    pub async fn write_to(&self, store: &dyn ObjectStore, layout: &CatalogLayout) -> Result<()> {
        for (id, text) in &self.descriptions {
            store
                .put(&layout.description_key(id), text.clone().into_bytes())
                .await?;
        }
        store.put(&layout.metadata_key, self.catalog_json()?).await?;

        tracing::info!(
            restaurants = self.restaurants.len(),
            metadata_key = %layout.metadata_key,
            "catalog written"
        );
        Ok(())
    }

    pub fn into_catalog(self) -> Catalog {
        Catalog::new(self.restaurants)
    }
}

// =============================================================================
// Generator
// =============================================================================

#[derive(Debug)]
struct DistrictSampler {
    cuisines: Vec<Cuisine>,
    cuisine_index: WeightedIndex<u32>,
    price: Normal<f64>,
}

/// Validated generator with precomputed per-district distributions.
#[derive(Debug)]
pub struct CatalogGenerator {
    settings: GeneratorSettings,
    samplers: Vec<DistrictSampler>,
    relative_sum: u32,
}

impl CatalogGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        if settings.districts.is_empty() {
            return Err(Error::config("generator needs at least one district"));
        }
        let relative_sum = settings.relative_restaurants_sum();
        if relative_sum == 0 {
            return Err(Error::config("district shares sum to zero"));
        }
        if settings.min_dishes == 0 || settings.min_dishes > settings.max_dishes {
            return Err(Error::config(format!(
                "invalid dish bounds {}..={}",
                settings.min_dishes, settings.max_dishes
            )));
        }
        if settings.min_rating > settings.max_rating {
            return Err(Error::config("invalid rating bounds"));
        }
        for cuisine in &settings.cuisines {
            if cuisine.dishes.len() < settings.max_dishes {
                return Err(Error::config(format!(
                    "{} cuisine has {} dishes, need at least {}",
                    cuisine.cuisine,
                    cuisine.dishes.len(),
                    settings.max_dishes
                )));
            }
        }

        let mut samplers = Vec::with_capacity(settings.districts.len());
        for district in &settings.districts {
            if district.capacity_min <= 0 || district.capacity_min > district.capacity_max {
                return Err(Error::config(format!(
                    "invalid capacity range for {}",
                    district.district
                )));
            }
            for (cuisine, weight) in &district.cuisine_weights {
                if *weight > 0 && settings.cuisine(*cuisine).is_none() {
                    return Err(Error::config(format!(
                        "{} references unknown cuisine {}",
                        district.district, cuisine
                    )));
                }
            }
            let cuisines: Vec<Cuisine> = district.cuisine_weights.iter().map(|(c, _)| *c).collect();
            let cuisine_index = WeightedIndex::new(district.cuisine_weights.iter().map(|(_, w)| *w))
                .map_err(|e| {
                    Error::config(format!("cuisine weights for {}: {}", district.district, e))
                })?;
            let price = Normal::new(district.price_mu, district.price_sigma).map_err(|e| {
                Error::config(format!("price distribution for {}: {}", district.district, e))
            })?;
            samplers.push(DistrictSampler {
                cuisines,
                cuisine_index,
                price,
            });
        }

        Ok(Self {
            settings,
            samplers,
            relative_sum,
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate `target_count` restaurants and their descriptions.
    ///
    /// Fails with `ResourceExhausted` if a cuisine's name pool runs dry; no
    /// partial output is returned.
    pub fn generate(&self, seed: u64, target_count: usize) -> Result<GeneratedCatalog> {
        let capacity = names::total_capacity(&self.settings);
        if target_count > capacity {
            return Err(Error::resource_exhausted(format!(
                "requested {} restaurants but only {} unique names exist",
                target_count, capacity
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pools = NamePools::build(&self.settings, &mut rng);
        let mut restaurants = Vec::with_capacity(target_count);
        let mut rejected = 0u64;

        while restaurants.len() < target_count {
            let idx = rng.gen_range(0..self.settings.districts.len());
            let share = self.settings.districts[idx].relative_restaurants;
            if rng.gen_range(0..=self.relative_sum) >= share {
                rejected += 1;
                continue;
            }
            restaurants.push(self.sample_restaurant(idx, &mut pools, &mut rng)?);
        }

        let descriptions = restaurants
            .iter()
            .enumerate()
            .map(|(i, r)| (description_id(i + 1), describe(r)))
            .collect();

        tracing::debug!(seed, target_count, rejected, "catalog generated");
        Ok(GeneratedCatalog {
            restaurants,
            descriptions,
        })
    }

    fn sample_restaurant<R: Rng + ?Sized>(
        &self,
        district_idx: usize,
        pools: &mut NamePools,
        rng: &mut R,
    ) -> Result<Restaurant> {
        let district = &self.settings.districts[district_idx];
        let sampler = &self.samplers[district_idx];

        let cuisine = sampler.cuisines[sampler.cuisine_index.sample(rng)];
        let name = pools.pop(cuisine)?;

        let cuisine_settings = self
            .settings
            .cuisine(cuisine)
            .ok_or_else(|| Error::internal(format!("no settings for {} cuisine", cuisine)))?;
        let count = rng.gen_range(self.settings.min_dishes..=self.settings.max_dishes);
        let mut dishes = rand::seq::index::sample(rng, cuisine_settings.dishes.len(), count)
            .into_iter()
            .map(|i| cuisine_settings.dishes[i].to_string());
        let signature_dish = dishes
            .next()
            .ok_or_else(|| Error::internal("dish sample was empty"))?;
        let dishes: Vec<String> = dishes.collect();

        let minimum = district.minimum_price as f64;
        let price = loop {
            let candidate = sampler.price.sample(rng);
            if candidate >= minimum {
                break candidate as i64;
            }
        };

        let rating_food_stars = rng.gen_range(self.settings.min_rating..=self.settings.max_rating);
        let rating_service_stars =
            rng.gen_range(self.settings.min_rating..=self.settings.max_rating);
        let capacity_persons = rng.gen_range(district.capacity_min..=district.capacity_max);

        Ok(Restaurant {
            district: district.district,
            name,
            cuisine,
            signature_dish,
            dishes,
            average_price_per_person: price,
            rating_food_stars,
            rating_service_stars,
            capacity_persons,
        })
    }
}

/// Generate with the default tables.
pub fn generate(seed: u64, target_count: usize) -> Result<GeneratedCatalog> {
    CatalogGenerator::new(GeneratorSettings::default())?.generate(seed, target_count)
}
