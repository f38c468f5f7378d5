//! Generator tables: per-district price/capacity/cuisine weights, per-cuisine
//! dishes and name words.

use crate::catalog::{Cuisine, District};
use serde::Serialize;

/// Sampling parameters for one district.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictSettings {
    pub district: District,
    /// Relative share of restaurants; drives rejection sampling of districts.
    pub relative_restaurants: u32,
    pub price_mu: f64,
    pub price_sigma: f64,
    /// Prices below this are redrawn.
    pub minimum_price: i64,
    /// Inclusive seating capacity range.
    pub capacity_min: i64,
    pub capacity_max: i64,
    /// Integer cuisine weights. A zero weight excludes the cuisine.
    pub cuisine_weights: Vec<(Cuisine, u32)>,
}

/// Dishes and name words for one cuisine.
#[derive(Debug, Clone, Serialize)]
pub struct CuisineSettings {
    pub cuisine: Cuisine,
    pub dishes: Vec<&'static str>,
    /// Middle words of generated names.
    pub name_words: Vec<&'static str>,
}

/// Complete generator configuration.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorSettings {
    pub districts: Vec<DistrictSettings>,
    pub cuisines: Vec<CuisineSettings>,
    /// First words of generated names; `""` means "no prefix".
    pub name_prefixes: Vec<&'static str>,
    /// Last words of generated names; `""` means "no suffix".
    pub name_suffixes: Vec<&'static str>,
    /// Bounds on the total number of dishes (signature included).
    pub min_dishes: usize,
    pub max_dishes: usize,
    pub min_rating: u8,
    pub max_rating: u8,
}

impl GeneratorSettings {
    pub fn district(&self, district: District) -> Option<&DistrictSettings> {
        self.districts.iter().find(|d| d.district == district)
    }

    pub fn cuisine(&self, cuisine: Cuisine) -> Option<&CuisineSettings> {
        self.cuisines.iter().find(|c| c.cuisine == cuisine)
    }

    /// Sum of district relative shares.
    pub fn relative_restaurants_sum(&self) -> u32 {
        self.districts.iter().map(|d| d.relative_restaurants).sum()
    }
}

fn weights(italian: u32, greek: u32, mexican: u32, japanese: u32, indian: u32) -> Vec<(Cuisine, u32)> {
    vec![
        (Cuisine::Italian, italian),
        (Cuisine::Greek, greek),
        (Cuisine::Mexican, mexican),
        (Cuisine::Japanese, japanese),
        (Cuisine::Indian, indian),
    ]
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            districts: vec![
                DistrictSettings {
                    district: District::North,
                    relative_restaurants: 1,
                    price_mu: 50.0,
                    price_sigma: 20.0,
                    minimum_price: 15,
                    capacity_min: 20,
                    capacity_max: 60,
                    cuisine_weights: weights(1, 0, 0, 1, 0),
                },
                DistrictSettings {
                    district: District::East,
                    relative_restaurants: 2,
                    price_mu: 25.0,
                    price_sigma: 10.0,
                    minimum_price: 8,
                    capacity_min: 15,
                    capacity_max: 45,
                    cuisine_weights: weights(0, 0, 1, 2, 1),
                },
                DistrictSettings {
                    district: District::South,
                    relative_restaurants: 2,
                    price_mu: 15.0,
                    price_sigma: 10.0,
                    minimum_price: 5,
                    capacity_min: 10,
                    capacity_max: 40,
                    cuisine_weights: weights(1, 3, 2, 0, 0),
                },
                DistrictSettings {
                    district: District::West,
                    relative_restaurants: 1,
                    price_mu: 10.0,
                    price_sigma: 5.0,
                    minimum_price: 3,
                    capacity_min: 8,
                    capacity_max: 30,
                    cuisine_weights: weights(1, 1, 0, 0, 2),
                },
            ],
            cuisines: vec![
                CuisineSettings {
                    cuisine: Cuisine::Italian,
                    dishes: vec!["pasta", "pizza", "lasagna", "risotto", "pesto", "gelato"],
                    name_words: vec![
                        "Italy", "Rome", "Florence", "Venice", "Milan", "Turin", "Naples",
                        "Palermo", "Catania",
                    ],
                },
                CuisineSettings {
                    cuisine: Cuisine::Greek,
                    dishes: vec![
                        "greek salad",
                        "mousaka",
                        "tzatziki",
                        "pastitsio",
                        "cheese pie",
                        "spinach pie",
                    ],
                    name_words: vec![
                        "Greece",
                        "Athens",
                        "Thessaloniki",
                        "Santorini",
                        "Mykonos",
                        "Paros",
                        "Corfu",
                        "Acropolis",
                        "Parthenon",
                    ],
                },
                CuisineSettings {
                    cuisine: Cuisine::Mexican,
                    dishes: vec![
                        "tacos",
                        "burritos",
                        "quesadillas",
                        "churros",
                        "guacamole",
                        "carnitas",
                    ],
                    name_words: vec![
                        "Mexico",
                        "Tijuana",
                        "Guadalajara",
                        "Monterrey",
                        "Mexicali",
                        "Toluca",
                        "Oaxaca",
                        "Xalapa",
                        "Guadalupe",
                    ],
                },
                CuisineSettings {
                    cuisine: Cuisine::Japanese,
                    dishes: vec![
                        "ramen",
                        "sushi",
                        "sashimi",
                        "miso soup",
                        "okonomiyaki",
                        "tonkatsu",
                    ],
                    name_words: vec![
                        "Japan", "Tokyo", "Kyoto", "Osaka", "Nagoya", "Kobe", "Sapporo",
                        "Fukuoka", "Toyama",
                    ],
                },
                CuisineSettings {
                    cuisine: Cuisine::Indian,
                    dishes: vec![
                        "samosa",
                        "biryani",
                        "naan",
                        "butter chicken",
                        "rogan josh",
                        "tandoori chicken",
                    ],
                    name_words: vec![
                        "India",
                        "Mumbai",
                        "Bengaluru",
                        "Kolkata",
                        "Pune",
                        "Jaipur",
                        "Raipur",
                        "Surat",
                        "Kochi",
                    ],
                },
            ],
            name_prefixes: vec!["", "New", "Old", "Little", "Big", "Great", "Perfect", "Good"],
            name_suffixes: vec!["", "Garden", "Express", "House"],
            min_dishes: 2,
            max_dishes: 4,
            min_rating: 1,
            max_rating: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_cover_every_variant() {
        let settings = GeneratorSettings::default();
        for district in District::ALL {
            assert!(settings.district(district).is_some(), "{district}");
        }
        for cuisine in Cuisine::ALL {
            let c = settings.cuisine(cuisine).unwrap();
            assert_eq!(c.dishes.len(), 6);
            assert_eq!(c.name_words.len(), 9);
        }
        assert_eq!(settings.relative_restaurants_sum(), 6);
    }

    #[test]
    fn test_minimum_price_is_below_mean() {
        for d in GeneratorSettings::default().districts {
            assert!((d.minimum_price as f64) < d.price_mu, "{}", d.district);
            assert!(d.capacity_min > 0 && d.capacity_min <= d.capacity_max);
        }
    }
}
