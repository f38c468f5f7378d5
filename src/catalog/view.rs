//! Flat, one-row-per-restaurant view of the catalog.
//!
//! The query engine has no array column type, so `dishes` is joined into a
//! single comma-separated string here, before any query runs.

use super::model::Restaurant;

/// Separator used when flattening the served-dishes list.
pub const DISH_SEPARATOR: &str = ", ";

/// Column names of the `restaurants` relation, in table order.
pub const COLUMNS: [&str; 9] = [
    "district_name",
    "restaurant_name",
    "restaurant_cuisine",
    "signature_dish",
    "dishes",
    "average_price_per_person",
    "rating_food_stars",
    "rating_service_stars",
    "capacity_persons",
];

/// A denormalized catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub district_name: &'static str,
    pub restaurant_name: String,
    pub restaurant_cuisine: &'static str,
    pub signature_dish: String,
    pub dishes: String,
    pub average_price_per_person: i64,
    pub rating_food_stars: i64,
    pub rating_service_stars: i64,
    pub capacity_persons: i64,
}

impl From<&Restaurant> for CatalogRow {
    fn from(r: &Restaurant) -> Self {
        Self {
            district_name: r.district.as_str(),
            restaurant_name: r.name.clone(),
            restaurant_cuisine: r.cuisine.as_str(),
            signature_dish: r.signature_dish.clone(),
            dishes: r.dishes.join(DISH_SEPARATOR),
            average_price_per_person: r.average_price_per_person,
            rating_food_stars: i64::from(r.rating_food_stars),
            rating_service_stars: i64::from(r.rating_service_stars),
            capacity_persons: r.capacity_persons,
        }
    }
}

/// Materialize the flat view, preserving catalog order.
pub fn flatten(restaurants: &[Restaurant]) -> Vec<CatalogRow> {
    restaurants.iter().map(CatalogRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{Cuisine, District};

    #[test]
    fn test_dishes_are_comma_joined() {
        let restaurant = Restaurant {
            district: District::East,
            name: "TokyoExpress".to_string(),
            cuisine: Cuisine::Japanese,
            signature_dish: "ramen".to_string(),
            dishes: vec!["sushi".to_string(), "miso soup".to_string()],
            average_price_per_person: 22,
            rating_food_stars: 5,
            rating_service_stars: 2,
            capacity_persons: 30,
        };
        let rows = flatten(std::slice::from_ref(&restaurant));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dishes, "sushi, miso soup");
        assert_eq!(rows[0].district_name, "East District");
        assert_eq!(rows[0].restaurant_cuisine, "japanese");
    }
}
