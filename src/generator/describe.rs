//! Free-text restaurant descriptions.

use crate::catalog::Restaurant;

/// Join words as natural language: `a`, `a and b`, `a, b and c`.
pub fn join_with_and(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Render the description artifact of one restaurant.
pub fn describe(r: &Restaurant) -> String {
    format!(
        "{name} is a restaurant with {cuisine} cuisine\n\
         in {district} serving {dishes}.\n\
         Their signature dish is {signature}.\n\
         The average price per person is ${price}.\n\
         Customers have rated its food with {food} stars on average.\n\
         The service has average rating of {service} stars.\n\
         It can seat up to {capacity} guests.\n",
        name = r.name,
        cuisine = r.cuisine,
        district = r.district,
        dishes = join_with_and(&r.dishes),
        signature = r.signature_dish,
        price = r.average_price_per_person,
        food = r.rating_food_stars,
        service = r.rating_service_stars,
        capacity = r.capacity_persons,
    )
}
