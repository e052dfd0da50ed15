//! Restaurant attributes submitted for rating prediction

use serde::{Deserialize, Serialize};

/// Accepted range for the total vote count
pub const TOTAL_VOTES_MIN: i64 = 0;
pub const TOTAL_VOTES_MAX: i64 = 16_832;

/// Accepted range for the cost for two people
pub const COST_FOR_TWO_MIN: i64 = 40;
pub const COST_FOR_TWO_MAX: i64 = 6_000;

/// One user submission describing a restaurant.
///
/// Field values are kept exactly as entered; validation and encoding happen
/// in the feature extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Whether the restaurant accepts online orders ("Yes" / "No")
    pub online_orders: String,

    /// Whether the restaurant takes table bookings ("Yes" / "No")
    pub book_table: String,

    /// Number of votes the restaurant received
    pub total_votes: i64,

    /// Neighbourhood the restaurant is listed under
    pub restaurant_location: String,

    /// Restaurant type, e.g. "Casual Dining" or "Cafe, Bakery"
    pub restaurant_type: String,

    /// Cuisine list as a single category, e.g. "Chinese, Mughlai"
    pub cuisine_types: String,

    /// Approximate cost for two people
    pub cost_for_two: i64,

    /// Listing service, e.g. "Delivery" or "Dine-out"
    pub restaurant_service: String,
}

impl PredictionRequest {
    /// Example request used in docs and tests
    pub fn example() -> Self {
        Self {
            online_orders: "Yes".to_string(),
            book_table: "No".to_string(),
            total_votes: 120,
            restaurant_location: "Indiranagar".to_string(),
            restaurant_type: "Cafe".to_string(),
            cuisine_types: "Chinese, Mughlai".to_string(),
            cost_for_two: 500,
            restaurant_service: "Dine-out".to_string(),
        }
    }
}
