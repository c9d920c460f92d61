//! Well-known sights for realistic itinerary fixtures.
//!
//! Coordinates are approximate public map positions; categories use the
//! labels a trip-management frontend would send.

use trip_planner::Poi;

/// A named sight with coordinates, category and suggested visit length.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub category: &'static str,
    pub minutes: u32,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64, category: &'static str, minutes: u32) -> Self {
        Self {
            name,
            lat,
            lng,
            category,
            minutes,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_poi(&self, id: impl Into<String>) -> Poi {
        Poi::new(id, self.lat, self.lng)
            .named(self.name)
            .category(self.category)
            .duration(self.minutes)
    }
}

// ============================================================================
// Beijing, central
// ============================================================================

pub const BEIJING_CENTRAL: &[Location] = &[
    Location::new("Forbidden City", 39.9163, 116.3972, "博物馆", 180),
    Location::new("Tiananmen Square", 39.9055, 116.3976, "plaza", 45),
    Location::new("National Museum of China", 39.9050, 116.4010, "museum", 150),
    Location::new("Jingshan Park", 39.9254, 116.3967, "park", 60),
    Location::new("Beihai Park", 39.9254, 116.3893, "公园", 90),
    Location::new("Nanluoguxiang", 39.9368, 116.4034, "商业街", 90),
    Location::new("Drum Tower", 39.9409, 116.3931, "历史建筑", 45),
    Location::new("Lama Temple", 39.9470, 116.4174, "temple", 75),
    Location::new("Temple of Confucius", 39.9465, 116.4139, "temple", 60),
    Location::new("Wangfujing Street", 39.9149, 116.4108, "commercial street", 90),
    Location::new("Quanjude Qianmen", 39.8990, 116.3980, "restaurant", 90),
    Location::new("Temple of Heaven", 39.8828, 116.4067, "公园", 120),
];

// ============================================================================
// Beijing, outskirts
// ============================================================================

pub const BEIJING_OUTSKIRTS: &[Location] = &[
    Location::new("Summer Palace", 39.9998, 116.2754, "公园", 240),
    Location::new("Old Summer Palace", 40.0080, 116.2982, "historic site", 120),
    Location::new("Fragrant Hills", 39.9917, 116.1883, "park", 150),
    Location::new("Badaling Great Wall", 40.3584, 116.0138, "历史遗迹", 300),
    Location::new("Mutianyu Great Wall", 40.4319, 116.5704, "historic site", 240),
];

// ============================================================================
// Shanghai
// ============================================================================

pub const SHANGHAI: &[Location] = &[
    Location::new("The Bund", 31.2397, 121.4912, "scenic viewpoint", 120),
    Location::new("Oriental Pearl Tower", 31.2397, 121.4995, "观景台", 150),
    Location::new("Yu Garden", 31.2276, 121.4923, "园林", 120),
    Location::new("Tianzifang", 31.2108, 121.4644, "艺术区", 90),
];

// ============================================================================
// Xi'an
// ============================================================================

pub const XIAN: &[Location] = &[
    Location::new("Terracotta Army Museum", 34.3848, 109.2734, "博物馆", 180),
    Location::new("Big Wild Goose Pagoda", 34.2186, 108.9647, "历史建筑", 120),
    Location::new("Xi'an City Wall", 34.2583, 108.9286, "历史遗迹", 150),
    Location::new("Huaqing Palace", 34.3622, 109.2122, "历史遗迹", 120),
    Location::new("Muslim Quarter", 34.2633, 108.9375, "美食街", 90),
];

/// POIs for `locations`, ids prefixed with `prefix`.
pub fn pois(prefix: &str, locations: &[Location]) -> Vec<Poi> {
    locations
        .iter()
        .enumerate()
        .map(|(i, location)| location.to_poi(format!("{}_{}", prefix, i + 1)))
        .collect()
}

/// Every fixture POI in one list.
pub fn all_pois() -> Vec<Poi> {
    let mut all = pois("bj", BEIJING_CENTRAL);
    all.extend(pois("bjx", BEIJING_OUTSKIRTS));
    all.extend(pois("sh", SHANGHAI));
    all.extend(pois("xa", XIAN));
    all
}
