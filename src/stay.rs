//! Dwell-time estimates per stop.

use serde::{Deserialize, Serialize};

use crate::traits::PointOfInterest;

const MEAL_FACTOR: f64 = 1.5;
const OFF_HOURS_FACTOR: f64 = 0.8;

/// Category recognized by the stay model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Museum,
    Park,
    HistoricSite,
    CommercialStreet,
    Restaurant,
    Viewpoint,
    Temple,
    Plaza,
    Architecture,
    Other,
}

impl Category {
    /// Match a free-form label, English or Chinese, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "museum" | "gallery" | "art gallery" | "博物馆" | "美术馆" | "展览馆" => Category::Museum,
            "park" | "garden" | "公园" | "园林" => Category::Park,
            "historic site" | "historical site" | "heritage site" | "历史遗迹" | "古迹" | "遗址" => {
                Category::HistoricSite
            }
            "commercial street" | "shopping street" | "food street" | "商业街" | "古街" | "美食街"
            | "步行街" => Category::CommercialStreet,
            "restaurant" | "餐厅" | "饭店" => Category::Restaurant,
            "scenic viewpoint" | "viewpoint" | "observation deck" | "观景台" => Category::Viewpoint,
            "temple" | "shrine" | "寺庙" | "宗教建筑" => Category::Temple,
            "plaza" | "square" | "广场" => Category::Plaza,
            "architecture" | "historic building" | "历史建筑" | "建筑" => Category::Architecture,
            _ => Category::Other,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Category::Museum => 1.2,
            Category::Park => 1.1,
            Category::HistoricSite => 1.0,
            Category::CommercialStreet => 0.8,
            Category::Restaurant => 0.7,
            Category::Viewpoint => 0.6,
            Category::Temple => 1.0,
            Category::Plaza => 0.7,
            Category::Architecture => 0.9,
            Category::Other => 1.0,
        }
    }

    fn keeps_opening_hours(&self) -> bool {
        matches!(self, Category::Museum | Category::Temple)
    }
}

fn is_meal_time(hour: u32) -> bool {
    matches!(hour, 11..=13 | 17..=19)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StayOptions {
    /// Base dwell time when the POI suggests none.
    pub default_minutes: u32,
    /// Lower bound on any computed stay.
    pub min_minutes: u32,
}

impl Default for StayOptions {
    fn default() -> Self {
        Self {
            default_minutes: 60,
            min_minutes: 15,
        }
    }
}

/// Dwell minutes for `poi` when arriving at `arrival_hour`.
pub fn stay_minutes<P>(poi: &P, arrival_hour: u32, options: &StayOptions) -> u32
where
    P: PointOfInterest + ?Sized,
{
    let base = poi
        .custom_duration_minutes()
        .or_else(|| poi.suggested_duration_minutes())
        .unwrap_or(options.default_minutes);

    adjusted_minutes(base, Category::from_label(poi.category()), arrival_hour, options)
}

/// Apply category and time-of-day factors to a base duration.
///
/// Saturates at `u32::MAX`.
pub fn adjusted_minutes(base_minutes: u32, category: Category, arrival_hour: u32, options: &StayOptions) -> u32 {
    let hour = arrival_hour % 24;
    let mut minutes = base_minutes as f64 * category.multiplier();

    if category == Category::Restaurant && is_meal_time(hour) {
        minutes *= MEAL_FACTOR;
    }
    if category.keeps_opening_hours() && !(9..=17).contains(&hour) {
        minutes *= OFF_HOURS_FACTOR;
    }

    (minutes.round() as u32).max(options.min_minutes)
}
