//! Multi-day trip planner.
//!
//! Clusters POIs into days, sequences each day, then annotates every hop
//! with travel estimates and every stop with a stay estimate.

use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::cluster::{ClusterOptions, DayGroup, MAX_DAYS, cluster_into_days};
use crate::error::OptimizationError;
use crate::haversine::DistanceCache;
use crate::polyline::Polyline;
use crate::sequence::{DEFAULT_EXACT_THRESHOLD, SequenceOptions, SequenceStrategy, sequence_pois};
use crate::stay::{StayOptions, stay_minutes};
use crate::traits::{DistanceProvider, PointOfInterest};
use crate::travel::{self, TransportMode};

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    pub cluster: ClusterOptions,
    pub stay: StayOptions,
    /// Largest day group solved exhaustively. Cost grows as (n-1)!.
    pub exact_threshold: usize,
    /// Polish nearest-neighbour orders with 2-opt.
    pub two_opt: bool,
    /// Plan day groups on the rayon pool.
    pub parallel_days: bool,
    /// Reject unknown transport modes instead of falling back to driving.
    pub strict_transport_mode: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            cluster: ClusterOptions::default(),
            stay: StayOptions::default(),
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            two_opt: false,
            parallel_days: true,
            strict_transport_mode: false,
        }
    }
}

impl PlannerOptions {
    /// Parse options from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, OptimizationError> {
        toml::from_str(source)
            .map_err(|err| OptimizationError::InvalidArgument(format!("invalid planner options: {}", err)))
    }

    fn sequence_options(&self) -> SequenceOptions {
        SequenceOptions {
            exact_threshold: self.exact_threshold,
            two_opt: self.two_opt,
        }
    }
}

/// Parameters of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRequest {
    pub num_days: i32,
    pub daily_time_limit_minutes: u32,
    pub transport_mode: String,
    /// Departure clock, `HH:MM`.
    pub start_time: String,
    pub is_weekend: bool,
    /// Calendar date of day 1, if known.
    pub start_date: Option<NaiveDate>,
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            num_days: 1,
            daily_time_limit_minutes: 480,
            transport_mode: "driving".to_string(),
            start_time: "09:00".to_string(),
            is_weekend: false,
            start_date: None,
        }
    }
}

impl TripRequest {
    pub fn new(num_days: i32) -> Self {
        Self {
            num_days,
            ..Self::default()
        }
    }

    pub fn mode(mut self, transport_mode: impl Into<String>) -> Self {
        self.transport_mode = transport_mode.into();
        self
    }

    pub fn starting_at(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self
    }

    pub fn weekend(mut self, is_weekend: bool) -> Self {
        self.is_weekend = is_weekend;
        self
    }

    pub fn daily_limit(mut self, minutes: u32) -> Self {
        self.daily_time_limit_minutes = minutes;
        self
    }

    pub fn on(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// A directed hop between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEdge<I> {
    pub from_poi_id: I,
    pub to_poi_id: I,
    /// Great-circle distance, whole meters.
    pub distance_meters: f64,
    pub duration_minutes: u32,
    pub mode: TransportMode,
    pub cost: u32,
    pub departure_time: NaiveTime,
    pub geometry: Polyline,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStop<P> {
    pub poi: P,
    /// Arrival clock from the stay-only walk.
    pub arrival_time: NaiveTime,
    pub stay_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "P: Serialize, P::Id: Serialize"))]
pub struct DayPlan<P: PointOfInterest> {
    /// 1-based day index.
    pub day: usize,
    pub date: Option<NaiveDate>,
    pub stops: Vec<PlannedStop<P>>,
    pub routes: Vec<RouteEdge<P::Id>>,
    pub strategy: SequenceStrategy,
    pub total_distance_km: f64,
    pub total_travel_minutes: u32,
    pub total_stay_minutes: u32,
    /// Travel plus stay.
    pub estimated_minutes: u32,
    pub total_cost: u32,
    pub time_exceeded: bool,
}

impl<P: PointOfInterest> DayPlan<P> {
    fn empty(day: usize, date: Option<NaiveDate>) -> Self {
        Self {
            day,
            date,
            stops: Vec::new(),
            routes: Vec::new(),
            strategy: SequenceStrategy::Unchanged,
            total_distance_km: 0.0,
            total_travel_minutes: 0,
            total_stay_minutes: 0,
            estimated_minutes: 0,
            total_cost: 0,
            time_exceeded: false,
        }
    }

    /// Visit order for the day.
    pub fn pois(&self) -> impl Iterator<Item = &P> {
        self.stops.iter().map(|stop| &stop.poi)
    }

    pub fn poi_ids(&self) -> Vec<&P::Id> {
        self.pois().map(|poi| poi.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub total_distance_km: f64,
    /// Sum of travel minutes over all days.
    pub total_duration_minutes: u32,
    pub total_stay_minutes: u32,
    pub total_cost: u32,
    pub total_pois: usize,
    pub num_days: usize,
    pub days_exceeded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "P: Serialize, P::Id: Serialize"))]
pub struct TripPlan<P: PointOfInterest> {
    pub days: Vec<DayPlan<P>>,
    pub summary: TripSummary,
}

/// Per-call settings shared by every day.
#[derive(Debug, Clone)]
struct DayContext {
    mode: TransportMode,
    start_minutes: u32,
    is_weekend: bool,
    daily_limit: u32,
    start_date: Option<NaiveDate>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clock_hour(minutes: u32) -> u32 {
    (minutes / 60) % 24
}

fn clock_time(minutes: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt((minutes % MINUTES_PER_DAY) * 60, 0)
        .unwrap_or_default()
}

fn add_minutes(total: u32, minutes: u32, what: &str) -> Result<u32, OptimizationError> {
    total.checked_add(minutes).ok_or_else(|| {
        OptimizationError::OptimizationFailed(format!("{} overflowed", what))
    })
}

fn sum_minutes(mut values: impl Iterator<Item = u32>, what: &str) -> Result<u32, OptimizationError> {
    values.try_fold(0, |total, minutes| add_minutes(total, minutes, what))
}

fn parse_start_time(value: &str) -> Result<u32, OptimizationError> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        OptimizationError::InvalidArgument(format!("start time '{}' is not HH:MM", value))
    })?;
    Ok(time.hour() * 60 + time.minute())
}

fn stop_label<P: PointOfInterest>(poi: &P, position: usize) -> String {
    if poi.name().is_empty() {
        format!("stop {}", position + 1)
    } else {
        poi.name().to_string()
    }
}

/// Plans trips. Owns the distance memo used by every call.
#[derive(Debug, Default)]
pub struct TripPlanner {
    options: PlannerOptions,
    distances: DistanceCache,
}

impl TripPlanner {
    pub fn new(options: PlannerOptions) -> Self {
        Self {
            options,
            distances: DistanceCache::new(),
        }
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Distinct unordered coordinate pairs in the memo.
    pub fn cached_pairs(&self) -> Result<usize, OptimizationError> {
        Ok(self.distances.len()? / 2)
    }

    pub fn clear_cache(&self) -> Result<(), OptimizationError> {
        self.distances.clear().map_err(OptimizationError::from)
    }

    /// Build a day-by-day itinerary for `pois`.
    pub fn optimize<P>(&self, pois: &[P], request: &TripRequest) -> Result<TripPlan<P>, OptimizationError>
    where
        P: PointOfInterest + Clone + Send + Sync,
        P::Id: Send + Sync,
    {
        let span = info_span!("optimize", pois = pois.len(), num_days = request.num_days);
        let _guard = span.enter();

        if pois.is_empty() {
            return Err(OptimizationError::EmptyInput);
        }
        if request.num_days <= 0 {
            return Err(OptimizationError::InvalidArgument(format!(
                "number of days must be positive, got {}",
                request.num_days
            )));
        }
        // Each day is allocated up front, even when empty.
        if request.num_days as usize > MAX_DAYS {
            return Err(OptimizationError::InvalidArgument(format!(
                "number of days must be at most {}, got {}",
                MAX_DAYS, request.num_days
            )));
        }

        let context = self.day_context(request)?;

        for poi in pois {
            poi.location().validate().map_err(|err| {
                OptimizationError::OptimizationFailed(format!("POI {:?}: {}", poi.id(), err))
            })?;
        }

        let groups = cluster_into_days(pois, request.num_days as usize, &self.options.cluster)?;

        let days: Vec<DayPlan<P>> = if self.options.parallel_days {
            groups
                .into_par_iter()
                .map(|group| self.plan_day(group, &context))
                .collect::<Result<_, _>>()?
        } else {
            groups
                .into_iter()
                .map(|group| self.plan_day(group, &context))
                .collect::<Result<_, _>>()?
        };

        let summary = TripSummary {
            total_distance_km: round2(days.iter().map(|d| d.total_distance_km).sum()),
            total_duration_minutes: sum_minutes(days.iter().map(|d| d.total_travel_minutes), "trip travel time")?,
            total_stay_minutes: sum_minutes(days.iter().map(|d| d.total_stay_minutes), "trip stay time")?,
            total_cost: sum_minutes(days.iter().map(|d| d.total_cost), "trip cost")?,
            total_pois: pois.len(),
            num_days: days.len(),
            days_exceeded: days.iter().filter(|d| d.time_exceeded).count(),
        };

        info!(
            distance_km = summary.total_distance_km,
            travel_minutes = summary.total_duration_minutes,
            days_exceeded = summary.days_exceeded,
            cache_hits = self.distances.hits(),
            cache_misses = self.distances.misses(),
            "trip optimized"
        );

        Ok(TripPlan { days, summary })
    }

    fn day_context(&self, request: &TripRequest) -> Result<DayContext, OptimizationError> {
        let start_minutes = parse_start_time(&request.start_time)?;

        let mode = if self.options.strict_transport_mode {
            request.transport_mode.parse::<TransportMode>()?
        } else {
            TransportMode::from_label(&request.transport_mode)
        };
        if !mode.is_known() {
            warn!(mode = %mode, "unknown transport mode, using driving speed without surcharges");
        }

        Ok(DayContext {
            mode,
            start_minutes,
            is_weekend: request.is_weekend,
            daily_limit: request.daily_time_limit_minutes,
            start_date: request.start_date,
        })
    }

    fn plan_day<P>(&self, group: DayGroup<P>, context: &DayContext) -> Result<DayPlan<P>, OptimizationError>
    where
        P: PointOfInterest + Clone,
    {
        let date = context
            .start_date
            .and_then(|start| start.checked_add_days(Days::new(group.day as u64 - 1)));

        if group.pois.is_empty() {
            return Ok(DayPlan::empty(group.day, date));
        }

        let (ordered, strategy) =
            sequence_pois(group.pois, &self.distances, self.options.sequence_options())?;

        let mut routes = Vec::with_capacity(ordered.len().saturating_sub(1));
        let mut clock = context.start_minutes;
        let mut distance_km = 0.0;
        let mut travel_minutes = 0;
        let mut cost = 0;

        for (position, pair) in ordered.windows(2).enumerate() {
            let (from, to) = (&pair[0], &pair[1]);
            let km = self.distances.distance_km(from.location(), to.location())?;
            let estimate = travel::estimate(km, &context.mode, clock_hour(clock), context.is_weekend);

            routes.push(RouteEdge {
                from_poi_id: from.id().clone(),
                to_poi_id: to.id().clone(),
                distance_meters: (km * 1000.0).round(),
                duration_minutes: estimate.duration_minutes,
                mode: context.mode.clone(),
                cost: estimate.cost,
                departure_time: clock_time(clock),
                geometry: Polyline::straight_line(from.location(), to.location(), km),
                instructions: format!(
                    "{} from {} to {}, about {} min",
                    context.mode.verb(),
                    stop_label(from, position),
                    stop_label(to, position + 1),
                    estimate.duration_minutes
                ),
            });

            clock = add_minutes(clock, estimate.duration_minutes, "travel clock")?;
            distance_km += km;
            travel_minutes = add_minutes(travel_minutes, estimate.duration_minutes, "travel time")?;
            cost = add_minutes(cost, estimate.cost, "travel cost")?;
        }

        // Stays are timed on their own clock, starting over at the day start.
        let mut clock = context.start_minutes;
        let mut stops = Vec::with_capacity(ordered.len());
        for poi in ordered {
            let stay = stay_minutes(&poi, clock_hour(clock), &self.options.stay);
            stops.push(PlannedStop {
                poi,
                arrival_time: clock_time(clock),
                stay_minutes: stay,
            });
            clock = add_minutes(clock, stay, "stay clock")?;
        }

        let stay_total = sum_minutes(stops.iter().map(|stop| stop.stay_minutes), "stay time")?;
        let estimated_minutes = add_minutes(travel_minutes, stay_total, "estimated day time")?;
        let time_exceeded = estimated_minutes > context.daily_limit;

        debug!(
            day = group.day,
            stops = stops.len(),
            distance_km,
            estimated_minutes,
            time_exceeded,
            "planned day"
        );

        Ok(DayPlan {
            day: group.day,
            date,
            stops,
            routes,
            strategy,
            total_distance_km: round2(distance_km),
            total_travel_minutes: travel_minutes,
            total_stay_minutes: stay_total,
            estimated_minutes,
            total_cost: cost,
            time_exceeded,
        })
    }
}

/// One-shot optimization with default options and a request-scoped cache.
pub fn optimize<P>(pois: &[P], request: &TripRequest) -> Result<TripPlan<P>, OptimizationError>
where
    P: PointOfInterest + Clone + Send + Sync,
    P::Id: Send + Sync,
{
    TripPlanner::default().optimize(pois, request)
}
