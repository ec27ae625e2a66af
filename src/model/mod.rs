//! Data model shared by every pipeline stage.
//!
//! Values flow strictly forward: `TripRequest` -> `NormalizedSpec` ->
//! `CandidateSet` -> `Itinerary` -> `Narrative`. Nothing downstream mutates
//! what an earlier stage produced.

pub mod candidate;
pub mod itinerary;
pub mod money;
pub mod request;
pub mod spec;

pub use candidate::{
    Candidate, CandidateSet, Category, ConstraintFlags, Location, ProviderSignal,
    ResearchSummary, SocialSignal,
};
pub use itinerary::{
    Activity, ActivityKind, DayPlan, DaySummary, Itinerary, OverallSummary, TimeWindow,
    TravelLeg, TravelMode,
};
pub use request::TripRequest;
pub use spec::{
    Budget, BudgetFlexibility, Constraints, DateRange, Destination, NormalizedSpec, Pace,
    Travelers, WHEELCHAIR_TAG,
};
