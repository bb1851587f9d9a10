//! Prediction pipeline stages and the coordinator that sequences them

pub mod arrival;
pub mod coordinator;
pub mod timeline;

pub use arrival::{ArrivalEstimate, ArrivalEstimator, ConfidenceTier};
pub use coordinator::{
    AnalysisRequest, DisasterType, FireSpreadAnalysis, NotImplemented, PredictionCoordinator,
    PredictionOutcome,
};
pub use timeline::{Forecast, TimelinePrediction, TimelineProjector};
