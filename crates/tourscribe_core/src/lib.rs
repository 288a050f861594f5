//! Core data types for tourscribe.
//!
//! This crate provides the request/response vocabulary spoken to text-generation
//! backends and the tour domain types (waypoints, route labels, run settings)
//! shared by every other crate, including the assembled
//! [`TourDocument`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod message;
mod output;
mod request;
mod role;
mod tool;
mod tour;

pub use document::{SegmentOutcome, TourDocument, TourSegment};
pub use message::Message;
pub use output::{FinishReason, GenerateResponse, Output};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use role::Role;
pub use tool::{ResponseFormat, Tool};
pub use tour::{
    FailurePolicy, NOT_FOUND, ROUTE_NOT_FOUND, RouteLabel, TourConfig, TourConfigBuilder,
    WaypointSpec,
};
