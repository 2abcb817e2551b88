//! Client for the GI Notebook service: resolve scenarios, instances,
//! templates, elements and their RHESSys default-type references into a
//! fully populated object graph.
//!
//! Entry point is [`NotebookClient`]; each `get_*` method issues the GET for
//! one resource and follows the URLs embedded in its JSON body, depth-first
//! and strictly sequentially, until the whole subtree is materialized.

mod client;
mod error;
mod models;

pub use client::{
    NotebookClient, NotebookConfig, ResourceRef, DEFAULT_API_ROOT, DEFAULT_HOSTNAME,
};
pub use error::{check_reference, NotebookError};
pub use models::{
    Element, GiType, Instance, Scenario, ScenarioRef, SoilType, StratumType, Template,
};
