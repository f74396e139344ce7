#![doc = "dmsc-newsletter-core: core logic library for the DMSC newsletter workflow."]

//! This crate contains the configuration, provider contracts, concrete API
//! clients and the publication pipeline for the monthly newsletter run.
//! The CLI crate is glue only; everything testable lives here.

pub mod config;
pub mod contract;
pub mod dropbox;
pub mod extract;
mod http;
pub mod mailchimp;
pub mod publish;
pub mod template;
pub mod wix;
