//! Client for the Telnyx programmable fax API.
//!
//! Handlers talk to the [`FaxApi`] trait so tests can swap in a fake.

mod client;
pub mod models;

pub use client::{FaxApi, TelnyxClient};
pub use models::{
    CreateFaxRequest, Fax, FaxApplication, FaxPage, InboundUpdate, PageMeta,
    UpdateFaxApplicationRequest,
};
