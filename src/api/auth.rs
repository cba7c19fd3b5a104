//! Owner identity extraction.
//!
//! Authentication lives in an external system; by the time a request
//! reaches this service the verified identity arrives as opaque headers.
//! This extractor is the whole interface to that collaborator.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::errors::LinkletError;
use crate::services::{Owner, SubscriptionTier};

pub const OWNER_ID_HEADER: &str = "x-owner-id";
pub const OWNER_TIER_HEADER: &str = "x-owner-tier";

impl FromRequest for Owner {
    type Error = LinkletError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .headers()
            .get(OWNER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let tier = req
            .headers()
            .get(OWNER_TIER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(SubscriptionTier::parse)
            .unwrap_or_default();

        ready(match id {
            Some(id) => Ok(Owner { id, tier }),
            None => Err(LinkletError::unauthorized("missing owner identity")),
        })
    }
}
