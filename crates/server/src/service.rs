//! gRPC surface of the quote engine.
//!
//! Translates between the wire contract in `proto/quotes.proto` and the
//! engine's own types. The status mapping is part of the contract:
//! - malformed request            -> INVALID_ARGUMENT
//! - snapshot unavailable         -> UNAVAILABLE
//! - zero eligible rows           -> OK with `no_match = true`

use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use tonic::{Request, Response, Status};
use tracing::{debug, warn};

use matcher::QuoteOutcome;
use quote::{GvwRange, PayoutQuery, VehicleAge};

use crate::orchestrator::{QuoteError, QuoteOrchestrator};
use crate::store::StoreError;

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("quotes");
}

use proto::quote_service_server::QuoteService;

/// gRPC service wrapping the orchestrator.
pub struct QuoteGrpcService {
    orchestrator: Arc<QuoteOrchestrator>,
}

impl QuoteGrpcService {
    pub fn new(orchestrator: Arc<QuoteOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

#[tonic::async_trait]
impl QuoteService for QuoteGrpcService {
    async fn get_quotes(
        &self,
        request: Request<proto::QuoteRequest>,
    ) -> Result<Response<proto::QuoteReply>, Status> {
        let req = request.into_inner();
        let top_k = req.top_k as usize;
        let query = parse_request(req)
            .map_err(|e| Status::invalid_argument(format!("{e:#}")))?;
        debug!("gRPC quote request for {}", query.state_code());

        // The engine is CPU-bound; keep it off the async worker
        let mut orchestrator = (*self.orchestrator).clone();
        if top_k > 0 {
            orchestrator = orchestrator.with_top_k(top_k);
        }
        let outcome = tokio::task::spawn_blocking(move || orchestrator.get_quotes(&query))
            .await
            .map_err(|_| Status::internal("quote task panicked"))?;

        match outcome {
            Ok(outcome) => Ok(Response::new(to_reply(outcome))),
            Err(QuoteError::Validation(e)) => Err(Status::invalid_argument(e.to_string())),
            Err(QuoteError::Store(StoreError::Unavailable(reason))) => {
                warn!("Quote request failed upstream: {}", reason);
                Err(Status::unavailable(reason))
            }
            Err(QuoteError::Engine(e)) => Err(Status::internal(format!("{e:#}"))),
        }
    }

    async fn list_companies(
        &self,
        _request: Request<proto::CompaniesRequest>,
    ) -> Result<Response<proto::CompaniesReply>, Status> {
        let snapshot = self
            .orchestrator
            .snapshot()
            .map_err(|e| Status::unavailable(e.to_string()))?;
        Ok(Response::new(proto::CompaniesReply {
            companies: snapshot.projections().companies.clone(),
        }))
    }
}

/// Build a PayoutQuery from the wire request.
///
/// Empty strings mean "not provided"; the engine's own validation runs
/// afterwards, this only rejects values that cannot be represented.
fn parse_request(req: proto::QuoteRequest) -> anyhow::Result<PayoutQuery> {
    let category = req
        .vehicle_category
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let business_type = req
        .business_type
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let mut query = PayoutQuery::new(
        req.state,
        category,
        req.vehicle_type,
        business_type,
        req.policy_type,
    );

    if !req.vehicle_age.trim().is_empty() {
        query.age = req
            .vehicle_age
            .parse::<VehicleAge>()
            .map_err(|e| anyhow!(e))?;
    }
    if !req.evaluation_date.trim().is_empty() {
        query.evaluation_date = NaiveDate::parse_from_str(req.evaluation_date.trim(), "%Y-%m-%d")
            .context("evaluation_date must be YYYY-MM-DD")?;
    }
    if req.has_gvw {
        query.gvw = Some(GvwRange::new(req.gvw_min, req.gvw_max));
    }

    query.rto_code = non_empty(req.rto_code);
    query.make = non_empty(req.make);
    query.model = non_empty(req.model);
    query.fuel_type = non_empty(req.fuel_type);
    query.cc_slab = non_empty(req.cc_slab);
    query.watt_slab = non_empty(req.watt_slab);

    Ok(query)
}

fn non_empty(value: String) -> Option<String> {
    let t = value.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn to_reply(outcome: QuoteOutcome) -> proto::QuoteReply {
    match outcome {
        QuoteOutcome::NoMatch { message } => proto::QuoteReply {
            no_match: true,
            message,
            entries: Vec::new(),
        },
        QuoteOutcome::Matches { entries } => proto::QuoteReply {
            no_match: false,
            message: format!("Found {} insurer(s) by commission", entries.len()),
            entries: entries
                .into_iter()
                .map(|entry| proto::RankedEntry {
                    rank: entry.rank,
                    company: entry.company,
                    lines: entry
                        .lines
                        .into_iter()
                        .map(|line| proto::PayoutLine {
                            condition: line.condition,
                            payout: line.payout,
                        })
                        .collect(),
                })
                .collect(),
        },
    }
}
