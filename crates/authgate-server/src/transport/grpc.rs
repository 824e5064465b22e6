//! Envoy ext_authz v3 gRPC server.
//!
//! Every policy outcome, including errors resolved into denials, is returned
//! as a `CheckResponse`; the RPC itself never fails for a decision.

use std::future::Future;
use std::net::SocketAddr;

use envoy_types::ext_authz::v3::pb::{Authorization, AuthorizationServer};
use envoy_types::pb::envoy::config::core::v3::address::Address as AddressKind;
use envoy_types::pb::envoy::config::core::v3::{HeaderValue, HeaderValueOption};
use envoy_types::pb::envoy::r#type::v3::HttpStatus;
use envoy_types::pb::envoy::service::auth::v3::attribute_context::Peer;
use envoy_types::pb::envoy::service::auth::v3::check_response::HttpResponse;
use envoy_types::pb::envoy::service::auth::v3::{
    CheckRequest, CheckResponse, DeniedHttpResponse, OkHttpResponse,
};
use envoy_types::pb::google::rpc::Status as RpcStatus;
use tonic::{Code, Request, Response, Status};
use tracing::{info, warn};

use authgate_core::enrich::HeaderEntry;
use authgate_core::error::{AuthzError, Result};
use authgate_core::{CheckInput, WireVerdict};

use crate::app_state::AppState;

/// `Authorization` service backed by the shared decision engine.
#[derive(Clone)]
pub struct ExtAuthzService {
    state: AppState,
}

impl ExtAuthzService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[tonic::async_trait]
impl Authorization for ExtAuthzService {
    async fn check(
        &self,
        request: Request<CheckRequest>,
    ) -> std::result::Result<Response<CheckResponse>, Status> {
        let input = match check_input(request.into_inner()) {
            Some(input) => input,
            None => {
                self.state
                    .metrics()
                    .malformed_requests
                    .inc(&[("reason", "missing_http_attributes")]);
                warn!("check request without http attributes");
                CheckInput::default()
            }
        };

        let verdict = self.state.check(input);
        Ok(Response::new(check_response(verdict)))
    }
}

/// Pull path, headers and caller description out of a `CheckRequest`.
/// Returns `None` when the request carries no HTTP attributes.
pub fn check_input(req: CheckRequest) -> Option<CheckInput> {
    let attrs = req.attributes?;
    let source = attrs.source.as_ref().and_then(describe_peer);
    let http = attrs.request?.http?;

    // The proxy sends a map; sort for a stable context order.
    let mut headers: Vec<(String, String)> = http.headers.into_iter().collect();
    headers.sort();

    Some(CheckInput {
        path: http.path,
        headers,
        source,
    })
}

fn describe_peer(peer: &Peer) -> Option<String> {
    if !peer.principal.is_empty() {
        return Some(peer.principal.clone());
    }
    match peer.address.as_ref()?.address.as_ref()? {
        AddressKind::SocketAddress(sa) => Some(sa.address.clone()),
        _ => None,
    }
}

fn header_options(headers: Vec<HeaderEntry>) -> Vec<HeaderValueOption> {
    headers
        .into_iter()
        .map(|h| HeaderValueOption {
            append: Some(envoy_types::pb::google::protobuf::BoolValue { value: h.action.is_append() }),
            header: Some(HeaderValue {
                key: h.key,
                value: h.value,
                ..Default::default()
            }),
            // Echoed headers may legitimately be empty.
            keep_empty_value: true,
            ..Default::default()
        })
        .collect()
}

fn rpc_status(code: Code) -> Option<RpcStatus> {
    Some(RpcStatus {
        code: code as i32,
        ..Default::default()
    })
}

/// Map the engine's verdict onto the ext_authz wire response.
pub fn check_response(verdict: WireVerdict) -> CheckResponse {
    match verdict {
        WireVerdict::Ok { headers } => CheckResponse {
            status: rpc_status(Code::Ok),
            http_response: Some(HttpResponse::OkResponse(OkHttpResponse {
                headers: header_options(headers),
                ..Default::default()
            })),
            ..Default::default()
        },
        WireVerdict::Denied {
            http_status,
            headers,
            body,
        } => CheckResponse {
            status: rpc_status(Code::PermissionDenied),
            http_response: Some(HttpResponse::DeniedResponse(DeniedHttpResponse {
                status: Some(HttpStatus {
                    code: i32::from(http_status),
                }),
                headers: header_options(headers),
                body,
            })),
            ..Default::default()
        },
    }
}

/// Serve the ext_authz service until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    info!(%addr, "ext_authz gRPC server starting");
    tonic::transport::Server::builder()
        .add_service(AuthorizationServer::new(ExtAuthzService::new(state)))
        .serve_with_shutdown(addr, shutdown)
        .await
        .map_err(|e| AuthzError::Internal(format!("grpc server error: {e}")))
}
