//! REST surface for submissions
//!
//! Two endpoints, hand-routed on `(method, path)`:
//!
//! - `POST /api/submissions`: validate and persist; 201 with the stored
//!   record, or 400 with `{message, field}` naming the first invalid field.
//! - `GET /api/submissions`: 200 with all records ascending by creation
//!   time.
//!
//! Routing is factored into [`route`], a bytes-in/response-out function, so
//! the whole surface is testable without opening a socket.

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::VigilError;
use crate::service::SubmissionService;

pub const SUBMISSIONS_PATH: &str = "/api/submissions";

/// Error body for 400 and 500 responses. `field` is present only for
/// validation failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Dispatch one request against the submission service.
pub async fn route(
    service: &SubmissionService,
    method: &Method,
    path: &str,
    body: &[u8],
) -> Response<Full<Bytes>> {
    match (method, path) {
        (&Method::POST, SUBMISSIONS_PATH) => match service.create_from_json(body).await {
            Ok(stored) => json_response(StatusCode::CREATED, &stored),
            Err(VigilError::Validation { field, message }) => {
                warn!(%field, %message, "submission rejected");
                json_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorBody {
                        message,
                        field: Some(field),
                    },
                )
            }
            Err(e) => internal_error(e),
        },
        (&Method::GET, SUBMISSIONS_PATH) => match service.list().await {
            Ok(listed) => json_response(StatusCode::OK, &listed),
            Err(e) => internal_error(e),
        },
        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorBody {
                message: "not found".to_string(),
                field: None,
            },
        ),
    }
}

/// Bind `addr` and serve the submission API until the process exits.
pub async fn serve(addr: SocketAddr, service: SubmissionService) -> Result<(), VigilError> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "submission API listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::spawn(async move {
            let handler = service_fn(move |req: Request<Incoming>| {
                let service = service.clone();
                async move { handle(service, req).await }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                warn!(%peer, error = %e, "connection error");
            }
        });
    }
}

async fn handle(
    service: SubmissionService,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to read request body");
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                "failed to read request body",
            ));
        }
    };

    Ok(route(&service, &method, &path, &body).await)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(encoded) => Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(encoded)))
            .unwrap_or_else(|_| plain_response(StatusCode::INTERNAL_SERVER_ERROR, "encode error")),
        Err(e) => {
            warn!(error = %e, "response encoding failed");
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, "encode error")
        }
    }
}

fn internal_error(e: VigilError) -> Response<Full<Bytes>> {
    warn!(error = %e, "request failed");
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorBody {
            message: e.to_string(),
            field: None,
        },
    )
}

fn plain_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(message.to_string())));
    *response.status_mut() = status;
    response
}
