//! Loopback-only access gate.
//!
//! Wrap a route or scope in [`LoopbackOnly`] and every request whose peer is
//! not `127.0.0.0/8` or `::1` is answered with 403 before the handler, its
//! validation, or storage ever runs.

use std::net::{IpAddr, SocketAddr};
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::{constants, error::ServiceError};

/// Whether `addr` is a loopback peer. IPv4-mapped IPv6 loopback counts too.
pub fn is_loopback(addr: Option<SocketAddr>) -> bool {
    match addr.map(|addr| addr.ip()) {
        Some(IpAddr::V4(ip)) => ip.is_loopback(),
        Some(IpAddr::V6(ip)) => {
            ip.is_loopback() || ip.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
        None => false,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LoopbackOnly;

impl<S, B> Transform<S, ServiceRequest> for LoopbackOnly
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = LoopbackOnlyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoopbackOnlyMiddleware { service }))
    }
}

/// Service wrapper produced by [`LoopbackOnly`].
pub struct LoopbackOnlyMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoopbackOnlyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let peer = req.peer_addr();
        if is_loopback(peer) {
            log::debug!("Request from localhost: {:?}", peer);
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        log::warn!(
            "Rejected {} {} from non-loopback peer {:?}",
            req.method(),
            req.path(),
            peer
        );
        let response = ServiceError::forbidden(constants::MESSAGE_LOCALHOST_ONLY)
            .with_tag("loopback_gate")
            .error_response();
        Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
    }
}
