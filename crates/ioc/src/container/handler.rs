use std::sync::Arc;

/// Capability of components that are dispatched generically once resolved
///
/// The container only guarantees the handler is fully constructed before
/// `handle` is called; what a request looks like is up to the caller.
pub trait Handler<Req>: Send + Sync {
    type Output;

    fn handle(&self, request: Req) -> Self::Output;
}

impl<Req, H> Handler<Req> for Arc<H>
where
    H: Handler<Req> + ?Sized,
{
    type Output = H::Output;

    fn handle(&self, request: Req) -> Self::Output {
        (**self).handle(request)
    }
}
