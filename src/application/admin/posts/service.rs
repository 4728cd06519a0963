use std::sync::Arc;

use tracing::warn;

use crate::application::auth::{AdminGate, CallerContext};
use crate::application::repos::{PostsRepo, PostsWriteRepo};

use super::types::AdminPostError;

/// Admin-gated post editing: every entry point checks the gate before it
/// touches validation or storage.
#[derive(Clone)]
pub struct AdminPostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) gate: Arc<dyn AdminGate>,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        gate: Arc<dyn AdminGate>,
    ) -> Self {
        Self {
            reader,
            writer,
            gate,
        }
    }

    pub(crate) fn authorize(
        &self,
        caller: &CallerContext,
        operation: &'static str,
    ) -> Result<(), AdminPostError> {
        self.gate.authorize(caller).map_err(|err| {
            metrics::counter!("postdesk_admin_denied_total", "operation" => operation)
                .increment(1);
            warn!(
                target = "postdesk::admin::posts",
                operation,
                signed_in = caller.is_authenticated(),
                reason = %err,
                "admin gate refused caller"
            );
            AdminPostError::Unauthorized(err)
        })
    }
}
