use std::sync::Arc;

use axum::{
    extract::{Request, State as Shared},
    response::Response,
};

use crate::{error::AppError, proxy::forward, state::State};

pub async fn forward_handler(
    Shared(state): Shared<Arc<State>>,
    request: Request,
) -> Result<Response, AppError> {
    forward(state, request).await
}
