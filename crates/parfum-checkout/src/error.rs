use parfum_core::ValidationError;
use parfum_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout form is incomplete: {0}")]
    Validation(#[from] ValidationError),

    #[error("invoice upload failed: {0}")]
    Gateway(#[from] GatewayError),
}
