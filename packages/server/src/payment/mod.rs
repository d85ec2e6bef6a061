mod gateway;
mod midtrans;

pub use gateway::{
    GatewayError, PaymentGateway, PaymentLink, PaymentOrder, TransactionStatus, new_order_id,
};
pub use midtrans::MidtransGateway;

/// Status stored for a payment before the gateway reports anything.
pub const INITIAL_STATUS: &str = "pending";
