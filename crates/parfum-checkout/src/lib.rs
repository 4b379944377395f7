//! Checkout handoff: validate the order, render and upload its invoice, and
//! build the WhatsApp message that carries it to the shop.

mod composer;
mod error;
pub mod message;

pub use composer::{ComposedOrder, OrderComposer};
pub use error::CheckoutError;
pub use message::{chat_link, encode_component, order_message};
