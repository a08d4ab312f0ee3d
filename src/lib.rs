//! # alfabank - Alfabank e-commerce gateway client
//!
//! An async client for the Alfabank REST acquiring gateway. Operations are sent
//! as `POST {prefix}{operation}{suffix}` with every parameter, credentials
//! included, in the query string. Responses carrying a truthy `errorCode` are
//! returned as [`AlfabankError::Gateway`].
//!
//! ```no_run
//! use alfabank::{AlfabankClient, Credentials, Language};
//!
//! # async fn run() -> alfabank::Result<()> {
//! let client = AlfabankClient::new(Credentials::token("merchant-token"), Language::En)?;
//! let order = client
//!     .register(1001, 19.99, "Order #1001", "https://shop.example/ok", None)
//!     .await?;
//! println!("{:?}", order.get("formUrl"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod orders;
pub mod types;

// Re-exports for convenience
pub use client::AlfabankClient;
pub use config::ClientConfig;
pub use error::{AlfabankError, Result};
pub use messages::{Language, MessageKind};
pub use orders::to_minor_units;
pub use types::{
    to_parameters, Credentials, GatewayResponse, Operation, ParamValue, Parameters,
    UnknownOperation,
};

/// Current version of the alfabank library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
