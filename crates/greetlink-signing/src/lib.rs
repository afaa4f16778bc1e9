//! Signed upload grants for GreetLink
//!
//! Photo uploads go directly from the client to the third-party media API;
//! the server's only involvement is computing a short-lived signature over
//! the upload parameters so the shared API secret never reaches the client.

pub mod credentials;
pub mod error;
pub mod grant;

pub use credentials::SigningCredentials;
pub use error::{Result, SigningError};
pub use grant::UploadGrant;
