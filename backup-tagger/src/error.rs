use thiserror::Error;

/// Conditions detected by the tagger itself, as opposed to SDK or SMTP
/// failures which travel as `anyhow::Error` with context attached.
#[derive(Error, Debug)]
pub enum TaggerError {
    /// The provider listed a resource without the identifier we tag by.
    #[error("{kind} resource listed without {field}")]
    MissingIdentifier {
        kind: &'static str,
        field: &'static str,
    },

    /// Secret exists but carries no string payload.
    #[error("secret {secret_id} has no string value")]
    EmptySecret { secret_id: String },

    #[error("invalid mail address {address}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
}
