//! Error types.

use crate::types::ClassId;

/// Any range of errors encountered when evaluating trades or making requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An input parameter is missing or invalid.
    #[error("Invalid parameter: {}", .0)]
    Parameter(#[from] ParameterError),
    /// An unexpected response containing a message was received. Check the message for more
    /// details.
    #[error("Unexpected response: {}", .0)]
    UnexpectedResponse(String),
    /// An error was encountered making a request.
    #[error("reqwest error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    /// An error was encountered within the request middleware.
    #[error("reqwest middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    /// An error was encountered parsing a JSON response body.
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    /// A response with an HTTP code other than 200 was received.
    #[error("Error {}", .0)]
    StatusCode(reqwest::StatusCode),
    /// You are not logged in.
    #[error("Not logged in")]
    NotLoggedIn,
    /// A response returned a JSON body where `success` is `false`.
    #[error("Response unsuccessful")]
    ResponseUnsuccessful,
    /// An error was encountered when sending or acting on trade offers.
    #[error("Trade error: {}", .0)]
    TradeOffer(TradeOfferError),
    /// A confirmation could not be confirmed. If a message was contained in the response body
    /// it will be included.
    #[error("Confirmation unsuccessful{}", .0.as_ref().map(|s| format!(": {s}")).unwrap_or_default())]
    ConfirmationUnsuccessful(Option<String>),
    /// The response is not what is expected.
    #[error("Malformed response: {}", .0)]
    MalformedResponse(&'static str),
}

/// An error occurred when working with the file system.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    /// A generic error.
    #[error("Filesystem error: {}", .0)]
    FileSystem(#[from] std::io::Error),
    /// File contents could not be parsed as JSON.
    #[error("Error parsing file contents: {}", .0)]
    Parse(#[from] serde_json::Error),
}

/// Any number of issues with a provided parameter.
#[derive(thiserror::Error, Debug)]
pub enum ParameterError {
    /// A required item collection is empty.
    #[error("Empty items collection.")]
    EmptyItems,
    /// The inventory does not contain the full amount of an item meant to be given.
    #[error("Inventory is missing items of class {}.", .0)]
    MissingGivenItems(ClassId),
    /// Offer is empty.
    #[error("Offer is empty.")]
    EmptyOffer,
    /// Missing API key.
    #[error("Missing API key.")]
    MissingApiKey,
    /// No identity secret.
    #[error("No identity secret.")]
    NoIdentitySecret,
    /// The identity secret is not valid base64.
    #[error("Invalid identity secret.")]
    InvalidIdentitySecret,
    /// No partner is configured to send completed items to.
    #[error("No loot partner.")]
    NoLootPartner,
    /// An error was encountered converting parameters to a valid URL string.
    #[error("Unable to convert to query parameters: {}", .0)]
    SerdeQS(#[from] serde_qs::Error),
    /// An error was encountered parsing a URL.
    #[error("Unable to parse URL: {}", .0)]
    UrlParse(#[from] url::ParseError),
}

/// An error received from a response when sending or acting on trade offers.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TradeOfferError {
    /// An unknown error occurred. The contained string will contain additional information.
    #[error("{}", .0)]
    Unknown(String),
    /// An unknown error occurred with a numeric EResult code.
    #[error("EResult {}", .0)]
    UnknownEResult(u32),
    /// # Code 2
    /// Returned when a more specific error code couldn't be determined.
    #[error("Fail")]
    Fail,
    /// # Code 11
    /// This trade offer is in an invalid state, and cannot be acted upon.
    #[error("InvalidState")]
    InvalidState,
    /// # Code 15
    /// You can't act on this trade offer because either you can't trade with the other user,
    /// or one of the parties in this trade can't send or receive one of the items.
    #[error("AccessDenied")]
    AccessDenied,
    /// # Code 16
    /// The Steam Community web server did not receive a timely reply from the trade offers
    /// server. It is possible (and not unlikely) that the operation actually succeeded.
    #[error("Timeout")]
    Timeout,
    /// # Code 20
    /// As the name suggests, the trade offers service is currently unavailable.
    #[error("ServiceUnavailable")]
    ServiceUnavailable,
    /// # Code 25
    /// Accepting this trade offer would put you over your limit, or your inventory for a
    /// particular game is full.
    #[error("LimitExceeded")]
    LimitExceeded,
    /// # Code 26
    /// One or more of the items in this trade offer no longer exists in the inventory from
    /// which it was requested.
    #[error("Revoked")]
    Revoked,
    /// # Code 28
    /// When accepting a trade offer, this response code suggests that it has already been
    /// accepted.
    #[error("AlreadyRedeemed")]
    AlreadyRedeemed,
}

impl TradeOfferError {
    /// Transforms the code number into the corresponding error.
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => Self::Fail,
            11 => Self::InvalidState,
            15 => Self::AccessDenied,
            16 => Self::Timeout,
            20 => Self::ServiceUnavailable,
            25 => Self::LimitExceeded,
            26 => Self::Revoked,
            28 => Self::AlreadyRedeemed,
            _ => Self::UnknownEResult(code),
        }
    }
}

impl From<&str> for TradeOfferError {
    fn from(message: &str) -> Self {
        // Messages end with the numeric code in parentheses e.g. "Please try again later. (28)".
        if let Some(code) = message.trim().split(' ').next_back() {
            let mut chars = code.chars();

            if chars.next() != Some('(') {
                return Self::Unknown(message.into());
            }

            if chars.next_back() != Some(')') {
                return Self::Unknown(message.into());
            }

            if let Ok(code) = chars.as_str().parse::<u32>() {
                return Self::from_code(code);
            }
        }

        Self::Unknown(message.into())
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}
