//! CloudEvents envelope, its structured JSON encoding, and the relay that
//! forwards envelopes to a downstream broker or sink.

pub mod encoding;
pub mod envelope;
pub mod error;
pub mod relay;

pub use encoding::{STRUCTURED_CONTENT_TYPE, decode, encode, is_structured};
pub use envelope::{EventEnvelope, SPEC_VERSION};
pub use error::{DeliveryError, EncodingError, ValidationError};
pub use relay::{AttributeSource, DeliveryReceipt, EventRelay, SUCCESS_MESSAGE};
