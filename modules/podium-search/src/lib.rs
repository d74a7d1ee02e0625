pub mod fetcher;
pub mod query_formatter;
pub mod session;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use fetcher::{decode_speeches, SpeechFetcher};
pub use query_formatter::{format, FormattedQuery};
pub use session::{SearchSession, SearchTicket};
pub use traits::ContentGenerator;
