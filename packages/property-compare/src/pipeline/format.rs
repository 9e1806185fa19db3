//! Structuring raw listings into property records.

use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::fallback;
use crate::traits::PropertyAi;
use crate::types::{PropertyRecord, RawListing};

/// Structure a raw listing into a `PropertyRecord`.
///
/// The AI path is primary and yields `Structured` records. When it fails
/// for any non-fatal reason the heuristic fallback takes over and the
/// result is `Partial`. Credential failures propagate: retrying with the
/// same rejected key cannot succeed.
pub async fn format_listing<A>(ai: &A, raw: &RawListing) -> Result<PropertyRecord>
where
    A: PropertyAi + ?Sized,
{
    match ai.format_listing(&raw.content, &raw.url).await {
        Ok(fields) => {
            let record = PropertyRecord::from_fields(fields, &raw.url);
            debug!(
                "Structured {} with {} fields",
                raw.url,
                record.populated_fields().len()
            );
            Ok(record)
        }
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(
                "Structuring failed for {}: {}. Falling back to heuristics",
                raw.url, err
            );
            Ok(fallback::extract_partial(raw))
        }
    }
}
