use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request identifier (UUID v4) for correlating output with logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// UTC wall-clock instant rendered as RFC3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedAt(OffsetDateTime);

impl GeneratedAt {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for GeneratedAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for GeneratedAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

/// Metadata attached to every command envelope.
///
/// Field order is fixed to keep JSON output stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub request_id: RequestId,
    pub generated_at: GeneratedAt,
    pub latency_ms: u64,
    pub cache_hit: bool,
    pub page_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(latency_ms: u64, cache_hit: bool, page_count: usize) -> Self {
        Self {
            request_id: RequestId::new_v4(),
            generated_at: GeneratedAt::now(),
            latency_ms,
            cache_hit,
            page_count,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_uuid_v4() {
        let request_id = RequestId::new_v4();
        assert_eq!(request_id.0.get_version_num(), 4);
    }

    #[test]
    fn generated_at_is_rfc3339_utc() {
        let rendered = GeneratedAt::now().format_rfc3339();
        let parsed = OffsetDateTime::parse(&rendered, &Rfc3339).expect("parses back");
        assert!(parsed.offset().is_utc());
    }

    #[test]
    fn metadata_serializes_in_fixed_order_without_empty_warnings() {
        let metadata = Metadata::new(42, false, 2);
        let rendered = serde_json::to_string(&metadata).expect("serializes");

        let request_id_at = rendered.find("\"request_id\"").expect("request_id");
        let latency_at = rendered.find("\"latency_ms\":42").expect("latency");
        let pages_at = rendered.find("\"page_count\":2").expect("page_count");
        assert!(request_id_at < latency_at && latency_at < pages_at);
        assert!(!rendered.contains("warnings"));
    }
}
