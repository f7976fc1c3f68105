use serde::Deserialize;

/// Raw `start`/`length` query values. Kept as strings so a malformed value
/// falls back to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub start: Option<String>,
    pub length: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl PageQuery {
    pub fn page(&self, default_length: i64) -> Page {
        Page {
            offset: parse_non_negative(self.start.as_deref()).unwrap_or(0),
            limit: parse_non_negative(self.length.as_deref()).unwrap_or(default_length),
        }
    }
}

fn parse_non_negative(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n >= 0)
}
