//! Out-of-band pagination metadata carried in response headers.

use std::convert::Infallible;

use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};

pub const X_TOTAL_COUNT: &str = "x-total-count";
pub const X_PAGE: &str = "x-page";
pub const X_PAGE_SIZE: &str = "x-page-size";

/// Headers browsers must be allowed to read
pub const EXPOSED_HEADERS: [&str; 3] = [X_TOTAL_COUNT, X_PAGE, X_PAGE_SIZE];

/// Window description attached to list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationHeaders {
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl IntoResponseParts for PaginationHeaders {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let headers = res.headers_mut();
        headers.insert(X_TOTAL_COUNT, HeaderValue::from(self.total_count));
        headers.insert(X_PAGE, HeaderValue::from(self.page));
        headers.insert(X_PAGE_SIZE, HeaderValue::from(self.page_size));
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn headers_are_written() {
        let response = (
            PaginationHeaders {
                total_count: 42,
                page: 2,
                page_size: 5,
            },
            "[]",
        )
            .into_response();

        let headers = response.headers();
        assert_eq!(headers[X_TOTAL_COUNT], "42");
        assert_eq!(headers[X_PAGE], "2");
        assert_eq!(headers[X_PAGE_SIZE], "5");
    }
}
