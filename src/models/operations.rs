//! Operation inputs.
//!
//! Requests are validated when built; an out-of-range value is reported as a
//! [`RequestValidationError`] before anything is sent.

use crate::error::RequestValidationError;

/// Default number of servers per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Input for `GET /servers`.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::models::operations::ListServersRequest;
///
/// let request = ListServersRequest::builder()
///     .q("slack")
///     .page_size(50)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.page_size(), 50);
/// assert_eq!(request.q(), Some("slack"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListServersRequest {
    page: u32,
    page_size: u32,
    q: Option<String>,
}

impl ListServersRequest {
    /// Creates a builder with the defaults (page 1, 20 per page, no query).
    #[must_use]
    pub fn builder() -> ListServersRequestBuilder {
        ListServersRequestBuilder::default()
    }

    /// The first page to fetch (one-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Free-text search query.
    #[must_use]
    pub fn q(&self) -> Option<&str> {
        self.q.as_deref()
    }
}

impl Default for ListServersRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            q: None,
        }
    }
}

/// Builder for [`ListServersRequest`].
#[derive(Clone, Debug, Default)]
pub struct ListServersRequestBuilder {
    page: Option<u32>,
    page_size: Option<u32>,
    q: Option<String>,
}

impl ListServersRequestBuilder {
    /// Sets the first page to fetch.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the number of items per page.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the search query.
    #[must_use]
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Validates and builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::PageOutOfRange`] for page 0 and
    /// [`RequestValidationError::PageSizeOutOfRange`] outside `1..=100`.
    pub fn build(self) -> Result<ListServersRequest, RequestValidationError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(RequestValidationError::PageOutOfRange { page });
        }
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(RequestValidationError::PageSizeOutOfRange { page_size });
        }
        Ok(ListServersRequest {
            page,
            page_size,
            q: self.q,
        })
    }
}

/// Input for `GET /servers/{qualifiedName}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetServerRequest {
    qualified_name: String,
}

impl GetServerRequest {
    /// Creates a request for the server with the given qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError::EmptyField`] if the name is blank.
    ///
    /// # Example
    ///
    /// ```rust
    /// use smithery_sdk::models::operations::GetServerRequest;
    ///
    /// let request = GetServerRequest::new("@smithery/github").unwrap();
    /// assert_eq!(request.qualified_name(), "@smithery/github");
    /// assert!(GetServerRequest::new("  ").is_err());
    /// ```
    pub fn new(qualified_name: impl Into<String>) -> Result<Self, RequestValidationError> {
        let qualified_name = qualified_name.into().trim().to_string();
        if qualified_name.is_empty() {
            return Err(RequestValidationError::EmptyField {
                field: "qualified_name",
            });
        }
        Ok(Self { qualified_name })
    }

    /// The server's qualified name, e.g. `@owner/server`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults() {
        let request = ListServersRequest::builder().build().unwrap();
        assert_eq!(request, ListServersRequest::default());
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 20);
        assert!(request.q().is_none());
    }

    #[test]
    fn test_page_zero_is_rejected() {
        assert_eq!(
            ListServersRequest::builder().page(0).build(),
            Err(RequestValidationError::PageOutOfRange { page: 0 })
        );
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(ListServersRequest::builder().page_size(1).build().is_ok());
        assert!(ListServersRequest::builder().page_size(100).build().is_ok());
        assert_eq!(
            ListServersRequest::builder().page_size(0).build(),
            Err(RequestValidationError::PageSizeOutOfRange { page_size: 0 })
        );
        assert_eq!(
            ListServersRequest::builder().page_size(101).build(),
            Err(RequestValidationError::PageSizeOutOfRange { page_size: 101 })
        );
    }

    #[test]
    fn test_get_server_requires_name() {
        assert!(matches!(
            GetServerRequest::new(""),
            Err(RequestValidationError::EmptyField {
                field: "qualified_name"
            })
        ));
        assert_eq!(
            GetServerRequest::new(" @a/b ").unwrap().qualified_name(),
            "@a/b"
        );
    }
}
