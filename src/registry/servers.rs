//! Server listing and lookup.

use std::sync::Arc;

use futures::FutureExt;

use crate::clients::{
    Executor, HttpMethod, HttpRequest, Outcome, RequestOptions, ResponseKind, ResponseMatcher,
    StatusPattern,
};
use crate::models::{GetServerRequest, ListServersRequest, ListServersResponse, ServerDetailResponse};
use crate::pagination::{FetchPage, Page};

/// Operations on `/servers`.
#[derive(Clone, Debug)]
pub struct Servers {
    executor: Executor,
}

impl Servers {
    pub(crate) const fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Lists servers, starting at `request.page()`.
    ///
    /// The returned [`Page`] carries the first page's outcome; follow-up
    /// pages are fetched on demand with [`Page::next`] or a
    /// [`PageIterator`](crate::pagination::PageIterator), reusing `options`.
    pub async fn list(
        &self,
        request: &ListServersRequest,
        options: RequestOptions,
    ) -> Page<ListServersResponse> {
        let executor = self.executor.clone();
        let options = Arc::new(options);
        let page_size = request.page_size();
        let q = request.q().map(String::from);

        let fetch: FetchPage<ListServersResponse> = Arc::new(move |page: u32| {
            let executor = executor.clone();
            let options = Arc::clone(&options);
            let q = q.clone();
            async move {
                let request = HttpRequest::builder(HttpMethod::Get, "/servers")
                    .query_param("page", page.to_string())
                    .query_param("pageSize", page_size.to_string())
                    .optional_query_param("q", q)
                    .build()?;
                executor.execute(&request, &list_matcher(), &options).await
            }
            .boxed()
        });

        Page::fetch(request.page(), page_size, fetch).await
    }

    /// Fetches one server by qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`](crate::RegistryError::NotFound) if
    /// no such server exists, or any other [`RegistryError`](crate::RegistryError)
    /// the call failed with.
    pub async fn get(
        &self,
        request: &GetServerRequest,
        options: &RequestOptions,
    ) -> Outcome<ServerDetailResponse> {
        let path = format!("/servers/{}", encode_path(request.qualified_name()));
        let http_request = HttpRequest::builder(HttpMethod::Get, path).build()?;
        self.executor
            .execute(&http_request, &get_matcher(), options)
            .await
    }
}

fn list_matcher() -> ResponseMatcher<ListServersResponse> {
    ResponseMatcher::new()
        .on(200, ResponseKind::Success)
        .on(401, ResponseKind::Unauthorized)
        .on(StatusPattern::Class(5), ResponseKind::ServerError)
        .on(StatusPattern::Class(4), ResponseKind::ClientError)
}

fn get_matcher() -> ResponseMatcher<ServerDetailResponse> {
    ResponseMatcher::new()
        .on(200, ResponseKind::Success)
        .on(401, ResponseKind::Unauthorized)
        .on_with_message(404, ResponseKind::NotFound, "Server not found")
        .on(StatusPattern::Class(5), ResponseKind::ServerError)
        .on(StatusPattern::Class(4), ResponseKind::ClientError)
}

/// Percent-encodes each `/`-separated segment. `@` and `:` are valid path
/// characters and stay as they are.
fn encode_path(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            urlencoding::encode(segment)
                .replace("%40", "@")
                .replace("%3A", ":")
        })
        .collect::<Vec<_>>()
        .join("/")
}
