//! Registry data models.
//!
//! - [`components`]: Payloads returned by the registry
//! - [`operations`]: Validated operation inputs

pub mod components;
pub mod operations;

pub use components::{
    ConnectionInfo, ConnectionType, ListServersResponse, Pagination, ServerDetailResponse,
    ServerListItem, ServerSecurity, Tool, ToolType,
};
pub use operations::{GetServerRequest, ListServersRequest, ListServersRequestBuilder};
