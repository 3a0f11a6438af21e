//! HTTP endpoints that sit beside the WebSocket protocol.
//!
//! | Module | Endpoint | Description |
//! |---|---|---|
//! | [`auth`] | `POST /accounts/signin/` | Username/password → auth token |
//! | [`search`] | `GET /symbol_search/` | Free-text symbol lookup on [`TvClient`](crate::client::TvClient) |

pub mod auth;
pub mod search;
