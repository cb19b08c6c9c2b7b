//! # watcher-gateway: Forwarding Gateway
//!
//! HTTP relay between an operator's browser and the capture agents it
//! watches. Each request names its agent by `host` and `port`; the
//! gateway validates the request, makes one backend call and relays the
//! bytes, so agents never have to be reachable from the browser.
//!
//! | Path                | Backend call                                |
//! |---------------------|---------------------------------------------|
//! | `/remotescreenjpeg` | `/screenjpeg?width={width}&count={count}`   |
//! | `/remotehostname`   | `/hostname`                                 |
//! | `/hostname`         | none, the gateway's own hostname            |
//!
//! Any other path is served from the asset directory when one is
//! configured.

pub mod config;
pub mod forward;
pub mod service;
