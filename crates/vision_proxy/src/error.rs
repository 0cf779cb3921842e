use std::io;

use thiserror::Error;
use vision_upstream::{ConfigError, UpstreamFailure};

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] UpstreamFailure),
    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },
    #[error("server error: {0}")]
    Serve(io::Error),
}
