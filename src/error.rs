use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("backend returned {:?}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    #[error("http error: {0}")]
    Hyper(#[from] hyper::Error),

    #[error("invalid http message: {0}")]
    Http(#[from] hyper::http::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("invalid header argument: {0}")]
    InvalidHeader(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(tonic::Status::not_found("no such user"));
        assert_eq!(err.to_string(), "backend returned NotFound: no such user");

        let err = Error::InvalidHeader("missing colon".to_string());
        assert_eq!(err.to_string(), "invalid header argument: missing colon");

        let err = Error::from("nope".parse::<std::net::SocketAddr>().unwrap_err());
        assert_eq!(err.to_string(), "invalid address: invalid socket address syntax");
    }
}
