use cityweather_catalog::CatalogError;
use cityweather_core::{AppError, NetworkError, ReqwestErrorExt};

use super::IntoAppError;

impl IntoAppError for CatalogError {
    fn into_app_error(self) -> AppError {
        match self {
            CatalogError::Network(e) => AppError::Network(e.into_network_error()),
            CatalogError::Status { status, body } => AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            }),
            CatalogError::Parse(msg) => AppError::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_server_error() {
        let err = CatalogError::Status {
            status: 503,
            body: "maintenance".into(),
        }
        .into_app_error();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::ServerError { status: 503, .. })
        ));
    }

    #[test]
    fn test_parse_stays_parse() {
        let err = CatalogError::Parse("eof".into()).into_app_error();
        assert!(matches!(err, AppError::Parse(_)));
        assert!(err.is_fetch_failure());
    }
}
