/*
   Copyright 2021 JFrog Ltd

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use crate::registry_service::service::RegistryServiceError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorMessage {
    code: RegistryErrorCode,
    message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorMessages {
    errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum RegistryErrorCode {
    PackageUnknown,
    PackageExists(String),
    InvalidPackageData(String),
    IngestionBlocked(String),
    NotImplemented(String),
    Unknown(String),
}

impl fmt::Display for RegistryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match &self {
            RegistryErrorCode::PackageUnknown => "PACKAGE_UNKNOWN".to_string(),
            RegistryErrorCode::PackageExists(id) => format!("PACKAGE_EXISTS({})", id),
            RegistryErrorCode::InvalidPackageData(m) => format!("INVALID_PACKAGE_DATA({})", m),
            RegistryErrorCode::IngestionBlocked(m) => format!("INGESTION_BLOCKED({})", m),
            RegistryErrorCode::NotImplemented(m) => format!("NOT_IMPLEMENTED({})", m),
            RegistryErrorCode::Unknown(m) => format!("UNKNOWN({})", m),
        };
        write!(f, "{}", printable)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RegistryError {
    pub code: RegistryErrorCode,
}

impl From<RegistryServiceError> for RegistryError {
    fn from(err: RegistryServiceError) -> RegistryError {
        let code = match &err {
            RegistryServiceError::PackageNotFound { .. }
            | RegistryServiceError::PackageNameNotFound { .. }
            | RegistryServiceError::ReviewNotFound { .. } => RegistryErrorCode::PackageUnknown,
            RegistryServiceError::DuplicatePackage { name, version } => {
                RegistryErrorCode::PackageExists(format!("{}@{}", name, version))
            }
            RegistryServiceError::InvalidPackageData(m) => {
                RegistryErrorCode::InvalidPackageData(m.clone())
            }
            RegistryServiceError::InvalidRegex(e) => {
                RegistryErrorCode::InvalidPackageData(e.to_string())
            }
            RegistryServiceError::InvalidStarRating { .. } => {
                RegistryErrorCode::InvalidPackageData(err.to_string())
            }
            RegistryServiceError::IngestionBlocked(m) => {
                RegistryErrorCode::IngestionBlocked(m.clone())
            }
        };
        RegistryError { code }
    }
}

impl From<anyhow::Error> for RegistryError {
    fn from(err: anyhow::Error) -> RegistryError {
        RegistryError {
            code: RegistryErrorCode::Unknown(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> RegistryError {
        RegistryError {
            code: RegistryErrorCode::Unknown(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> RegistryError {
        RegistryError {
            code: RegistryErrorCode::Unknown(err.to_string()),
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> RegistryError {
        RegistryError {
            code: RegistryErrorCode::Unknown(err.to_string()),
        }
    }
}

impl From<Box<dyn Error>> for RegistryError {
    fn from(err: Box<dyn Error>) -> RegistryError {
        RegistryError {
            code: RegistryErrorCode::Unknown(err.to_string()),
        }
    }
}

impl Reject for RegistryError {}

pub async fn custom_recover(err: Rejection) -> Result<impl Reply, Infallible> {
    let mut status_code = StatusCode::INTERNAL_SERVER_ERROR;
    let mut error_message = ErrorMessage {
        code: RegistryErrorCode::Unknown("".to_string()),
        message: "".to_string(),
    };

    debug!("Rejection: {:?}", err);
    if let Some(e) = err.find::<RegistryError>() {
        match &e.code {
            RegistryErrorCode::PackageUnknown => {
                status_code = StatusCode::NOT_FOUND;
                error_message.code = RegistryErrorCode::PackageUnknown;
            }
            RegistryErrorCode::PackageExists(id) => {
                status_code = StatusCode::CONFLICT;
                error_message.code = RegistryErrorCode::PackageExists(id.to_string());
            }
            RegistryErrorCode::InvalidPackageData(m) => {
                status_code = StatusCode::BAD_REQUEST;
                error_message.code = RegistryErrorCode::InvalidPackageData(m.to_string());
                error_message.message = m.clone();
            }
            RegistryErrorCode::IngestionBlocked(m) => {
                status_code = StatusCode::FAILED_DEPENDENCY;
                error_message.code = RegistryErrorCode::IngestionBlocked(m.to_string());
                error_message.message = m.clone();
            }
            RegistryErrorCode::NotImplemented(m) => {
                status_code = StatusCode::NOT_IMPLEMENTED;
                error_message.code = RegistryErrorCode::NotImplemented(m.to_string());
                error_message.message = m.clone();
            }
            RegistryErrorCode::Unknown(m) => {
                error_message.message = m.clone();
            }
        }
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        status_code = StatusCode::BAD_REQUEST;
        error_message.message = format!("{}", e);
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        status_code = StatusCode::BAD_REQUEST;
        error_message.message = format!("{}", e);
    } else if err.is_not_found() {
        status_code = StatusCode::NOT_FOUND;
    }

    debug!("ErrorMessage: {:?}", error_message);
    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorMessages {
            errors: vec![error_message],
        }),
        status_code,
    )
    .into_response())
}
